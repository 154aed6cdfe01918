//! AI assistant collaborator: one outbound request/response call to a
//! generative text API. Failures never reach the stats engine — the chat
//! surface maps every error to a fixed friendly bubble.

use std::time::Duration;

use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
const ENDPOINT_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Bubble shown when the call fails for any reason.
pub const CONNECTION_TROUBLE: &str =
    "I'm having trouble connecting. Please ensure your environment is set up correctly!";
/// Bubble shown when the API answers but carries no usable text.
pub const EMPTY_REPLY: &str =
    "I'm sorry, I couldn't process that. Try asking about your progress!";

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("no API key configured (set GEMINI_API_KEY)")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("response carried no text")]
    NoText,
}

/// Blocking client for the coach endpoint. The app calls [`ask`] from a
/// worker thread; nothing in the core ever waits on it.
///
/// [`ask`]: CoachClient::ask
pub struct CoachClient {
    http: reqwest::blocking::Client,
    api_key: String,
    model: String,
}

impl CoachClient {
    /// Reads `GEMINI_API_KEY` (or the legacy `API_KEY`) plus an optional
    /// `HABIT_COACH_MODEL` override.
    pub fn from_env() -> Result<Self, AssistantError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .map_err(|_| AssistantError::MissingApiKey)?;
        let model =
            std::env::var("HABIT_COACH_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Self::new(api_key, model)
    }

    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, AssistantError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// One round-trip: system instruction plus the user's message in, the
    /// first candidate's text out. Blocks until the API answers or the
    /// request timeout fires.
    pub fn ask(&self, system_instruction: &str, message: &str) -> Result<String, AssistantError> {
        let url = format!(
            "{ENDPOINT_BASE}/{}:generateContent?key={}",
            self.model, self.api_key
        );
        let body = json!({
            "system_instruction": { "parts": [{ "text": system_instruction }] },
            "contents": [{ "role": "user", "parts": [{ "text": message }] }],
        });
        debug!(model = %self.model, "sending coach request");
        let response: Value = self
            .http
            .post(&url)
            .json(&body)
            .send()?
            .error_for_status()?
            .json()?;
        extract_text(&response).ok_or(AssistantError::NoText)
    }
}

/// Pulls the first candidate's text out of a `generateContent` response.
fn extract_text(response: &Value) -> Option<String> {
    let text = response
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()?
        .trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
