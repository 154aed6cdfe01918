//! Durable local state. Two fixed file names under one data directory act
//! as the storage keys; anything unreadable falls back to defaults without
//! surfacing an error.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::habit::{default_habits, Habit};
use crate::settings::Settings;

/// Versioned like the tracked year: a schema change bumps the name and old
/// files are simply ignored.
pub const HABITS_FILE: &str = "habits_v6_2026.json";
pub const SETTINGS_FILE: &str = "settings.json";

/// Data directory from `HABIT_DATA_DIR`, else `./data`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("HABIT_DATA_DIR") {
        return PathBuf::from(dir);
    }
    PathBuf::from("data")
}

pub fn load_habits(dir: &Path) -> Vec<Habit> {
    match read_json(&dir.join(HABITS_FILE)) {
        Some(habits) => habits,
        None => default_habits(),
    }
}

pub fn load_settings(dir: &Path) -> Settings {
    read_json(&dir.join(SETTINGS_FILE)).unwrap_or_default()
}

pub fn save_habits(dir: &Path, habits: &[Habit]) -> Result<()> {
    write_json(&dir.join(HABITS_FILE), &habits)
}

pub fn save_settings(dir: &Path, settings: &Settings) -> Result<()> {
    write_json(&dir.join(SETTINGS_FILE), settings)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no saved state yet");
            return None;
        }
        Err(err) => {
            warn!(path = %path.display(), %err, "unable to read saved state");
            return None;
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(path = %path.display(), %err, "saved state is not valid JSON, using defaults");
            None
        }
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating data directory {}", parent.display()))?;
    }
    let payload = serde_json::to_vec_pretty(value).context("encoding state")?;
    fs::write(path, payload).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
