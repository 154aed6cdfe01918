use serde::{Deserialize, Serialize};

/// Avatar glyph choices. Stored as plain strings; anything unrecognized
/// falls back to the default variant rather than failing the load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UserIcon {
    #[default]
    User,
    Smile,
    Heart,
    Star,
}

impl UserIcon {
    pub const ALL: [UserIcon; 4] = [Self::User, Self::Smile, Self::Heart, Self::Star];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Smile => "Smile",
            Self::Heart => "Heart",
            Self::Star => "Star",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Self::User => "👤",
            Self::Smile => "😊",
            Self::Heart => "❤",
            Self::Star => "★",
        }
    }

    fn from_name(name: &str) -> Self {
        match name {
            "Smile" => Self::Smile,
            "Heart" => Self::Heart,
            "Star" => Self::Star,
            _ => Self::User,
        }
    }
}

impl From<String> for UserIcon {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<UserIcon> for String {
    fn from(icon: UserIcon) -> Self {
        icon.as_str().to_string()
    }
}

/// App symbol shown in the header. Same closed-set-with-fallback treatment
/// as [`UserIcon`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AppIcon {
    #[default]
    Sparkles,
    Zap,
    Target,
    Book,
}

impl AppIcon {
    pub const ALL: [AppIcon; 4] = [Self::Sparkles, Self::Zap, Self::Target, Self::Book];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sparkles => "Sparkles",
            Self::Zap => "Zap",
            Self::Target => "Target",
            Self::Book => "Book",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Self::Sparkles => "✨",
            Self::Zap => "⚡",
            Self::Target => "🎯",
            Self::Book => "📖",
        }
    }

    fn from_name(name: &str) -> Self {
        match name {
            "Zap" => Self::Zap,
            "Target" => Self::Target,
            "Book" => Self::Book,
            _ => Self::Sparkles,
        }
    }
}

impl From<String> for AppIcon {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<AppIcon> for String {
    fn from(icon: AppIcon) -> Self {
        icon.as_str().to_string()
    }
}

/// Curated accent palette offered in the appearance settings.
pub const THEME_COLORS: [(&str, &str); 6] = [
    ("Classic Purple", "#9333ea"),
    ("Soft Rose", "#fb7185"),
    ("Sage Green", "#2dd4bf"),
    ("Ocean Blue", "#3b82f6"),
    ("Pastel Slate", "#64748b"),
    ("Sunset Orange", "#f97316"),
];

/// Small profile/appearance record persisted next to the habit list.
/// Missing fields deserialize to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub user_name: String,
    pub user_icon: UserIcon,
    pub theme_color: String,
    pub app_icon: AppIcon,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            user_name: "Super User".to_string(),
            user_icon: UserIcon::User,
            theme_color: "#9333ea".to_string(),
            app_icon: AppIcon::Sparkles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_icon_names_fall_back_to_defaults() {
        let json = r##"{
            "userName": "Ada",
            "userIcon": "Dragon",
            "themeColor": "#fb7185",
            "appIcon": "Book"
        }"##;
        let settings: Settings = serde_json::from_str(json).expect("parse");
        assert_eq!(settings.user_name, "Ada");
        assert_eq!(settings.user_icon, UserIcon::User);
        assert_eq!(settings.app_icon, AppIcon::Book);
        assert_eq!(settings.theme_color, "#fb7185");
    }

    #[test]
    fn missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str("{}").expect("parse");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.theme_color, "#9333ea");
    }

    #[test]
    fn icons_serialize_as_their_names() {
        let settings = Settings {
            user_icon: UserIcon::Star,
            app_icon: AppIcon::Zap,
            ..Settings::default()
        };
        let json = serde_json::to_string(&settings).expect("serialize");
        assert!(json.contains("\"userIcon\":\"Star\""));
        assert!(json.contains("\"appIcon\":\"Zap\""));
    }
}
