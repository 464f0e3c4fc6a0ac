//! Poll Settings
//!
//! Presentation settings shared by every poll: marker glyphs, close glyph,
//! bar rendering and the fixed texts. Loadable from a JSON5 file.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors loading settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    Parse(String),

    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// Poll presentation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PollSettings {
    /// One marker per choice position; its length is the choice cap
    pub number_emojis: Vec<String>,
    /// Reaction the owner adds to close a poll
    pub close_emoji: String,
    /// Glyph repeated to draw a result bar
    pub bar_glyph: String,
    /// Glyph count of a 100% bar
    pub bar_width: u32,
    /// Footer set on a closed poll
    pub closed_footer: String,
    /// Ephemeral reply after showing; `{title}` and `{emoji}` are substituted
    pub acknowledgement: String,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            number_emojis: ["1️⃣", "2️⃣", "3️⃣", "4️⃣", "5️⃣", "6️⃣", "7️⃣", "8️⃣", "9️⃣"]
                .into_iter()
                .map(String::from)
                .collect(),
            close_emoji: "🔴".to_string(),
            bar_glyph: "█".to_string(),
            bar_width: 10,
            closed_footer: "Poll closed.".to_string(),
            acknowledgement: "Your poll named `{title}` has successfully been created. \
                              React to it with {emoji} to close the poll!"
                .to_string(),
        }
    }
}

impl PollSettings {
    /// Maximum number of choices a poll may hold
    pub fn max_choices(&self) -> usize {
        self.number_emojis.len()
    }

    /// Marker glyph for a choice position
    pub fn marker(&self, index: usize) -> &str {
        self.number_emojis
            .get(index)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Acknowledgement text for a poll title
    pub fn acknowledgement_for(&self, title: &str) -> String {
        self.acknowledgement
            .replace("{title}", title)
            .replace("{emoji}", &self.close_emoji)
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.number_emojis.is_empty() {
            return Err(SettingsError::Invalid(
                "numberEmojis must not be empty".to_string(),
            ));
        }
        if self.number_emojis.iter().any(|e| e.trim().is_empty()) {
            return Err(SettingsError::Invalid(
                "numberEmojis must not contain blank entries".to_string(),
            ));
        }
        if self.close_emoji.trim().is_empty() {
            return Err(SettingsError::Invalid("closeEmoji is required".to_string()));
        }
        if self.bar_width == 0 {
            return Err(SettingsError::Invalid(
                "barWidth must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse settings from JSON5 text
    pub fn from_json5(raw: &str) -> Result<Self, SettingsError> {
        let settings: Self =
            json5::from_str(raw).map_err(|e| SettingsError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON5 file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json5(&raw)
    }
}
