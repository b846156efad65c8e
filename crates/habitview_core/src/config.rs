//! Configuration for tag/field naming and logging.
//!
//! # Responsibility
//! - Name every tag and field the query fragments rely on.
//! - Load configuration from JSON with per-field defaults.
//!
//! # Invariants
//! - A validated [`JournalSchema`] has no empty names.

use crate::logging::default_log_level;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    /// Input is not valid JSON for the config shape.
    Parse(serde_json::Error),
    /// A configured name is empty.
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Tag and field names used to locate habits, days and months.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct JournalSchema {
    /// Tag marking habit-definition documents.
    pub habit_tag: String,
    /// Tag shared by every journal entry.
    pub journal_tag: String,
    /// Tag marking day records.
    pub daily_tag: String,
    /// Tag marking month records.
    pub monthly_tag: String,
    /// Habit field naming the target field on day records.
    pub field_field: String,
    pub shorthand_field: String,
    pub type_field: String,
    pub caption_field: String,
    /// Month field used to order yearly rows.
    pub date_field: String,
    /// Field marking a document as an in-progress draft of another.
    pub draft_field: String,
}

impl Default for JournalSchema {
    fn default() -> Self {
        Self {
            habit_tag: "$:/tags/Journal/Habit".to_string(),
            journal_tag: "Journal".to_string(),
            daily_tag: "Daily".to_string(),
            monthly_tag: "Monthly".to_string(),
            field_field: "journal-field".to_string(),
            shorthand_field: "habit-shorthand".to_string(),
            type_field: "habit-type".to_string(),
            caption_field: "caption".to_string(),
            date_field: "journal-date".to_string(),
            draft_field: "draft.of".to_string(),
        }
    }
}

impl JournalSchema {
    /// Checks every configured name.
    ///
    /// # Errors
    /// - `Invalid` when a name is empty or contains filter brackets.
    pub fn validate(&self) -> ConfigResult<()> {
        let names = [
            ("habit_tag", &self.habit_tag),
            ("journal_tag", &self.journal_tag),
            ("daily_tag", &self.daily_tag),
            ("monthly_tag", &self.monthly_tag),
            ("field_field", &self.field_field),
            ("shorthand_field", &self.shorthand_field),
            ("type_field", &self.type_field),
            ("caption_field", &self.caption_field),
            ("date_field", &self.date_field),
            ("draft_field", &self.draft_field),
        ];
        for (key, value) in names {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("`{key}` cannot be empty")));
            }
            // Names are spliced into filter operands.
            if value.contains(['[', ']', '<', '>']) {
                return Err(ConfigError::Invalid(format!(
                    "`{key}` cannot contain filter brackets, got `{value}`"
                )));
            }
        }
        Ok(())
    }
}

/// Logging settings consumed by [`crate::logging::init_logging`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_level_string")]
    pub level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: String,
}

fn default_level_string() -> String {
    default_log_level().to_string()
}

/// Full configuration document for host binaries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub schema: JournalSchema,
    #[serde(default)]
    pub log: Option<LogConfig>,
}

impl AppConfig {
    /// Parses and validates a JSON config document.
    pub fn from_json_str(input: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(input)?;
        config.schema.validate()?;
        Ok(config)
    }
}
