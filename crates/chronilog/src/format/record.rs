//! The `LogRecord` passed from loggers to formatters.

use chrono::{DateTime, Local};

use crate::level::Level;

/// One logging event.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub timestamp: DateTime<Local>,
    pub level: Level,
    /// Name of the logger that produced the record.
    pub logger: String,
    pub message: String,
    /// Marker shown instead of the level's default emoji.
    pub emoji: Option<String>,
    /// Structured extras, in insertion order.
    pub extras: Vec<(String, String)>,
}

impl LogRecord {
    /// Create a record stamped with the current local time.
    pub fn new(level: Level, logger: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            logger: logger.into(),
            message: message.into(),
            emoji: None,
            extras: Vec::new(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = Some(emoji.into());
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.extras.push((key.into(), value.to_string()));
        self
    }

    pub fn with_fields<I, K, V>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        self.extras
            .extend(fields.into_iter().map(|(k, v)| (k.into(), v.to_string())));
        self
    }
}
