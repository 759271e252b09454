//! Record formatting.
//!
//! Three [`Formatter`]s turn a [`LogRecord`] into one output line:
//!
//! - [`DecoratedFormatter`] - level emoji, padded level name and optional
//!   ANSI color per level
//! - [`PlainFormatter`] - `timestamp [LEVEL] logger: message`, never any
//!   color codes or level emoji
//! - [`JsonFormatter`] - one JSON object per record
//!
//! # Example
//!
//! ```
//! use chronilog::format::{Formatter, LogRecord, PlainFormatter};
//! use chronilog::Level;
//!
//! let record = LogRecord::new(Level::Success, "app", "migrations applied");
//! let line = PlainFormatter::new().format(&record);
//! assert!(line.contains("[SUCCESS] app: migrations applied"));
//! ```

mod decoration;
mod record;

use std::fmt::Write as _;

use chrono::{DateTime, Local};
use console::Style;
use serde::Serialize;

pub use decoration::{
    EMOJI_FALLBACKS, LEVEL_DECORATIONS, LevelDecoration, NEUTRAL, ascii_fallback, decoration,
};
pub use record::LogRecord;

use crate::config::{is_valid_timestamp_format, schema::DEFAULT_TIMESTAMP_FORMAT};

/// Turns a record into a rendered line (without trailing newline).
pub trait Formatter: Send + Sync {
    fn format(&self, record: &LogRecord) -> String;
}

/// A validated strftime format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampFormat(String);

impl Default for TimestampFormat {
    fn default() -> Self {
        Self(DEFAULT_TIMESTAMP_FORMAT.to_string())
    }
}

impl TimestampFormat {
    /// Use `fmt`, or the default when chrono cannot render it.
    pub fn new(fmt: &str) -> Self {
        if is_valid_timestamp_format(fmt) {
            Self(fmt.to_string())
        } else {
            Self::default()
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn render(&self, timestamp: &DateTime<Local>) -> String {
        timestamp.format(&self.0).to_string()
    }
}

fn push_extras(out: &mut String, extras: &[(String, String)]) {
    for (key, value) in extras {
        let _ = write!(out, " {key}={value}");
    }
}

/// Rich line: `timestamp emoji LEVEL    [logger] message key=value`.
#[derive(Debug, Clone, Default)]
pub struct DecoratedFormatter {
    timestamp: TimestampFormat,
    color: bool,
    ascii_emoji: bool,
}

impl DecoratedFormatter {
    /// Colored output with emoji.
    pub fn new() -> Self {
        Self {
            color: true,
            ..Self::default()
        }
    }

    /// Emoji decoration without ANSI codes (for files).
    pub fn uncolored() -> Self {
        Self::default()
    }

    pub fn with_timestamp_format(mut self, fmt: &str) -> Self {
        self.timestamp = TimestampFormat::new(fmt);
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Replace emoji (markers and message) with ASCII tokens.
    pub fn with_ascii_emoji(mut self, ascii: bool) -> Self {
        self.ascii_emoji = ascii;
        self
    }

    fn style(&self, deco: &LevelDecoration) -> Style {
        let style = Style::new().fg(deco.color).force_styling(self.color);
        if deco.bold { style.bold() } else { style }
    }

    fn dim(&self) -> Style {
        Style::new().dim().force_styling(self.color)
    }
}

impl Formatter for DecoratedFormatter {
    fn format(&self, record: &LogRecord) -> String {
        let deco = decoration(record.level);
        let marker = record.emoji.as_deref().unwrap_or(deco.emoji);
        let (marker, message) = if self.ascii_emoji {
            (ascii_fallback(marker), ascii_fallback(&record.message))
        } else {
            (marker.into(), record.message.as_str().into())
        };

        let style = self.style(deco);
        let level = format!("{:<8}", record.level.name());

        let mut out = format!(
            "{} {} {} {} {}",
            self.dim().apply_to(self.timestamp.render(&record.timestamp)),
            marker,
            style.apply_to(level),
            self.dim().apply_to(format!("[{}]", record.logger)),
            message
        );
        push_extras(&mut out, &record.extras);
        out
    }
}

/// Plain line: `timestamp [LEVEL] logger: message key=value`.
#[derive(Debug, Clone, Default)]
pub struct PlainFormatter {
    timestamp: TimestampFormat,
    ascii_emoji: bool,
}

impl PlainFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timestamp_format(mut self, fmt: &str) -> Self {
        self.timestamp = TimestampFormat::new(fmt);
        self
    }

    /// Replace emoji in messages with ASCII tokens.
    pub fn with_ascii_emoji(mut self, ascii: bool) -> Self {
        self.ascii_emoji = ascii;
        self
    }
}

impl Formatter for PlainFormatter {
    fn format(&self, record: &LogRecord) -> String {
        // Messages may carry their own escape codes; plain output never does.
        let message = String::from_utf8_lossy(&strip_ansi_escapes::strip(&record.message)).into_owned();
        let message = if self.ascii_emoji {
            ascii_fallback(&message).into_owned()
        } else {
            message
        };

        let mut out = format!(
            "{} [{}] {}: {}",
            self.timestamp.render(&record.timestamp),
            record.level.name(),
            record.logger,
            message
        );
        push_extras(&mut out, &record.extras);
        out
    }
}

/// JSON object per record with `timestamp`, `level`, `logger`, `message`
/// and, when present, `emoji` and `extra`.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    timestamp: TimestampFormat,
}

#[derive(Serialize)]
struct JsonLine<'a> {
    timestamp: String,
    level: String,
    logger: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    emoji: Option<&'a str>,
    #[serde(skip_serializing_if = "serde_json::Map::is_empty")]
    extra: serde_json::Map<String, serde_json::Value>,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timestamp_format(mut self, fmt: &str) -> Self {
        self.timestamp = TimestampFormat::new(fmt);
        self
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, record: &LogRecord) -> String {
        let line = JsonLine {
            timestamp: self.timestamp.render(&record.timestamp),
            level: record.level.name(),
            logger: &record.logger,
            message: &record.message,
            emoji: record.emoji.as_deref(),
            extra: record
                .extras
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                .collect(),
        };
        serde_json::to_string(&line).unwrap_or_else(|e| {
            format!(r#"{{"level":"ERROR","logger":"chronilog","message":"unserializable record: {e}"}}"#)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;
    use chrono::TimeZone;

    fn fixed_record(level: Level, message: &str) -> LogRecord {
        let ts = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        LogRecord::new(level, "demo", message).with_timestamp(ts)
    }

    #[test]
    fn test_plain_layout() {
        let line = PlainFormatter::new().format(&fixed_record(Level::Warning, "disk low"));
        assert_eq!(line, "2024-03-09 14:05:07 [WARNING] demo: disk low");
    }

    #[test]
    fn test_plain_has_no_markup() {
        let record = fixed_record(Level::Critical, "\x1b[31mred\x1b[0m alert").with_emoji("🔥");
        let line = PlainFormatter::new().format(&record);
        assert!(!line.contains('\x1b'));
        assert!(!line.contains("🔥"));
        assert!(line.ends_with("demo: red alert"));
    }

    #[test]
    fn test_plain_ascii_emoji() {
        let line = PlainFormatter::new()
            .with_ascii_emoji(true)
            .format(&fixed_record(Level::Info, "🚀 started"));
        assert!(line.ends_with("demo: [>>] started"));
        assert!(line.is_ascii());
    }

    #[test]
    fn test_plain_custom_timestamp_and_extras() {
        let record = fixed_record(Level::Info, "request").with_field("status", 200);
        let line = PlainFormatter::new().with_timestamp_format("%H:%M").format(&record);
        assert_eq!(line, "14:05 [INFO] demo: request status=200");
    }

    #[test]
    fn test_invalid_timestamp_format_falls_back() {
        let fmt = TimestampFormat::new("%Q");
        assert_eq!(fmt.as_str(), DEFAULT_TIMESTAMP_FORMAT);
    }

    #[test]
    fn test_decorated_contains_level_marker() {
        let formatter = DecoratedFormatter::new();
        for level in Level::NAMED {
            let line = formatter.format(&fixed_record(level, "hello"));
            assert!(line.contains(decoration(level).emoji), "{line}");
            assert!(line.contains(level.as_str()));
        }
    }

    #[test]
    fn test_decorated_colors_when_enabled() {
        let colored = DecoratedFormatter::new().format(&fixed_record(Level::Error, "boom"));
        assert!(colored.contains('\x1b'));
        let plain = DecoratedFormatter::uncolored().format(&fixed_record(Level::Error, "boom"));
        assert!(!plain.contains('\x1b'));
        assert_eq!(plain, "2024-03-09 14:05:07 ❌ ERROR    [demo] boom");
    }

    #[test]
    fn test_decorated_record_emoji_overrides_marker() {
        let record = fixed_record(Level::Info, "boot").with_emoji("🚀");
        let line = DecoratedFormatter::uncolored().format(&record);
        assert!(line.contains("🚀 INFO"));
    }

    #[test]
    fn test_decorated_ascii_mode() {
        let line = DecoratedFormatter::uncolored()
            .with_ascii_emoji(true)
            .format(&fixed_record(Level::Success, "✅ saved"));
        assert_eq!(line, "2024-03-09 14:05:07 [OK] SUCCESS  [demo] [OK] saved");
    }

    #[test]
    fn test_decorated_custom_level_neutral_marker() {
        let line = DecoratedFormatter::uncolored().format(&fixed_record(Level::Custom(5), "x"));
        assert!(line.contains("• LEVEL 5"));
    }

    #[test]
    fn test_json_fields() {
        let record = fixed_record(Level::Success, "done").with_field("rows", 3);
        let line = JsonFormatter::new().format(&record);
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["timestamp"], "2024-03-09 14:05:07");
        assert_eq!(value["level"], "SUCCESS");
        assert_eq!(value["logger"], "demo");
        assert_eq!(value["message"], "done");
        assert_eq!(value["extra"]["rows"], "3");
        assert!(value.get("emoji").is_none());
    }

    #[test]
    fn test_json_omits_empty_extra() {
        let line = JsonFormatter::new().format(&fixed_record(Level::Info, "x"));
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert!(value.get("extra").is_none());
    }
}
