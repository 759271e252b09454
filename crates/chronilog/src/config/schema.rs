//! The fixed configuration schema.
//!
//! Every generated `.chronilog.toml` carries these fields, in this order,
//! and nothing else.

use std::fmt;

use toml_write::{ToTomlValue, TomlStringBuilder};

/// Declared kind of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Bool,
    Integer,
    Text,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FieldKind::Bool => "boolean",
            FieldKind::Integer => "integer",
            FieldKind::Text => "text",
        })
    }
}

/// A typed configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    Bool(bool),
    Integer(i64),
    Text(String),
}

impl ConfigValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            ConfigValue::Bool(_) => FieldKind::Bool,
            ConfigValue::Integer(_) => FieldKind::Integer,
            ConfigValue::Text(_) => FieldKind::Text,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ConfigValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ConfigValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Render as a TOML literal: quoted strings, lowercase booleans,
    /// bare integers.
    pub fn to_toml_literal(&self) -> String {
        match self {
            ConfigValue::Bool(b) => b.to_string(),
            ConfigValue::Integer(n) => n.to_string(),
            ConfigValue::Text(s) => quote_toml_string(s),
        }
    }

    /// Convert a parsed TOML value, if its type is one the schema knows.
    pub fn from_toml(value: &toml::Value) -> Option<Self> {
        match value {
            toml::Value::Boolean(b) => Some(ConfigValue::Bool(*b)),
            toml::Value::Integer(n) => Some(ConfigValue::Integer(*n)),
            toml::Value::String(s) => Some(ConfigValue::Text(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Bool(b) => write!(f, "{b}"),
            ConfigValue::Integer(n) => write!(f, "{n}"),
            ConfigValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<i64> for ConfigValue {
    fn from(n: i64) -> Self {
        ConfigValue::Integer(n)
    }
}

impl From<i32> for ConfigValue {
    fn from(n: i32) -> Self {
        ConfigValue::Integer(i64::from(n))
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::Text(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::Text(s)
    }
}

/// Double-quoted TOML basic string; control characters become escapes.
fn quote_toml_string(s: &str) -> String {
    TomlStringBuilder::new(s).as_basic().to_toml_value()
}

/// Default value of a schema field, kept `const`-constructible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    Bool(bool),
    Integer(i64),
    Text(&'static str),
}

impl FieldDefault {
    pub fn to_value(self) -> ConfigValue {
        match self {
            FieldDefault::Bool(b) => ConfigValue::Bool(b),
            FieldDefault::Integer(n) => ConfigValue::Integer(n),
            FieldDefault::Text(s) => ConfigValue::Text(s.to_string()),
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            FieldDefault::Bool(_) => FieldKind::Bool,
            FieldDefault::Integer(_) => FieldKind::Integer,
            FieldDefault::Text(_) => FieldKind::Text,
        }
    }
}

/// One entry of the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaField {
    pub key: &'static str,
    pub default: FieldDefault,
    /// Comment line written above the key, including the leading `#`.
    pub comment: &'static str,
}

impl SchemaField {
    pub fn kind(&self) -> FieldKind {
        self.default.kind()
    }

    /// The emoji hint: first word of the comment after the `#`.
    pub fn emoji(&self) -> Option<&'static str> {
        self.comment
            .trim_start_matches('#')
            .split_whitespace()
            .next()
    }

    /// Human label used by the wizard, e.g. `📦 Log max mb?`.
    pub fn label(&self) -> String {
        let words = self.key.replace('_', " ");
        let mut chars = words.chars();
        let capitalized = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
            None => String::new(),
        };
        match self.emoji() {
            Some(emoji) => format!("{emoji} {capitalized}?"),
            None => format!("{capitalized}?"),
        }
    }
}

pub const LOG_PATH: &str = "log_path";
pub const LOG_LEVEL: &str = "log_level";
pub const LOG_MAX_MB: &str = "log_max_mb";
pub const LOG_BACKUP_COUNT: &str = "log_backup_count";
pub const ENABLE_CONSOLE: &str = "enable_console";
pub const EMOJI_FALLBACK: &str = "emoji_fallback";
pub const WIPE_LOG_ON_STARTUP: &str = "wipe_log_on_startup";
pub const TIMESTAMP_FORMAT: &str = "timestamp_format";
pub const DISABLE_RICH_FORMAT: &str = "disable_rich_format";
pub const FILTER_MODULE_PREFIX: &str = "filter_module_prefix";
pub const ENABLE_ROTATION: &str = "enable_rotation";
pub const CONSOLE_OUTPUT: &str = "console_output";
pub const LOG_FORMAT: &str = "log_format";

/// Default strftime format for timestamps.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The schema, in file order.
pub const SCHEMA: &[SchemaField] = &[
    SchemaField {
        key: LOG_PATH,
        default: FieldDefault::Text("chronilog.log"),
        comment: "# 📁 Path to your log file",
    },
    SchemaField {
        key: LOG_LEVEL,
        default: FieldDefault::Text("DEBUG"),
        comment: "# 🪵 Minimum logging level (e.g., DEBUG, INFO)",
    },
    SchemaField {
        key: LOG_MAX_MB,
        default: FieldDefault::Integer(5),
        comment: "# 📦 Max file size before rotating (MB)",
    },
    SchemaField {
        key: LOG_BACKUP_COUNT,
        default: FieldDefault::Integer(3),
        comment: "# 🔁 Number of rotated backups to keep",
    },
    SchemaField {
        key: ENABLE_CONSOLE,
        default: FieldDefault::Bool(false),
        comment: "# 🖥️ Output logs to console?",
    },
    SchemaField {
        key: EMOJI_FALLBACK,
        default: FieldDefault::Bool(true),
        comment: "# 😃 Replace emoji with safe characters?",
    },
    SchemaField {
        key: WIPE_LOG_ON_STARTUP,
        default: FieldDefault::Bool(false),
        comment: "# 🧹 Wipe log file every run?",
    },
    SchemaField {
        key: TIMESTAMP_FORMAT,
        default: FieldDefault::Text(DEFAULT_TIMESTAMP_FORMAT),
        comment: "# ⏱️ Timestamp format for logs",
    },
    SchemaField {
        key: DISABLE_RICH_FORMAT,
        default: FieldDefault::Bool(false),
        comment: "# ❌ Use plain text instead of Rich formatting?",
    },
    SchemaField {
        key: FILTER_MODULE_PREFIX,
        default: FieldDefault::Text(""),
        comment: "# 🔍 Only log modules matching this prefix",
    },
    SchemaField {
        key: ENABLE_ROTATION,
        default: FieldDefault::Bool(true),
        comment: "# 🔄 Enable rotating log files?",
    },
    SchemaField {
        key: CONSOLE_OUTPUT,
        default: FieldDefault::Text("stdout"),
        comment: "# 📤 Console output stream (stdout or stderr)",
    },
    SchemaField {
        key: LOG_FORMAT,
        default: FieldDefault::Text("default"),
        comment: "# 📄 Format: 'default' or 'json'",
    },
];

/// Look up a field by key.
pub fn field(key: &str) -> Option<&'static SchemaField> {
    SCHEMA.iter().find(|f| f.key == key)
}

/// Position of a field in the schema.
pub fn index_of(key: &str) -> Option<usize> {
    SCHEMA.iter().position(|f| f.key == key)
}
