//! `ConfigDocument`: one typed value per schema field, in schema order.

use std::fmt::Write as _;

use super::schema::{self, ConfigValue, FieldKind, SCHEMA, SchemaField};
use crate::error::{ChronilogError, ChronilogResult};

/// Name of the TOML table holding the settings.
pub const SECTION: &str = "logging";

const HEADER: &str = "\
# ========================================
# 🛠️  Chronilog Configuration
# ========================================
";

/// A finding produced while reading a config file back.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigWarning {
    #[error("config is not valid TOML, using defaults: {0}")]
    Syntax(String),

    #[error("no [logging] section found, using defaults")]
    MissingSection,

    #[error("unknown key '{0}' ignored")]
    UnknownKey(String),

    #[error("'{key}' should be {expected}, found {found}; using default")]
    WrongKind {
        key: String,
        expected: FieldKind,
        found: String,
    },

    #[error("'{key}' has invalid value '{value}' ({reason}); using default")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// The realized configuration mapping.
///
/// Holds exactly one value per [`SCHEMA`] entry and guarantees each value's
/// kind matches its field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDocument {
    values: Vec<ConfigValue>,
}

impl Default for ConfigDocument {
    fn default() -> Self {
        Self::defaults()
    }
}

impl ConfigDocument {
    /// Document with every field at its schema default.
    pub fn defaults() -> Self {
        Self {
            values: SCHEMA.iter().map(|f| f.default.to_value()).collect(),
        }
    }

    /// Build from values given in schema order.
    pub fn from_values(values: Vec<ConfigValue>) -> ChronilogResult<Self> {
        let mut doc = Self::defaults();
        for (field, value) in SCHEMA.iter().zip(values) {
            doc.set(field.key, value)?;
        }
        Ok(doc)
    }

    /// Replace one value, checking the key exists and the kind matches.
    pub fn set(&mut self, key: &str, value: impl Into<ConfigValue>) -> ChronilogResult<()> {
        let value = value.into();
        let idx = schema::index_of(key).ok_or_else(|| ChronilogError::UnknownKey(key.to_string()))?;
        let expected = SCHEMA[idx].kind();
        if value.kind() != expected {
            return Err(ChronilogError::TypeMismatch {
                key: key.to_string(),
                expected,
                found: value.kind(),
            });
        }
        self.values[idx] = value;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        schema::index_of(key).map(|idx| &self.values[idx])
    }

    /// Fields paired with their values, in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static SchemaField, &ConfigValue)> {
        SCHEMA.iter().zip(self.values.iter())
    }

    pub(crate) fn flag(&self, key: &str) -> bool {
        self.get(key).and_then(ConfigValue::as_bool).unwrap_or_default()
    }

    pub(crate) fn integer(&self, key: &str) -> i64 {
        self.get(key).and_then(ConfigValue::as_integer).unwrap_or_default()
    }

    pub(crate) fn text(&self, key: &str) -> &str {
        self.get(key).and_then(ConfigValue::as_text).unwrap_or_default()
    }

    /// Body lines: `[logging]`, then comment and `key = value` per field.
    ///
    /// Shared by the file renderer and the dry-run preview.
    pub fn body_lines(&self) -> Vec<BodyLine> {
        let mut lines = vec![BodyLine::Section(format!("[{SECTION}]"))];
        for (field, value) in self.iter() {
            lines.push(BodyLine::Comment(field.comment.to_string()));
            lines.push(BodyLine::Entry(format!(
                "{} = {}",
                field.key,
                value.to_toml_literal()
            )));
            lines.push(BodyLine::Blank);
        }
        lines
    }

    /// Full file contents of `.chronilog.toml`.
    pub fn render_toml(&self) -> String {
        let mut out = String::from(HEADER);
        out.push('\n');
        for line in self.body_lines() {
            let _ = writeln!(out, "{}", line.text());
        }
        out
    }

    /// Parse TOML text. Unknown keys are ignored, missing keys keep their
    /// defaults and values of the wrong kind fall back to defaults; each of
    /// those is reported as a warning. Only a TOML syntax error is fatal.
    pub fn parse(text: &str) -> Result<(Self, Vec<ConfigWarning>), toml::de::Error> {
        let table: toml::Table = text.parse()?;
        let mut doc = Self::defaults();
        let mut warnings = Vec::new();

        let Some(section) = table.get(SECTION).and_then(toml::Value::as_table) else {
            warnings.push(ConfigWarning::MissingSection);
            return Ok((doc, warnings));
        };

        for (key, raw) in section {
            let Some(field) = schema::field(key) else {
                warnings.push(ConfigWarning::UnknownKey(key.clone()));
                continue;
            };
            match ConfigValue::from_toml(raw) {
                Some(value) if value.kind() == field.kind() => {
                    // Kind already checked.
                    let _ = doc.set(key, value);
                }
                _ => warnings.push(ConfigWarning::WrongKind {
                    key: key.clone(),
                    expected: field.kind(),
                    found: raw.type_str().to_string(),
                }),
            }
        }

        Ok((doc, warnings))
    }

    /// Like [`parse`](Self::parse), but a syntax error becomes a warning and
    /// the defaults are returned.
    pub fn parse_lenient(text: &str) -> (Self, Vec<ConfigWarning>) {
        match Self::parse(text) {
            Ok(parsed) => parsed,
            Err(e) => (
                Self::defaults(),
                vec![ConfigWarning::Syntax(e.message().to_string())],
            ),
        }
    }
}

/// One line of the rendered `[logging]` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyLine {
    Section(String),
    Comment(String),
    Entry(String),
    Blank,
}

impl BodyLine {
    pub fn text(&self) -> &str {
        match self {
            BodyLine::Section(s) | BodyLine::Comment(s) | BodyLine::Entry(s) => s,
            BodyLine::Blank => "",
        }
    }
}
