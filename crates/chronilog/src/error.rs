//! Error types for Chronilog.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::FieldKind;

/// Errors produced by configuration, the wizard and logger construction.
///
/// Logging calls themselves never return these; sink failures are counted
/// and reported on stderr instead.
#[derive(Debug, Error)]
pub enum ChronilogError {
    /// Filesystem failure while reading or writing `path`.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The config file is not valid TOML.
    #[error("failed to parse {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A key that is not part of the config schema.
    #[error("unknown config key '{0}'")]
    UnknownKey(String),

    /// A value whose kind does not match the schema field.
    #[error("config key '{key}' expects {expected}, got {found}")]
    TypeMismatch {
        key: String,
        expected: FieldKind,
        found: FieldKind,
    },

    /// The prompting layer failed (terminal error, closed input).
    #[error("prompt failed: {0}")]
    Prompt(String),

    /// The operator cancelled an interactive prompt.
    #[error("prompt cancelled")]
    Cancelled,
}

impl ChronilogError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias used throughout Chronilog.
pub type ChronilogResult<T> = Result<T, ChronilogError>;
