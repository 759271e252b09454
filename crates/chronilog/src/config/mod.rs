//! Configuration: schema, documents and the resolved logger settings.
//!
//! Resolution order, lowest precedence first:
//!
//! 1. Schema defaults
//! 2. The discovered config file (`CHRONILOG_CONFIG` or `./.chronilog.toml`)
//! 3. Environment overrides
//! 4. Explicit per-logger overrides
//!
//! # Environment Variables
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `CHRONILOG_CONFIG` | Path of the config file to read |
//! | `CHRONILOG_LOG_LEVEL` | Overrides `log_level` |
//! | `CHRONILOG_LOG_PATH` | Overrides `log_path` |

mod document;
pub mod schema;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::format::{Item, StrftimeItems};

pub use document::{BodyLine, ConfigDocument, ConfigWarning, SECTION};
pub use schema::{ConfigValue, FieldKind, SCHEMA, SchemaField};

use crate::error::{ChronilogError, ChronilogResult};
use crate::level::Level;

/// File name the wizard writes and the loader discovers.
pub const CONFIG_FILE_NAME: &str = ".chronilog.toml";

/// Console stream selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleStream {
    #[default]
    Stdout,
    Stderr,
}

impl FromStr for ConsoleStream {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stdout" => Ok(ConsoleStream::Stdout),
            "stderr" => Ok(ConsoleStream::Stderr),
            _ => Err("expected 'stdout' or 'stderr'".to_string()),
        }
    }
}

/// Output format selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-oriented lines (decorated or plain).
    #[default]
    Default,
    /// One JSON object per record.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(LogFormat::Default),
            "json" => Ok(LogFormat::Json),
            _ => Err("expected 'default' or 'json'".to_string()),
        }
    }
}

/// Rotation thresholds for the file sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Rotate when a write would reach this many bytes. Zero never rotates.
    pub max_bytes: u64,
    /// Number of `path.N` backups to keep. Zero never rotates.
    pub backup_count: u32,
}

/// Typed, validated view of a [`ConfigDocument`] used to build loggers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChronilogConfig {
    /// Log file; `None` when `log_path` is empty.
    pub log_path: Option<PathBuf>,
    pub log_level: Level,
    pub log_max_mb: u64,
    pub log_backup_count: u32,
    pub enable_console: bool,
    pub emoji_fallback: bool,
    pub wipe_log_on_startup: bool,
    pub timestamp_format: String,
    pub disable_rich_format: bool,
    /// Only loggers whose name starts with this prefix emit.
    pub filter_module_prefix: Option<String>,
    pub enable_rotation: bool,
    pub console_output: ConsoleStream,
    pub log_format: LogFormat,
}

impl Default for ChronilogConfig {
    fn default() -> Self {
        Self::from_document(&ConfigDocument::defaults()).0
    }
}

impl ChronilogConfig {
    /// Convert a document, replacing invalid values with defaults.
    pub fn from_document(doc: &ConfigDocument) -> (Self, Vec<ConfigWarning>) {
        let mut warnings = Vec::new();

        let log_path = match doc.text(schema::LOG_PATH).trim() {
            "" => None,
            path => Some(PathBuf::from(path)),
        };

        let log_level = parse_or_default(doc, schema::LOG_LEVEL, Level::Debug, &mut warnings, |s| {
            s.parse::<Level>().map_err(|e| e.to_string())
        });

        let log_max_mb = non_negative(doc, schema::LOG_MAX_MB, &mut warnings);
        let log_backup_count =
            u32::try_from(non_negative(doc, schema::LOG_BACKUP_COUNT, &mut warnings))
                .unwrap_or(u32::MAX);

        let timestamp_format = {
            let fmt = doc.text(schema::TIMESTAMP_FORMAT);
            if is_valid_timestamp_format(fmt) {
                fmt.to_string()
            } else {
                warnings.push(ConfigWarning::InvalidValue {
                    key: schema::TIMESTAMP_FORMAT.to_string(),
                    value: fmt.to_string(),
                    reason: "not a valid strftime format".to_string(),
                });
                schema::DEFAULT_TIMESTAMP_FORMAT.to_string()
            }
        };

        let filter_module_prefix = match doc.text(schema::FILTER_MODULE_PREFIX) {
            "" => None,
            prefix => Some(prefix.to_string()),
        };

        let console_output = parse_or_default(
            doc,
            schema::CONSOLE_OUTPUT,
            ConsoleStream::default(),
            &mut warnings,
            str::parse,
        );
        let log_format = parse_or_default(
            doc,
            schema::LOG_FORMAT,
            LogFormat::default(),
            &mut warnings,
            str::parse,
        );

        let config = Self {
            log_path,
            log_level,
            log_max_mb,
            log_backup_count,
            enable_console: doc.flag(schema::ENABLE_CONSOLE),
            emoji_fallback: doc.flag(schema::EMOJI_FALLBACK),
            wipe_log_on_startup: doc.flag(schema::WIPE_LOG_ON_STARTUP),
            timestamp_format,
            disable_rich_format: doc.flag(schema::DISABLE_RICH_FORMAT),
            filter_module_prefix,
            enable_rotation: doc.flag(schema::ENABLE_ROTATION),
            console_output,
            log_format,
        };
        (config, warnings)
    }

    /// Rotation thresholds, or `None` when rotation is disabled.
    pub fn rotation(&self) -> Option<RotationPolicy> {
        self.enable_rotation.then(|| RotationPolicy {
            max_bytes: self.log_max_mb.saturating_mul(1024 * 1024),
            backup_count: self.log_backup_count,
        })
    }

    /// Whether a logger with this name passes the module prefix filter.
    pub fn accepts_logger(&self, name: &str) -> bool {
        self.filter_module_prefix
            .as_deref()
            .is_none_or(|prefix| name.starts_with(prefix))
    }
}

/// Parse a text field, falling back to `default` on failure.
fn parse_or_default<T, F>(
    doc: &ConfigDocument,
    key: &str,
    default: T,
    warnings: &mut Vec<ConfigWarning>,
    parse: F,
) -> T
where
    F: Fn(&str) -> Result<T, String>,
{
    let raw = doc.text(key);
    parse(raw).unwrap_or_else(|reason| {
        warnings.push(ConfigWarning::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
            reason,
        });
        default
    })
}

fn non_negative(doc: &ConfigDocument, key: &str, warnings: &mut Vec<ConfigWarning>) -> u64 {
    let raw = doc.integer(key);
    u64::try_from(raw).unwrap_or_else(|_| {
        warnings.push(ConfigWarning::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
            reason: "must not be negative".to_string(),
        });
        match schema::field(key).map(|f| f.default) {
            Some(schema::FieldDefault::Integer(n)) => n.unsigned_abs(),
            _ => 0,
        }
    })
}

/// Whether `fmt` is a strftime format chrono can render.
pub fn is_valid_timestamp_format(fmt: &str) -> bool {
    !StrftimeItems::new(fmt).any(|item| matches!(item, Item::Error))
}

/// Where a registry reads its base configuration from.
#[derive(Debug, Clone, Default)]
pub enum ConfigSource {
    /// `CHRONILOG_CONFIG`, else `.chronilog.toml` in the current directory.
    #[default]
    Discover,
    /// A specific file; a missing file means defaults.
    File(PathBuf),
    /// An in-memory document (no file I/O, no environment).
    Document(ConfigDocument),
}

/// Outcome of resolving a [`ConfigSource`].
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub document: ConfigDocument,
    /// File that was read, if any.
    pub path: Option<PathBuf>,
    pub warnings: Vec<ConfigWarning>,
}

impl ConfigSource {
    /// Path this source would read, without touching the filesystem.
    pub fn candidate_path(&self) -> Option<PathBuf> {
        match self {
            ConfigSource::Discover => Some(discovered_path(|k| std::env::var(k).ok())),
            ConfigSource::File(path) => Some(path.clone()),
            ConfigSource::Document(_) => None,
        }
    }

    /// Resolve defaults, file and environment into a document.
    ///
    /// A missing file is not an error. Unreadable files are; malformed
    /// contents only produce warnings.
    pub fn load(&self) -> ChronilogResult<LoadedConfig> {
        self.load_with_env(|k| std::env::var(k).ok())
    }

    /// [`load`](Self::load) with an explicit environment lookup.
    pub fn load_with_env<E>(&self, env: E) -> ChronilogResult<LoadedConfig>
    where
        E: Fn(&str) -> Option<String>,
    {
        let (mut loaded, apply_env) = match self {
            ConfigSource::Document(doc) => (
                LoadedConfig {
                    document: doc.clone(),
                    path: None,
                    warnings: Vec::new(),
                },
                false,
            ),
            ConfigSource::File(path) => (load_file(path)?, true),
            ConfigSource::Discover => (load_file(&discovered_path(&env))?, true),
        };

        if apply_env {
            apply_env_overrides(&mut loaded.document, &env);
        }
        Ok(loaded)
    }
}

fn discovered_path<E>(env: E) -> PathBuf
where
    E: Fn(&str) -> Option<String>,
{
    env("CHRONILOG_CONFIG")
        .filter(|p| !p.is_empty())
        .map_or_else(|| PathBuf::from(CONFIG_FILE_NAME), PathBuf::from)
}

fn load_file(path: &Path) -> ChronilogResult<LoadedConfig> {
    match fs::read_to_string(path) {
        Ok(text) => {
            let (document, warnings) = ConfigDocument::parse_lenient(&text);
            Ok(LoadedConfig {
                document,
                path: Some(path.to_path_buf()),
                warnings,
            })
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(LoadedConfig {
            document: ConfigDocument::defaults(),
            path: None,
            warnings: Vec::new(),
        }),
        Err(e) => Err(ChronilogError::io(path, e)),
    }
}

/// Strictly read a config file: syntax errors are returned as errors.
pub fn read_strict(path: &Path) -> ChronilogResult<(ConfigDocument, Vec<ConfigWarning>)> {
    let text = fs::read_to_string(path).map_err(|e| ChronilogError::io(path, e))?;
    let (doc, mut warnings) =
        ConfigDocument::parse(&text).map_err(|source| ChronilogError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
    warnings.extend(ChronilogConfig::from_document(&doc).1);
    Ok((doc, warnings))
}

fn apply_env_overrides<E>(doc: &mut ConfigDocument, env: E)
where
    E: Fn(&str) -> Option<String>,
{
    if let Some(level) = env("CHRONILOG_LOG_LEVEL") {
        let _ = doc.set(schema::LOG_LEVEL, level);
    }
    if let Some(path) = env("CHRONILOG_LOG_PATH") {
        let _ = doc.set(schema::LOG_PATH, path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_config() {
        let config = ChronilogConfig::default();
        assert_eq!(config.log_path, Some(PathBuf::from("chronilog.log")));
        assert_eq!(config.log_level, Level::Debug);
        assert_eq!(config.log_max_mb, 5);
        assert_eq!(config.log_backup_count, 3);
        assert!(!config.enable_console);
        assert!(config.emoji_fallback);
        assert!(config.enable_rotation);
        assert_eq!(config.console_output, ConsoleStream::Stdout);
        assert_eq!(config.log_format, LogFormat::Default);
        assert_eq!(config.filter_module_prefix, None);
    }

    #[test]
    fn test_rotation_policy() {
        let config = ChronilogConfig::default();
        assert_eq!(
            config.rotation(),
            Some(RotationPolicy {
                max_bytes: 5 * 1024 * 1024,
                backup_count: 3
            })
        );

        let mut doc = ConfigDocument::defaults();
        doc.set(schema::ENABLE_ROTATION, false).unwrap();
        assert_eq!(ChronilogConfig::from_document(&doc).0.rotation(), None);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let mut doc = ConfigDocument::defaults();
        doc.set(schema::LOG_LEVEL, "LOUD").unwrap();
        doc.set(schema::CONSOLE_OUTPUT, "printer").unwrap();
        doc.set(schema::LOG_MAX_MB, -2).unwrap();
        doc.set(schema::TIMESTAMP_FORMAT, "%Q %").unwrap();

        let (config, warnings) = ChronilogConfig::from_document(&doc);
        assert_eq!(config.log_level, Level::Debug);
        assert_eq!(config.console_output, ConsoleStream::Stdout);
        assert_eq!(config.log_max_mb, 5);
        assert_eq!(config.timestamp_format, schema::DEFAULT_TIMESTAMP_FORMAT);
        assert_eq!(warnings.len(), 4);
    }

    #[test]
    fn test_prefix_filter() {
        let mut doc = ConfigDocument::defaults();
        doc.set(schema::FILTER_MODULE_PREFIX, "app.").unwrap();
        let config = ChronilogConfig::from_document(&doc).0;
        assert!(config.accepts_logger("app.db"));
        assert!(!config.accepts_logger("vendor.http"));
        assert!(ChronilogConfig::default().accepts_logger("anything"));
    }

    #[test]
    fn test_empty_log_path_disables_file() {
        let mut doc = ConfigDocument::defaults();
        doc.set(schema::LOG_PATH, "  ").unwrap();
        assert_eq!(ChronilogConfig::from_document(&doc).0.log_path, None);
    }

    #[test]
    fn test_load_missing_file_is_defaults() {
        let dir = TempDir::new().unwrap();
        let source = ConfigSource::File(dir.path().join(CONFIG_FILE_NAME));
        let loaded = source.load_with_env(no_env).unwrap();
        assert_eq!(loaded.document, ConfigDocument::defaults());
        assert!(loaded.path.is_none());
    }

    #[test]
    fn test_load_file_and_env_precedence() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[logging]\nlog_level = \"INFO\"\nlog_max_mb = 1\n").unwrap();

        let source = ConfigSource::File(path.clone());
        let loaded = source.load_with_env(no_env).unwrap();
        assert_eq!(loaded.path, Some(path));
        assert_eq!(loaded.document.text(schema::LOG_LEVEL), "INFO");

        let loaded = source
            .load_with_env(|k| (k == "CHRONILOG_LOG_LEVEL").then(|| "ERROR".to_string()))
            .unwrap();
        assert_eq!(loaded.document.text(schema::LOG_LEVEL), "ERROR");
        assert_eq!(loaded.document.integer(schema::LOG_MAX_MB), 1);
    }

    #[test]
    fn test_discover_uses_env_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[logging]\nenable_console = true\n").unwrap();
        let p = path.to_string_lossy().to_string();

        let loaded = ConfigSource::Discover
            .load_with_env(|k| (k == "CHRONILOG_CONFIG").then(|| p.clone()))
            .unwrap();
        assert!(loaded.document.flag(schema::ENABLE_CONSOLE));
    }

    #[test]
    fn test_malformed_file_is_lenient() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[logging\nthis is not toml").unwrap();

        let loaded = ConfigSource::File(path.clone()).load_with_env(no_env).unwrap();
        assert_eq!(loaded.document, ConfigDocument::defaults());
        assert!(matches!(loaded.warnings[0], ConfigWarning::Syntax(_)));

        assert!(matches!(
            read_strict(&path),
            Err(ChronilogError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_read_strict_collects_value_warnings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[logging]\nlog_format = \"xml\"\nextra = 1\n").unwrap();
        let (_, warnings) = read_strict(&path).unwrap();
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn test_timestamp_format_validation() {
        assert!(is_valid_timestamp_format("%Y-%m-%d %H:%M:%S"));
        assert!(is_valid_timestamp_format("%H:%M:%S%.3f"));
        assert!(!is_valid_timestamp_format("%Q"));
    }
}
