//! Logger registry: resolves configuration, caches loggers and shares file
//! sinks.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use super::logger::Logger;
use crate::config::{
    ChronilogConfig, ConfigDocument, ConfigSource, ConfigValue, ConfigWarning, ConsoleStream,
    LogFormat,
};
use crate::console::ChronilogConsole;
use crate::error::ChronilogResult;
use crate::format::{DecoratedFormatter, Formatter, JsonFormatter, PlainFormatter};
use crate::level::Level;
use crate::sink::{ConsoleSink, FileSink};

/// Per-call options for [`LoggerRegistry::logger`].
#[derive(Clone)]
pub struct LoggerOptions {
    file_formatter: Option<Arc<dyn Formatter>>,
    use_cache: bool,
    overrides: Vec<(String, ConfigValue)>,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self {
            file_formatter: None,
            use_cache: true,
            overrides: Vec::new(),
        }
    }
}

impl LoggerOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Formatter for the file sink instead of the configured one.
    #[must_use]
    pub fn file_formatter(mut self, formatter: Arc<dyn Formatter>) -> Self {
        self.file_formatter = Some(formatter);
        self
    }

    /// With `false`, a fresh logger is built and not cached.
    #[must_use]
    pub fn use_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    /// Override one config key for this logger. Checked against the schema
    /// when the logger is built.
    ///
    /// File sinks are shared per path, so rotation overrides
    /// (`log_max_mb`, `log_backup_count`, `enable_rotation`) and
    /// `wipe_log_on_startup` do not apply to a path the registry already
    /// has open; a warning is printed instead.
    #[must_use]
    pub fn with_override(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.overrides.push((key.into(), value.into()));
        self
    }
}

/// Owner of cached loggers and shared file sinks.
///
/// Configuration is read from the [`ConfigSource`] once, when the first
/// logger is built.
pub struct LoggerRegistry {
    source: ConfigSource,
    console: Option<Arc<ChronilogConsole>>,
    base: OnceLock<ConfigDocument>,
    loggers: Mutex<HashMap<String, Arc<Logger>>>,
    file_sinks: Mutex<HashMap<PathBuf, Arc<FileSink>>>,
    reported: Mutex<HashSet<String>>,
}

impl Default for LoggerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggerRegistry {
    /// Registry reading `CHRONILOG_CONFIG` or `./.chronilog.toml`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_source(ConfigSource::Discover)
    }

    #[must_use]
    pub fn with_source(source: ConfigSource) -> Self {
        Self {
            source,
            console: None,
            base: OnceLock::new(),
            loggers: Mutex::new(HashMap::new()),
            file_sinks: Mutex::new(HashMap::new()),
            reported: Mutex::new(HashSet::new()),
        }
    }

    /// Send console sink output to `console` instead of stdout/stderr.
    #[must_use]
    pub fn with_console(mut self, console: Arc<ChronilogConsole>) -> Self {
        self.console = Some(console);
        self
    }

    pub fn source(&self) -> &ConfigSource {
        &self.source
    }

    /// Cached logger for `name`, built on first use.
    pub fn get_logger(&self, name: &str) -> ChronilogResult<Arc<Logger>> {
        self.logger(name, LoggerOptions::default())
    }

    /// Logger for `name` with explicit options.
    ///
    /// A cached logger is returned as-is; options only apply when a
    /// logger is built.
    pub fn logger(&self, name: &str, options: LoggerOptions) -> ChronilogResult<Arc<Logger>> {
        // Held while building so concurrent first requests build once.
        let mut cache = self.loggers.lock().unwrap_or_else(PoisonError::into_inner);
        if options.use_cache {
            if let Some(logger) = cache.get(name) {
                return Ok(Arc::clone(logger));
            }
        }

        let logger = Arc::new(self.build(name, &options)?);
        if options.use_cache {
            cache.insert(name.to_string(), Arc::clone(&logger));
        }
        Ok(logger)
    }

    /// Whether `get_logger(name)` would write a record at `level`, without
    /// building or caching a logger.
    pub fn would_log(&self, name: &str, level: Level) -> bool {
        let cached = self
            .loggers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned();
        if let Some(logger) = cached {
            return logger.is_enabled_for(level);
        }
        self.resolve(&LoggerOptions::default()).is_ok_and(|config| {
            (config.log_path.is_some() || config.enable_console)
                && config.accepts_logger(name)
                && level.passes(config.log_level)
        })
    }

    /// Number of cached loggers.
    pub fn cached_count(&self) -> usize {
        self.loggers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Resolved configuration for a logger built with `options`.
    pub fn resolve(&self, options: &LoggerOptions) -> ChronilogResult<ChronilogConfig> {
        let mut doc = self.base_document()?;
        for (key, value) in &options.overrides {
            doc.set(key, value.clone())?;
        }
        let (config, warnings) = ChronilogConfig::from_document(&doc);
        self.report(&warnings);
        Ok(config)
    }

    fn build(&self, name: &str, options: &LoggerOptions) -> ChronilogResult<Logger> {
        let config = self.resolve(options)?;
        let mut builder = Logger::builder(name)
            .level(config.log_level)
            .module_prefix(config.filter_module_prefix.clone());

        if let Some(path) = &config.log_path {
            let sink = self.file_sink(path, &config)?;
            let formatter = options
                .file_formatter
                .clone()
                .unwrap_or_else(|| file_formatter(&config));
            builder = builder.route(sink, formatter);
        }

        if config.enable_console {
            let console = self.console_for(config.console_output);
            let formatter = console_formatter(&config, &console);
            builder = builder.route(Arc::new(ConsoleSink::with_console(console)), formatter);
        }

        Ok(builder.build())
    }

    fn base_document(&self) -> ChronilogResult<ConfigDocument> {
        if let Some(doc) = self.base.get() {
            return Ok(doc.clone());
        }
        let loaded = self.source.load()?;
        self.report(&loaded.warnings);
        Ok(self.base.get_or_init(|| loaded.document).clone())
    }

    /// One sink per path; the startup wipe only happens when it is created.
    fn file_sink(&self, path: &Path, config: &ChronilogConfig) -> ChronilogResult<Arc<FileSink>> {
        let key = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let mut sinks = self
            .file_sinks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(sink) = sinks.get(&key) {
            if sink.rotation() != config.rotation() {
                self.notice(format!(
                    "{} is already open with other rotation settings; keeping them",
                    path.display()
                ));
            }
            return Ok(Arc::clone(sink));
        }
        let sink = Arc::new(FileSink::open(
            path,
            config.rotation(),
            config.wipe_log_on_startup,
        )?);
        sinks.insert(key, Arc::clone(&sink));
        Ok(sink)
    }

    fn console_for(&self, stream: ConsoleStream) -> Arc<ChronilogConsole> {
        self.console
            .clone()
            .unwrap_or_else(|| Arc::new(ChronilogConsole::for_stream(stream)))
    }

    /// Print each distinct warning once per registry.
    fn report(&self, warnings: &[ConfigWarning]) {
        if warnings.is_empty() {
            return;
        }
        for warning in warnings {
            self.notice(warning.to_string());
        }
    }

    fn notice(&self, text: String) {
        let mut reported = self.reported.lock().unwrap_or_else(PoisonError::into_inner);
        if !reported.contains(&text) {
            crate::console::console().warn(&format!("⚠️ chronilog: {text}"));
            reported.insert(text);
        }
    }
}

impl std::fmt::Debug for LoggerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerRegistry")
            .field("source", &self.source)
            .field("cached", &self.cached_count())
            .finish_non_exhaustive()
    }
}

/// File formatter: JSON, plain, or decorated without color.
pub fn file_formatter(config: &ChronilogConfig) -> Arc<dyn Formatter> {
    let ts = config.timestamp_format.as_str();
    match config.log_format {
        LogFormat::Json => Arc::new(JsonFormatter::new().with_timestamp_format(ts)),
        LogFormat::Default if config.disable_rich_format => {
            Arc::new(PlainFormatter::new().with_timestamp_format(ts))
        }
        LogFormat::Default => Arc::new(DecoratedFormatter::uncolored().with_timestamp_format(ts)),
    }
}

/// Console formatter: JSON, plain for non-rich streams, decorated
/// otherwise. Emoji become ASCII when the stream cannot show them.
pub fn console_formatter(config: &ChronilogConfig, console: &ChronilogConsole) -> Arc<dyn Formatter> {
    let ts = config.timestamp_format.as_str();
    let ascii = config.emoji_fallback && !console.supports_emoji();
    match config.log_format {
        LogFormat::Json => Arc::new(JsonFormatter::new().with_timestamp_format(ts)),
        LogFormat::Default if config.disable_rich_format || !console.is_rich() => Arc::new(
            PlainFormatter::new()
                .with_timestamp_format(ts)
                .with_ascii_emoji(ascii),
        ),
        LogFormat::Default => Arc::new(
            DecoratedFormatter::new()
                .with_timestamp_format(ts)
                .with_ascii_emoji(ascii),
        ),
    }
}

static DEFAULT_REGISTRY: OnceLock<LoggerRegistry> = OnceLock::new();

/// Process-wide registry used by [`get_logger`].
#[must_use]
pub fn default_registry() -> &'static LoggerRegistry {
    DEFAULT_REGISTRY.get_or_init(LoggerRegistry::new)
}

/// Cached logger for `name` from the default registry.
pub fn get_logger(name: &str) -> ChronilogResult<Arc<Logger>> {
    default_registry().get_logger(name)
}
