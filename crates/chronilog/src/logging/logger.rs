//! The `Logger` facade.
//!
//! A logger owns a list of routes, each pairing a [`Sink`] with the
//! [`Formatter`] that renders records for it.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use chronilog::format::PlainFormatter;
//! use chronilog::sink::MemorySink;
//! use chronilog::{Level, Logger};
//!
//! let sink = MemorySink::new();
//! let logger = Logger::builder("app")
//!     .level(Level::Info)
//!     .route(Arc::new(sink.clone()), Arc::new(PlainFormatter::new()))
//!     .build();
//!
//! logger.debug("dropped");
//! logger.success("deployed");
//! assert_eq!(sink.lines().len(), 1);
//! assert!(sink.lines()[0].contains("[SUCCESS] app: deployed"));
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::format::{Formatter, LogRecord};
use crate::level::Level;
use crate::sink::Sink;

/// A sink and the formatter used for it.
#[derive(Clone)]
pub struct Route {
    pub sink: Arc<dyn Sink>,
    pub formatter: Arc<dyn Formatter>,
}

/// Named, leveled logger.
///
/// Logging calls never fail: sink errors are counted (see
/// [`sink_errors`](Self::sink_errors)) and the first one is reported on
/// stderr.
pub struct Logger {
    name: String,
    min_level: Level,
    /// False when the name does not match the module prefix filter.
    accepted: bool,
    routes: Vec<Route>,
    sink_errors: AtomicU64,
    reported: AtomicBool,
}

impl Logger {
    /// Create a logger using the builder pattern.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min_level(&self) -> Level {
        self.min_level
    }

    /// Number of routes (sinks) attached.
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Whether a record at `level` would be written anywhere.
    pub fn is_enabled_for(&self, level: Level) -> bool {
        self.accepted && !self.routes.is_empty() && level.passes(self.min_level)
    }

    /// Failed sink writes since creation.
    pub fn sink_errors(&self) -> u64 {
        self.sink_errors.load(Ordering::Relaxed)
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log(Level::Debug, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(Level::Info, message);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.log(Level::Success, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.log(Level::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(Level::Error, message);
    }

    pub fn critical(&self, message: impl Into<String>) {
        self.log(Level::Critical, message);
    }

    pub fn log(&self, level: Level, message: impl Into<String>) {
        if self.is_enabled_for(level) {
            self.emit(LogRecord::new(level, self.name.as_str(), message));
        }
    }

    /// Log with structured extras rendered after the message.
    pub fn log_with<I, K, V>(&self, level: Level, message: impl Into<String>, fields: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        if self.is_enabled_for(level) {
            self.emit(LogRecord::new(level, self.name.as_str(), message).with_fields(fields));
        }
    }

    /// Write a prepared record to every route, subject to the level and
    /// prefix filters.
    pub fn emit(&self, record: LogRecord) {
        if !self.is_enabled_for(record.level) {
            return;
        }
        for route in &self.routes {
            let line = route.formatter.format(&record);
            if let Err(e) = route.sink.write_line(&line) {
                self.sink_failed(&e);
            }
        }
    }

    pub fn flush(&self) {
        for route in &self.routes {
            if let Err(e) = route.sink.flush() {
                self.sink_failed(&e);
            }
        }
    }

    fn sink_failed(&self, error: &std::io::Error) {
        self.sink_errors.fetch_add(1, Ordering::Relaxed);
        if !self.reported.swap(true, Ordering::Relaxed) {
            crate::console::console().warn(&format!(
                "chronilog: logger '{}' failed to write a record: {error} (further failures are counted silently)",
                self.name
            ));
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("min_level", &self.min_level)
            .field("accepted", &self.accepted)
            .field("routes", &self.routes.len())
            .field("sink_errors", &self.sink_errors())
            .finish()
    }
}

/// Builder for a [`Logger`].
pub struct LoggerBuilder {
    name: String,
    min_level: Level,
    module_prefix: Option<String>,
    routes: Vec<Route>,
}

impl LoggerBuilder {
    /// New builder; the minimum level defaults to DEBUG.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            min_level: Level::Debug,
            module_prefix: None,
            routes: Vec::new(),
        }
    }

    /// Set the minimum log level.
    #[must_use]
    pub fn level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    /// Silence the logger unless its name starts with `prefix`.
    #[must_use]
    pub fn module_prefix(mut self, prefix: Option<String>) -> Self {
        self.module_prefix = prefix.filter(|p| !p.is_empty());
        self
    }

    /// Attach a sink with its formatter.
    #[must_use]
    pub fn route(mut self, sink: Arc<dyn Sink>, formatter: Arc<dyn Formatter>) -> Self {
        self.routes.push(Route { sink, formatter });
        self
    }

    #[must_use]
    pub fn build(self) -> Logger {
        let accepted = self
            .module_prefix
            .as_deref()
            .is_none_or(|prefix| self.name.starts_with(prefix));
        Logger {
            name: self.name,
            min_level: self.min_level,
            accepted,
            routes: self.routes,
            sink_errors: AtomicU64::new(0),
            reported: AtomicBool::new(false),
        }
    }
}
