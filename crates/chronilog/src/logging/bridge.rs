//! `log` crate integration.
//!
//! Routes records from the `log` facade into Chronilog loggers, using the
//! record target as the logger name.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use chronilog::{LoggerRegistry, init_log_bridge};
//!
//! init_log_bridge(Arc::new(LoggerRegistry::new()))?;
//! log::info!(target: "app.db", "pool ready");
//! ```

use std::sync::Arc;

use log::{LevelFilter, Log, Metadata, Record};

use super::registry::LoggerRegistry;
use crate::format::LogRecord;
use crate::level::Level;

/// `log::Log` implementation backed by a [`LoggerRegistry`].
#[derive(Debug)]
pub struct LogBridge {
    registry: Arc<LoggerRegistry>,
}

impl LogBridge {
    #[must_use]
    pub fn new(registry: Arc<LoggerRegistry>) -> Self {
        Self { registry }
    }

    fn to_record(record: &Record) -> LogRecord {
        let mut out = LogRecord::new(
            Level::from(record.level()),
            record.target(),
            record.args().to_string(),
        );
        if let (Some(file), Some(line)) = (record.file(), record.line()) {
            out = out.with_field("at", format!("{file}:{line}"));
        }
        out
    }
}

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.registry
            .would_log(metadata.target(), Level::from(metadata.level()))
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // One cached logger per target. Targets are module paths or
        // literals, so the set is bounded by the program's call sites.
        // Construction errors cannot be surfaced through `log`.
        if let Ok(logger) = self.registry.get_logger(record.target()) {
            logger.emit(Self::to_record(record));
        }
    }

    fn flush(&self) {}
}

/// Install a [`LogBridge`] as the global `log` logger.
///
/// Returns an error if a logger has already been set.
pub fn init_log_bridge(registry: Arc<LoggerRegistry>) -> Result<(), log::SetLoggerError> {
    log::set_boxed_logger(Box::new(LogBridge::new(registry)))?;
    log::set_max_level(LevelFilter::Trace);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigDocument, ConfigSource, schema};
    use crate::testing::TestConsole;

    fn bridge(level: &str) -> (LogBridge, TestConsole) {
        let tc = TestConsole::new();
        let mut doc = ConfigDocument::defaults();
        doc.set(schema::LOG_PATH, "").unwrap();
        doc.set(schema::ENABLE_CONSOLE, true).unwrap();
        doc.set(schema::LOG_LEVEL, level).unwrap();
        let registry =
            LoggerRegistry::with_source(ConfigSource::Document(doc)).with_console(tc.shared());
        (LogBridge::new(Arc::new(registry)), tc)
    }

    #[test]
    fn test_bridge_routes_by_target() {
        let (bridge, tc) = bridge("DEBUG");
        bridge.log(
            &Record::builder()
                .level(log::Level::Warn)
                .target("app.db")
                .args(format_args!("slow query"))
                .build(),
        );
        assert_eq!(tc.output().len(), 1);
        assert!(tc.output()[0].contains("[WARNING] app.db: slow query"));
    }

    #[test]
    fn test_bridge_enabled_follows_logger_level() {
        let (bridge, _tc) = bridge("INFO");
        let meta = |level| Metadata::builder().level(level).target("app").build();
        assert!(bridge.enabled(&meta(log::Level::Error)));
        assert!(bridge.enabled(&meta(log::Level::Info)));
        assert!(!bridge.enabled(&meta(log::Level::Debug)));
        assert!(!bridge.enabled(&meta(log::Level::Trace)));
    }

    #[test]
    fn test_bridge_skips_disabled_targets_without_caching() {
        let (bridge, tc) = bridge("INFO");
        let meta = Metadata::builder()
            .level(log::Level::Info)
            .target("app.cold")
            .build();
        assert!(bridge.enabled(&meta));
        bridge.log(
            &Record::builder()
                .level(log::Level::Debug)
                .target("app.noisy")
                .args(format_args!("dropped"))
                .build(),
        );
        assert_eq!(bridge.registry.cached_count(), 0);
        assert!(tc.output().is_empty());
    }

    #[test]
    fn test_bridge_adds_location() {
        let (bridge, tc) = bridge("DEBUG");
        bridge.log(
            &Record::builder()
                .level(log::Level::Info)
                .target("app")
                .file(Some("src/main.rs"))
                .line(Some(42))
                .args(format_args!("hello"))
                .build(),
        );
        assert!(tc.output()[0].ends_with("app: hello at=src/main.rs:42"));
    }
}
