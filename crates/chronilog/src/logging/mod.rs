//! Loggers and how they are obtained.
//!
//! - [`Logger`] - named, leveled facade over sinks and formatters
//! - [`LoggerRegistry`] - resolves configuration, caches loggers and
//!   shares file sinks
//! - [`LogBridge`] - a `log` crate logger writing through a registry
//! - [`ChronilogLayer`] - a `tracing` layer writing through a registry
//!
//! # Example
//!
//! ```no_run
//! let log = chronilog::get_logger("app")?;
//! log.info("starting");
//! log.success("ready");
//! # Ok::<(), chronilog::ChronilogError>(())
//! ```

mod bridge;
mod layer;
mod logger;
mod registry;

pub use bridge::{LogBridge, init_log_bridge};
pub use layer::ChronilogLayer;
pub use logger::{Logger, LoggerBuilder, Route};
pub use registry::{
    LoggerOptions, LoggerRegistry, console_formatter, default_registry, file_formatter,
    get_logger,
};
