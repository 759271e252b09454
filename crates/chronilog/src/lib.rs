#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

pub mod config;
pub mod console;
pub mod detection;
pub mod diagnostics; // Environment report
pub mod error;
pub mod format; // Decorated, plain and JSON formatters
pub mod level;
pub mod logging; // Logger, registry, log/tracing bridges
pub mod prompt;
pub mod sink;
pub mod testing; // Test utilities
pub mod wizard; // `.chronilog.toml` wizard

pub use config::{ChronilogConfig, ConfigDocument, ConfigSource, ConfigValue};
pub use crate::console::console;
pub use detection::{DisplayContext, should_enable_rich};
pub use diagnostics::{Diagnostics, print_diagnostics};
pub use error::{ChronilogError, ChronilogResult};
pub use level::Level;
pub use logging::{
    ChronilogLayer, LogBridge, Logger, LoggerOptions, LoggerRegistry, get_logger, init_log_bridge,
};
pub use wizard::{Wizard, WizardOutcome, run_wizard};
