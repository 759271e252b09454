//! Logs a simulated startup at every level, then prints diagnostics.
//!
//! ```text
//! cargo run -p chronilog --example usage
//! ```

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chronilog::format::PlainFormatter;
use chronilog::logging::default_registry;
use chronilog::{ChronilogResult, Level, LoggerOptions, print_diagnostics};

fn simulate_startup() -> ChronilogResult<()> {
    let logger = chronilog::get_logger("demo")?;

    logger.info("🚀 Application boot sequence initiated.");
    thread::sleep(Duration::from_millis(300));
    logger.debug("🔧 Initializing subsystems...");
    thread::sleep(Duration::from_millis(200));
    logger.warning("⚠️ Cache service failed to respond, using fallback mode.");
    thread::sleep(Duration::from_millis(200));
    logger.error("❌ Failed to connect to database. Retrying...");
    thread::sleep(Duration::from_millis(200));
    logger.critical("🔥 Fatal error: Cannot proceed without DB connection.");
    logger.success("✅ Recovered after failover.");
    logger.log_with(Level::Info, "🧪 Logging test complete.", [("steps", 6)]);
    Ok(())
}

fn custom_formatter() -> ChronilogResult<()> {
    let logger = default_registry().logger(
        "test_custom",
        LoggerOptions::new()
            .file_formatter(Arc::new(PlainFormatter::new()))
            .use_cache(false),
    )?;
    logger.info("Custom formatter test");
    Ok(())
}

fn main() -> ChronilogResult<()> {
    println!("[Chronilog Demo] Starting usage example...");
    simulate_startup()?;
    custom_formatter()?;
    print_diagnostics();
    Ok(())
}
