//! Output destinations for rendered lines.

mod file;

use std::io;
use std::sync::{Arc, Mutex};

pub use file::{FileSink, backup_path};

use crate::config::ConsoleStream;
use crate::console::ChronilogConsole;

/// Destination for rendered lines.
///
/// Implementations serialize their own writes; a sink may be shared by
/// several loggers.
pub trait Sink: Send + Sync {
    /// Write one line; the sink appends the line terminator.
    fn write_line(&self, line: &str) -> io::Result<()>;

    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Sink writing to stdout or stderr through a [`ChronilogConsole`].
#[derive(Debug, Clone)]
pub struct ConsoleSink {
    console: Arc<ChronilogConsole>,
}

impl ConsoleSink {
    /// Console sink on `stream` with automatic rich detection.
    pub fn new(stream: ConsoleStream) -> Self {
        Self::with_console(Arc::new(ChronilogConsole::for_stream(stream)))
    }

    pub fn with_console(console: Arc<ChronilogConsole>) -> Self {
        Self { console }
    }

    pub fn console(&self) -> &ChronilogConsole {
        &self.console
    }
}

impl Sink for ConsoleSink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        self.console.write_line(line)
    }
}

/// Sink that keeps every line in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.clear();
        }
    }
}

impl Sink for MemorySink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        self.lines
            .lock()
            .map_err(|_| io::Error::other("memory sink poisoned"))?
            .push(line.to_string());
        Ok(())
    }
}
