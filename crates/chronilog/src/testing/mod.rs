//! Testing utilities for Chronilog output
//!
//! [`TestConsole`] captures console output for assertions; [`MemorySink`]
//! captures the lines a logger emits.

mod test_console;

pub use crate::sink::MemorySink;
pub use test_console::TestConsole;
