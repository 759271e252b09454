//! TestConsole for capturing output in tests

use std::io::Write;
use std::sync::{Arc, Mutex};

use strip_ansi_escapes::strip;

use crate::console::ChronilogConsole;

/// A console that captures output for assertions.
///
/// Pass `console()` to the code under test, then inspect `output()` or
/// use the assertion helpers.
#[derive(Clone)]
pub struct TestConsole {
    inner: Arc<ChronilogConsole>,
    buffer: Arc<Mutex<TestBuffer>>,
}

#[derive(Debug, Default)]
struct TestBuffer {
    /// Lines with ANSI codes stripped
    lines: Vec<String>,
    /// Lines with ANSI codes preserved
    raw_lines: Vec<String>,
}

impl TestConsole {
    /// Plain console capturing output.
    #[must_use]
    pub fn new() -> Self {
        Self::build(false, true)
    }

    /// Rich console; raw output keeps ANSI styles.
    #[must_use]
    pub fn new_rich() -> Self {
        Self::build(true, true)
    }

    /// Plain console that reports no emoji support.
    #[must_use]
    pub fn without_emoji() -> Self {
        Self::build(false, false)
    }

    fn build(rich: bool, emoji: bool) -> Self {
        let buffer = Arc::new(Mutex::new(TestBuffer::default()));
        let writer = BufferWriter(Arc::clone(&buffer));
        Self {
            inner: Arc::new(ChronilogConsole::with_writer(writer, rich).with_emoji(emoji)),
            buffer,
        }
    }

    /// Get the underlying console for passing to code under test
    #[must_use]
    pub fn console(&self) -> &ChronilogConsole {
        &self.inner
    }

    /// Shared handle to the underlying console.
    #[must_use]
    pub fn shared(&self) -> Arc<ChronilogConsole> {
        Arc::clone(&self.inner)
    }

    /// Get all captured output (ANSI codes stripped)
    #[must_use]
    pub fn output(&self) -> Vec<String> {
        self.buffer
            .lock()
            .map(|b| b.lines.clone())
            .unwrap_or_default()
    }

    /// Get all captured output (with ANSI codes)
    #[must_use]
    pub fn raw_output(&self) -> Vec<String> {
        self.buffer
            .lock()
            .map(|b| b.raw_lines.clone())
            .unwrap_or_default()
    }

    /// Get output as a single string
    #[must_use]
    pub fn output_string(&self) -> String {
        self.output().join("\n")
    }

    /// Check if output contains a string (case-insensitive)
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.output_string()
            .to_lowercase()
            .contains(&needle.to_lowercase())
    }

    /// Check if output contains all of the given strings
    #[must_use]
    pub fn contains_all(&self, needles: &[&str]) -> bool {
        needles.iter().all(|n| self.contains(n))
    }

    /// Check if output matches a regex pattern
    #[must_use]
    pub fn matches(&self, pattern: &str) -> bool {
        regex::Regex::new(pattern).is_ok_and(|re| re.is_match(&self.output_string()))
    }

    /// Assert that output contains a string
    ///
    /// # Panics
    ///
    /// Panics if the output does not contain the needle string.
    pub fn assert_contains(&self, needle: &str) {
        assert!(
            self.contains(needle),
            "Output did not contain '{}'. Actual output:\n{}",
            needle,
            self.output_string()
        );
    }

    /// Assert that output does NOT contain a string
    ///
    /// # Panics
    ///
    /// Panics if the output contains the needle string.
    pub fn assert_not_contains(&self, needle: &str) {
        assert!(
            !self.contains(needle),
            "Output unexpectedly contained '{}'. Actual output:\n{}",
            needle,
            self.output_string()
        );
    }

    /// Clear the buffer
    pub fn clear(&self) {
        if let Ok(mut buf) = self.buffer.lock() {
            buf.lines.clear();
            buf.raw_lines.clear();
        }
    }

    #[must_use]
    pub fn is_rich(&self) -> bool {
        self.inner.is_rich()
    }
}

impl Default for TestConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TestConsole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestConsole")
            .field("is_rich", &self.is_rich())
            .field("line_count", &self.output().len())
            .finish()
    }
}

/// Writer that captures to a buffer
struct BufferWriter(Arc<Mutex<TestBuffer>>);

impl Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let s = String::from_utf8_lossy(buf);

        if let Ok(mut buffer) = self.0.lock() {
            buffer.raw_lines.extend(s.lines().map(String::from));

            let stripped = strip(buf);
            let stripped_str = String::from_utf8_lossy(&stripped);
            buffer.lines.extend(stripped_str.lines().map(String::from));
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
