//! Configured console wrapper
//!
//! [`ChronilogConsole`] is the single place where Chronilog writes
//! human-facing text: wizard prompts and previews, diagnostics, console
//! sink output and internal notices.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, OnceLock};

use console::{Style, Term};

use crate::config::ConsoleStream;
use crate::detection::{DisplayContext, supports_emoji};
use crate::format::ascii_fallback;

/// Console for rich or plain line output.
pub struct ChronilogConsole {
    inner: Mutex<Box<dyn Write + Send>>,
    /// `None` for injected writers.
    stream: Option<ConsoleStream>,
    enabled: bool,
    emoji: bool,
}

impl ChronilogConsole {
    /// Console on stdout with automatic detection.
    #[must_use]
    pub fn stdout() -> Self {
        Self::for_stream(ConsoleStream::Stdout)
    }

    /// Console on stderr with automatic detection.
    #[must_use]
    pub fn stderr() -> Self {
        Self::for_stream(ConsoleStream::Stderr)
    }

    /// Console on `stream` with automatic detection.
    #[must_use]
    pub fn for_stream(stream: ConsoleStream) -> Self {
        let enabled = DisplayContext::detect(stream).is_rich();
        let writer: Box<dyn Write + Send> = match stream {
            ConsoleStream::Stdout => Box::new(io::stdout()),
            ConsoleStream::Stderr => Box::new(io::stderr()),
        };
        Self {
            inner: Mutex::new(writer),
            stream: Some(stream),
            enabled,
            emoji: supports_emoji(stream),
        }
    }

    /// Create with custom writer (for testing)
    #[must_use]
    pub fn with_writer<W: Write + Send + 'static>(writer: W, enabled: bool) -> Self {
        Self {
            inner: Mutex::new(Box::new(writer)),
            stream: None,
            enabled,
            emoji: true,
        }
    }

    /// Override emoji capability.
    #[must_use]
    pub fn with_emoji(mut self, emoji: bool) -> Self {
        self.emoji = emoji;
        self
    }

    // ─────────────────────────────────────────────────
    // State Queries
    // ─────────────────────────────────────────────────

    /// Check if rich output is enabled
    pub fn is_rich(&self) -> bool {
        self.enabled
    }

    /// Whether emoji can be printed as-is.
    pub fn supports_emoji(&self) -> bool {
        self.emoji
    }

    /// Width of the terminal behind this console's stream (or default 80)
    pub fn width(&self) -> usize {
        match self.stream {
            Some(ConsoleStream::Stdout) if self.enabled => usize::from(Term::stdout().size().1),
            Some(ConsoleStream::Stderr) if self.enabled => usize::from(Term::stderr().size().1),
            _ => 80,
        }
    }

    // ─────────────────────────────────────────────────
    // Output Methods
    // ─────────────────────────────────────────────────

    /// Write one line, replacing emoji when the stream cannot show them.
    pub fn print(&self, line: &str) {
        let line = if self.emoji {
            line.into()
        } else {
            ascii_fallback(line)
        };
        let _ = self.write_line(&line);
    }

    /// Print text with a style; plain consoles drop the style.
    pub fn print_styled(&self, text: &str, style: &Style) {
        if self.enabled {
            let styled = style.clone().force_styling(true).apply_to(text).to_string();
            self.print(&styled);
        } else {
            self.print(text);
        }
    }

    /// Print a horizontal rule
    pub fn rule(&self, title: Option<&str>) {
        if self.enabled {
            let width = self.width().clamp(20, 100);
            let line = match title {
                Some(t) => {
                    let side = width.saturating_sub(t.chars().count() + 2) / 2;
                    format!("{0} {t} {0}", "─".repeat(side))
                }
                None => "─".repeat(width),
            };
            self.print_styled(&line, &Style::new().dim());
        } else {
            match title {
                Some(t) => self.print(&format!("--- {t} ---")),
                None => self.print("---"),
            }
        }
    }

    /// Print a blank line
    pub fn newline(&self) {
        self.print("");
    }

    /// Green success line.
    pub fn success(&self, text: &str) {
        self.print_styled(text, &Style::new().green());
    }

    /// Yellow warning line.
    pub fn warn(&self, text: &str) {
        self.print_styled(text, &Style::new().yellow());
    }

    /// Red error line.
    pub fn error(&self, text: &str) {
        self.print_styled(text, &Style::new().red().bold());
    }

    /// Bold heading.
    pub fn heading(&self, text: &str) {
        self.print_styled(text, &Style::new().bold());
    }

    /// Write a preformatted line without emoji substitution.
    ///
    /// Used by the console sink, whose formatter already decided.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut writer = self
            .inner
            .lock()
            .map_err(|_| io::Error::other("console writer poisoned"))?;
        // One write per line keeps captured output line-aligned.
        writer.write_all(format!("{line}\n").as_bytes())?;
        writer.flush()
    }
}

impl fmt::Debug for ChronilogConsole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChronilogConsole")
            .field("stream", &self.stream)
            .field("enabled", &self.enabled)
            .field("emoji", &self.emoji)
            .finish_non_exhaustive()
    }
}

// ─────────────────────────────────────────────────────────
// Global Console Accessor
// ─────────────────────────────────────────────────────────

static CONSOLE: OnceLock<ChronilogConsole> = OnceLock::new();

/// Stderr console for Chronilog's own notices (config warnings, sink
/// failures).
#[must_use]
pub fn console() -> &'static ChronilogConsole {
    CONSOLE.get_or_init(ChronilogConsole::stderr)
}
