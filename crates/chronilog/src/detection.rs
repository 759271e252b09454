//! Rich/plain output detection.
//!
//! Decides whether a console stream gets colored, emoji-decorated output.

use console::Term;

use crate::config::ConsoleStream;

/// Display context for a console stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayContext {
    /// Colors and emoji.
    #[default]
    Rich,
    /// Plain text for pipes, CI and `NO_COLOR`.
    Plain,
}

impl DisplayContext {
    /// Auto-detect the context for `stream` from the environment.
    #[must_use]
    pub fn detect(stream: ConsoleStream) -> Self {
        if should_enable_rich(stream) {
            Self::Rich
        } else {
            Self::Plain
        }
    }

    #[must_use]
    pub fn is_rich(&self) -> bool {
        matches!(self, Self::Rich)
    }

    #[must_use]
    pub fn is_plain(&self) -> bool {
        matches!(self, Self::Plain)
    }
}

fn term(stream: ConsoleStream) -> Term {
    match stream {
        ConsoleStream::Stdout => Term::stdout(),
        ConsoleStream::Stderr => Term::stderr(),
    }
}

/// Whether plain output was requested through the environment.
#[must_use]
pub fn plain_requested() -> bool {
    plain_requested_with(|k| std::env::var(k).ok())
}

/// [`plain_requested`] with an explicit environment lookup.
pub fn plain_requested_with<E>(env: E) -> bool
where
    E: Fn(&str) -> Option<String>,
{
    env("CHRONILOG_PLAIN").is_some() || env("NO_COLOR").is_some() || env("CI").is_some()
}

/// Determine if rich output should be enabled on `stream`.
#[must_use]
pub fn should_enable_rich(stream: ConsoleStream) -> bool {
    // Explicit enable always wins
    if std::env::var("CHRONILOG_FORCE_COLOR").is_ok() {
        return true;
    }
    if plain_requested() {
        return false;
    }

    let colors = match stream {
        ConsoleStream::Stdout => console::colors_enabled(),
        ConsoleStream::Stderr => console::colors_enabled_stderr(),
    };
    colors && term(stream).is_term()
}

/// Whether `stream` can be expected to render emoji.
#[must_use]
pub fn supports_emoji(stream: ConsoleStream) -> bool {
    locale_is_utf8_with(|k| std::env::var(k).ok()) || term(stream).features().wants_emoji()
}

/// Whether the locale variables announce UTF-8.
///
/// `LC_ALL` overrides `LC_CTYPE`, which overrides `LANG`.
pub fn locale_is_utf8_with<E>(env: E) -> bool
where
    E: Fn(&str) -> Option<String>,
{
    ["LC_ALL", "LC_CTYPE", "LANG"]
        .into_iter()
        .find_map(|k| env(k).filter(|v| !v.is_empty()))
        .is_some_and(|v| {
            let v = v.to_ascii_lowercase();
            v.contains("utf-8") || v.contains("utf8")
        })
}
