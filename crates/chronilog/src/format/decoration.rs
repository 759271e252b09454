//! Static lookup tables: per-level decoration and emoji fallbacks.

use std::borrow::Cow;

use console::Color;

use crate::level::Level;

/// How a level is decorated in rich output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelDecoration {
    pub emoji: &'static str,
    pub color: Color,
    pub bold: bool,
}

/// Decoration used for levels without an entry (custom severities).
pub const NEUTRAL: LevelDecoration = LevelDecoration {
    emoji: "•",
    color: Color::White,
    bold: false,
};

pub const LEVEL_DECORATIONS: [(Level, LevelDecoration); 6] = [
    (
        Level::Debug,
        LevelDecoration {
            emoji: "🐛",
            color: Color::Blue,
            bold: false,
        },
    ),
    (
        Level::Info,
        LevelDecoration {
            emoji: "ℹ️",
            color: Color::Cyan,
            bold: false,
        },
    ),
    (
        Level::Success,
        LevelDecoration {
            emoji: "✅",
            color: Color::Green,
            bold: false,
        },
    ),
    (
        Level::Warning,
        LevelDecoration {
            emoji: "⚠️",
            color: Color::Yellow,
            bold: false,
        },
    ),
    (
        Level::Error,
        LevelDecoration {
            emoji: "❌",
            color: Color::Red,
            bold: false,
        },
    ),
    (
        Level::Critical,
        LevelDecoration {
            emoji: "🔥",
            color: Color::Red,
            bold: true,
        },
    ),
];

/// Decoration for `level`, or [`NEUTRAL`].
pub fn decoration(level: Level) -> &'static LevelDecoration {
    LEVEL_DECORATIONS
        .iter()
        .find(|(l, _)| *l == level)
        .map_or(&NEUTRAL, |(_, d)| d)
}

/// Emoji → ASCII token. Sequences with a variation selector come before
/// their bare form so the longer match wins.
pub const EMOJI_FALLBACKS: &[(&str, &str)] = &[
    ("⚠️", "[!]"),
    ("⚠", "[!]"),
    ("ℹ️", "[i]"),
    ("ℹ", "[i]"),
    ("🛠️", "[#]"),
    ("🛠", "[#]"),
    ("⏱️", "[time]"),
    ("⏱", "[time]"),
    ("🖥️", "[tty]"),
    ("🖥", "[tty]"),
    ("✅", "[OK]"),
    ("✓", "[OK]"),
    ("❌", "[X]"),
    ("✗", "[X]"),
    ("🔥", "[!!]"),
    ("🐛", "[DBG]"),
    ("🚀", "[>>]"),
    ("🔧", "[~]"),
    ("🧪", "[T]"),
    ("📁", "[dir]"),
    ("📄", "[doc]"),
    ("📦", "[pkg]"),
    ("📤", "[out]"),
    ("🔁", "[R]"),
    ("🔄", "[R]"),
    ("🔍", "[?]"),
    ("🧹", "[clean]"),
    ("🪵", "[log]"),
    ("💡", "[tip]"),
    ("😃", ":)"),
    ("•", "*"),
];

/// Replace every emoji in `text` with its ASCII token.
///
/// Pictographs without a table entry become `?`; stray variation selectors
/// are dropped.
pub fn ascii_fallback(text: &str) -> Cow<'_, str> {
    if text.is_ascii() {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    'scan: while let Some(ch) = rest.chars().next() {
        for (emoji, token) in EMOJI_FALLBACKS {
            if let Some(after) = rest.strip_prefix(emoji) {
                out.push_str(token);
                rest = after;
                continue 'scan;
            }
        }
        match ch {
            '\u{FE0F}' | '\u{200D}' => {}
            c if is_pictograph(c) => out.push('?'),
            c => out.push(c),
        }
        rest = &rest[ch.len_utf8()..];
    }
    Cow::Owned(out)
}

fn is_pictograph(c: char) -> bool {
    matches!(c as u32, 0x1F000..=0x1FAFF | 0x2600..=0x27BF | 0x2B00..=0x2BFF)
}
