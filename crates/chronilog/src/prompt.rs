//! Prompt helpers with inquire → stdin fallback.
//!
//! The wizard talks to a [`Prompter`]. [`InquirePrompter`] drives an
//! interactive terminal and degrades to plain line prompts when `inquire`
//! cannot run (piped stdin, no TTY). [`LinePrompter`] works on any reader
//! and writer, which is also what the tests use.

use std::io::{self, BufRead, IsTerminal, StdinLock, Stdout, Write};

use inquire::{Confirm, CustomType, InquireError, Text};

use crate::config::{ConfigValue, FieldKind, SchemaField};
use crate::error::{ChronilogError, ChronilogResult};

/// Asks the operator for typed values.
///
/// Empty input accepts the default. Invalid input is re-prompted and
/// never surfaces as an error.
pub trait Prompter {
    fn confirm(&mut self, message: &str, default: bool) -> ChronilogResult<bool>;

    fn integer(&mut self, message: &str, default: i64) -> ChronilogResult<i64>;

    fn text(&mut self, message: &str, default: &str) -> ChronilogResult<String>;
}

/// Prompt for one schema field, choosing the prompt by the field's kind.
pub fn prompt_field<P>(prompter: &mut P, field: &SchemaField) -> ChronilogResult<ConfigValue>
where
    P: Prompter + ?Sized,
{
    let label = field.label();
    let value = match (field.kind(), field.default.to_value()) {
        (FieldKind::Bool, ConfigValue::Bool(default)) => {
            ConfigValue::Bool(prompter.confirm(&label, default)?)
        }
        (FieldKind::Integer, ConfigValue::Integer(default)) => {
            ConfigValue::Integer(prompter.integer(&label, default)?)
        }
        (_, default) => ConfigValue::Text(prompter.text(&label, &default.to_string())?),
    };
    Ok(value)
}

/// Line-oriented prompter over any reader and writer.
///
/// End of input is treated like an empty answer.
#[derive(Debug)]
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the writer (tests inspect what was prompted).
    pub fn into_output(self) -> W {
        self.output
    }

    fn ask(&mut self, prompt: &str) -> ChronilogResult<Option<String>> {
        write!(self.output, "{prompt}").map_err(prompt_io)?;
        self.output.flush().map_err(prompt_io)?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(prompt_io)?;
        if read == 0 {
            // Keep the transcript readable when input ends mid-prompt.
            writeln!(self.output).map_err(prompt_io)?;
            return Ok(None);
        }
        let answer = line.trim();
        Ok((!answer.is_empty()).then(|| answer.to_string()))
    }

    fn say(&mut self, text: &str) -> ChronilogResult<()> {
        writeln!(self.output, "{text}").map_err(prompt_io)
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn confirm(&mut self, message: &str, default: bool) -> ChronilogResult<bool> {
        let hint = if default { "y" } else { "n" };
        loop {
            let Some(answer) = self.ask(&format!("{message} [y/n] ({hint}): "))? else {
                return Ok(default);
            };
            match parse_yes_no(&answer) {
                Some(value) => return Ok(value),
                None => self.say("Please enter Y or N")?,
            }
        }
    }

    fn integer(&mut self, message: &str, default: i64) -> ChronilogResult<i64> {
        loop {
            let Some(answer) = self.ask(&format!("{message} ({default}): "))? else {
                return Ok(default);
            };
            match answer.parse::<i64>() {
                Ok(value) => return Ok(value),
                Err(_) => self.say("Please enter a valid integer number")?,
            }
        }
    }

    fn text(&mut self, message: &str, default: &str) -> ChronilogResult<String> {
        let prompt = if default.is_empty() {
            format!("{message}: ")
        } else {
            format!("{message} ({default}): ")
        };
        Ok(self.ask(&prompt)?.unwrap_or_else(|| default.to_string()))
    }
}

fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" => Some(true),
        "n" | "no" | "false" => Some(false),
        _ => None,
    }
}

fn prompt_io(e: io::Error) -> ChronilogError {
    ChronilogError::Prompt(e.to_string())
}

type StdinPrompter = LinePrompter<StdinLock<'static>, Stdout>;

/// Interactive prompter on the process terminal.
#[derive(Debug, Default)]
pub struct InquirePrompter {
    fallback: Option<StdinPrompter>,
}

impl InquirePrompter {
    /// Uses `inquire` when stdin is a terminal, plain line prompts
    /// otherwise.
    pub fn new() -> Self {
        let mut prompter = Self::default();
        if !io::stdin().is_terminal() {
            prompter.fallback();
        }
        prompter
    }

    fn fallback(&mut self) -> &mut StdinPrompter {
        self.fallback
            .get_or_insert_with(|| LinePrompter::new(io::stdin().lock(), io::stdout()))
    }

    fn run<T, F, G>(&mut self, interactive: F, plain: G) -> ChronilogResult<T>
    where
        F: FnOnce() -> Result<T, InquireError>,
        G: FnOnce(&mut StdinPrompter) -> ChronilogResult<T>,
    {
        if let Some(fallback) = self.fallback.as_mut() {
            return plain(fallback);
        }
        match interactive() {
            Ok(value) => Ok(value),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                Err(ChronilogError::Cancelled)
            }
            // Terminal unusable: stay on line prompts from here on.
            Err(_) => plain(self.fallback()),
        }
    }
}

impl Prompter for InquirePrompter {
    fn confirm(&mut self, message: &str, default: bool) -> ChronilogResult<bool> {
        self.run(
            || Confirm::new(message).with_default(default).prompt(),
            |p| p.confirm(message, default),
        )
    }

    fn integer(&mut self, message: &str, default: i64) -> ChronilogResult<i64> {
        self.run(
            || {
                CustomType::<i64>::new(message)
                    .with_default(default)
                    .with_error_message("Please enter a valid integer number")
                    .prompt()
            },
            |p| p.integer(message, default),
        )
    }

    fn text(&mut self, message: &str, default: &str) -> ChronilogResult<String> {
        self.run(
            || Text::new(message).with_default(default).prompt(),
            |p| p.text(message, default),
        )
    }
}
