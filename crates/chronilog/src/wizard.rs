//! Interactive config wizard.
//!
//! Walks the schema in order, asks one question per field and either
//! previews the resulting `.chronilog.toml` or writes it.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use console::Style;
use tempfile::NamedTempFile;

use crate::config::{BodyLine, CONFIG_FILE_NAME, ConfigDocument, SCHEMA};
use crate::console::ChronilogConsole;
use crate::error::{ChronilogError, ChronilogResult};
use crate::prompt::{InquirePrompter, Prompter, prompt_field};

/// How a wizard run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardOutcome {
    /// The document was written to the path.
    Written(PathBuf, ConfigDocument),
    /// Dry run: the document was only printed.
    Previewed(ConfigDocument),
    /// The operator declined to overwrite an existing file.
    Aborted,
}

impl WizardOutcome {
    /// The collected document, unless the run was aborted.
    pub fn into_document(self) -> Option<ConfigDocument> {
        match self {
            WizardOutcome::Written(_, doc) | WizardOutcome::Previewed(doc) => Some(doc),
            WizardOutcome::Aborted => None,
        }
    }
}

/// The config wizard, generic over how answers are obtained.
pub struct Wizard<P> {
    prompter: P,
    console: Arc<ChronilogConsole>,
    target: PathBuf,
}

impl<P: Prompter> Wizard<P> {
    /// Wizard writing `.chronilog.toml` in the current directory.
    pub fn new(prompter: P, console: Arc<ChronilogConsole>) -> Self {
        Self {
            prompter,
            console,
            target: PathBuf::from(CONFIG_FILE_NAME),
        }
    }

    #[must_use]
    pub fn with_target(mut self, target: impl Into<PathBuf>) -> Self {
        self.target = target.into();
        self
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Ask every schema question, in order.
    pub fn collect(&mut self) -> ChronilogResult<ConfigDocument> {
        let values = SCHEMA
            .iter()
            .map(|field| prompt_field(&mut self.prompter, field))
            .collect::<ChronilogResult<Vec<_>>>()?;
        ConfigDocument::from_values(values)
    }

    /// Run the wizard. A dry run never touches the filesystem.
    pub fn run(&mut self, dry_run: bool) -> ChronilogResult<WizardOutcome> {
        self.banner();
        let doc = self.collect()?;

        if dry_run {
            self.preview(&doc);
            return Ok(WizardOutcome::Previewed(doc));
        }

        if self.target.exists() {
            self.console.newline();
            let question = format!("⚠️ {} already exists. Overwrite?", self.file_name());
            if !self.prompter.confirm(&question, false)? {
                self.console.warn("❌ Aborting config creation.");
                self.console.newline();
                return Ok(WizardOutcome::Aborted);
            }
        }

        write_atomic(&self.target, &doc.render_toml())?;

        let shown = fs::canonicalize(&self.target).unwrap_or_else(|_| self.target.clone());
        self.console.newline();
        self.console.success(&format!(
            "✅ {} created at {}",
            self.file_name(),
            shown.display()
        ));
        self.console.newline();
        Ok(WizardOutcome::Written(self.target.clone(), doc))
    }

    fn file_name(&self) -> String {
        self.target.file_name().map_or_else(
            || self.target.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        )
    }

    fn banner(&self) {
        self.console.newline();
        self.console
            .print_styled("Chronilog Config Wizard 🛠️", &Style::new().cyan().bold());
        self.console.print(&format!(
            "This will create a {} file in the current directory.",
            self.file_name()
        ));
        self.console.newline();
    }

    fn preview(&self, doc: &ConfigDocument) {
        self.console.newline();
        self.console
            .heading(&format!("📄 Preview of {} (not written):", self.file_name()));
        self.console.newline();
        self.console.print_styled(
            "# You can copy and paste this manually",
            &Style::new().italic().dim(),
        );
        self.console.newline();
        for line in doc.body_lines() {
            match line {
                BodyLine::Section(s) => self.console.print_styled(&s, &Style::new().green().bold()),
                BodyLine::Comment(s) => self.console.print_styled(&s, &Style::new().dim()),
                BodyLine::Entry(s) => self.console.print(&s),
                BodyLine::Blank => self.console.newline(),
            }
        }
    }
}

/// Run the wizard on the process terminal against `./.chronilog.toml`.
///
/// Returns the collected document, or `None` when the operator declined
/// to overwrite an existing file.
pub fn run_wizard(dry_run: bool) -> ChronilogResult<Option<ConfigDocument>> {
    let mut wizard = Wizard::new(InquirePrompter::new(), Arc::new(ChronilogConsole::stdout()));
    Ok(wizard.run(dry_run)?.into_document())
}

/// Write `contents` to a temp file beside `path`, then rename over it.
pub fn write_atomic(path: &Path, contents: &str) -> ChronilogResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| ChronilogError::io(dir, e))?;
    tmp.write_all(contents.as_bytes())
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| ChronilogError::io(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| ChronilogError::io(path, e.error))?;
    Ok(())
}
