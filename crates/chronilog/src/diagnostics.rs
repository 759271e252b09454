//! Environment and configuration diagnostics.
//!
//! [`Diagnostics::collect`] gathers what Chronilog would do in the current
//! process: which config file it reads, the resolved settings, how the
//! console streams were detected and where the log file lives.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use chrono::Local;
use console::Style;
use serde::Serialize;

use crate::config::{ChronilogConfig, ConfigSource, ConsoleStream};
use crate::console::ChronilogConsole;
use crate::detection::{DisplayContext, supports_emoji};
use crate::error::ChronilogResult;
use crate::format::TimestampFormat;

/// Environment variables that influence Chronilog.
const WATCHED_ENV: &[&str] = &[
    "CHRONILOG_CONFIG",
    "CHRONILOG_LOG_LEVEL",
    "CHRONILOG_LOG_PATH",
    "CHRONILOG_PLAIN",
    "CHRONILOG_FORCE_COLOR",
    "NO_COLOR",
    "CI",
    "TERM",
    "LANG",
    "LC_ALL",
];

/// Serializable diagnostics report.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostics {
    pub version: &'static str,
    pub os: &'static str,
    pub arch: &'static str,
    pub generated_at: String,
    pub working_dir: Option<PathBuf>,
    /// Config file that was read; `None` means defaults.
    pub config_file: Option<PathBuf>,
    pub config_warnings: Vec<String>,
    /// Resolved settings in schema order, as TOML literals.
    pub settings: Vec<Setting>,
    pub stdout: StreamInfo,
    pub stderr: StreamInfo,
    pub log_file: Option<LogFileInfo>,
    pub environment: Vec<EnvVar>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Setting {
    pub key: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StreamInfo {
    pub is_terminal: bool,
    pub rich: bool,
    pub emoji: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogFileInfo {
    pub path: PathBuf,
    pub exists: bool,
    pub size_bytes: Option<u64>,
    pub backups: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnvVar {
    pub name: &'static str,
    pub value: String,
}

impl StreamInfo {
    fn detect(stream: ConsoleStream) -> Self {
        let is_terminal = match stream {
            ConsoleStream::Stdout => std::io::stdout().is_terminal(),
            ConsoleStream::Stderr => std::io::stderr().is_terminal(),
        };
        Self {
            is_terminal,
            rich: DisplayContext::detect(stream).is_rich(),
            emoji: supports_emoji(stream),
        }
    }
}

impl LogFileInfo {
    fn inspect(path: &Path, backup_count: u32) -> Self {
        let size_bytes = std::fs::metadata(path).ok().map(|m| m.len());
        let backups = (1..=backup_count)
            .map(|n| crate::sink::backup_path(path, n))
            .filter(|p| p.exists())
            .collect();
        Self {
            path: path.to_path_buf(),
            exists: size_bytes.is_some(),
            size_bytes,
            backups,
        }
    }
}

impl Diagnostics {
    /// Collect using the default config discovery.
    pub fn collect() -> ChronilogResult<Self> {
        Self::collect_from(&ConfigSource::Discover)
    }

    pub fn collect_from(source: &ConfigSource) -> ChronilogResult<Self> {
        let loaded = source.load()?;
        let (config, value_warnings) = ChronilogConfig::from_document(&loaded.document);

        let config_warnings = loaded
            .warnings
            .iter()
            .chain(&value_warnings)
            .map(ToString::to_string)
            .collect();

        let settings = loaded
            .document
            .iter()
            .map(|(field, value)| Setting {
                key: field.key,
                value: value.to_toml_literal(),
            })
            .collect();

        let environment = WATCHED_ENV
            .iter()
            .filter_map(|&name| {
                std::env::var(name)
                    .ok()
                    .map(|value| EnvVar { name, value })
            })
            .collect();

        Ok(Self {
            version: env!("CARGO_PKG_VERSION"),
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
            generated_at: TimestampFormat::new(&config.timestamp_format).render(&Local::now()),
            working_dir: std::env::current_dir().ok(),
            config_file: loaded.path,
            config_warnings,
            settings,
            stdout: StreamInfo::detect(ConsoleStream::Stdout),
            stderr: StreamInfo::detect(ConsoleStream::Stderr),
            log_file: config
                .log_path
                .as_deref()
                .map(|p| LogFileInfo::inspect(p, config.log_backup_count)),
            environment,
        })
    }

    /// Pretty JSON form.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
    }

    /// Print the report; plain consoles get unstyled text.
    pub fn render(&self, console: &ChronilogConsole) {
        let key_style = Style::new().cyan();
        let row = |key: &str, value: &str| {
            if console.is_rich() {
                let key = key_style
                    .clone()
                    .force_styling(true)
                    .apply_to(format!("{key:<22}"));
                console.print(&format!("  {key} {value}"));
            } else {
                console.print(&format!("  {key:<22} {value}"));
            }
        };

        console.rule(Some("🩺 Chronilog Diagnostics"));
        row("version", self.version);
        row("platform", &format!("{}/{}", self.os, self.arch));
        row("generated at", &self.generated_at);
        row("working dir", &display_opt(self.working_dir.as_deref()));

        console.newline();
        console.heading("⚙️ Configuration");
        row(
            "config file",
            &self
                .config_file
                .as_deref()
                .map_or_else(|| "none (defaults)".to_string(), |p| p.display().to_string()),
        );
        for setting in &self.settings {
            row(setting.key, &setting.value);
        }
        for warning in &self.config_warnings {
            console.warn(&format!("  ⚠️ {warning}"));
        }

        console.newline();
        console.heading("🖥️ Console");
        for (name, info) in [("stdout", &self.stdout), ("stderr", &self.stderr)] {
            row(
                name,
                &format!(
                    "terminal={} rich={} emoji={}",
                    info.is_terminal, info.rich, info.emoji
                ),
            );
        }

        console.newline();
        console.heading("📁 Log file");
        match &self.log_file {
            Some(file) => {
                row("path", &file.path.display().to_string());
                row(
                    "size",
                    &file
                        .size_bytes
                        .map_or_else(|| "missing".to_string(), |n| format!("{n} bytes")),
                );
                row("backups", &file.backups.len().to_string());
            }
            None => row("path", "disabled (log_path is empty)"),
        }

        if !self.environment.is_empty() {
            console.newline();
            console.heading("🌱 Environment");
            for var in &self.environment {
                row(var.name, &var.value);
            }
        }
        console.rule(None);
    }
}

fn display_opt(path: Option<&Path>) -> String {
    path.map_or_else(|| "unknown".to_string(), |p| p.display().to_string())
}

/// Collect and print diagnostics to stdout.
pub fn print_diagnostics() {
    let console = ChronilogConsole::stdout();
    match Diagnostics::collect() {
        Ok(report) => report.render(&console),
        Err(e) => console.error(&format!("❌ Could not collect diagnostics: {e}")),
    }
}
