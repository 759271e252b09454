//! Chronilog CLI - config wizard, diagnostics and config checks.
//!
//! Commands:
//! - `init` - Create `.chronilog.toml` interactively
//! - `diagnostics` - Report environment and resolved configuration
//! - `check` - Strictly validate a config file

#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use chronilog::config::{self, ConfigSource};
use chronilog::console::ChronilogConsole;
use chronilog::{ChronilogError, Diagnostics, run_wizard};

/// Chronilog CLI - configure and inspect Chronilog logging.
#[derive(Parser)]
#[command(name = "chronilog")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a .chronilog.toml config interactively.
    Init {
        /// Print the resulting file instead of writing it.
        #[arg(long)]
        dry_run: bool,
    },

    /// Show environment, console detection and resolved settings.
    Diagnostics {
        /// Emit the report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Validate a config file; fails on syntax errors, unknown keys and
    /// invalid values.
    Check {
        /// Config file (default: $CHRONILOG_CONFIG or ./.chronilog.toml).
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Chronilog(#[from] ChronilogError),

    #[error("{count} problem(s) found in {}", path.display())]
    Invalid { count: usize, path: PathBuf },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { dry_run } => cmd_init(dry_run),
        Commands::Diagnostics { json } => cmd_diagnostics(json),
        Commands::Check { path } => cmd_check(path),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Init command: run the wizard against the current directory.
fn cmd_init(dry_run: bool) -> Result<(), CliError> {
    run_wizard(dry_run)?;
    Ok(())
}

/// Diagnostics command: print the report, rich or JSON.
fn cmd_diagnostics(json: bool) -> Result<(), CliError> {
    let report = Diagnostics::collect()?;
    if json {
        println!("{}", report.to_json());
    } else {
        report.render(&ChronilogConsole::stdout());
    }
    Ok(())
}

/// Check command: strict parse plus value validation.
fn cmd_check(path: Option<PathBuf>) -> Result<(), CliError> {
    let path = path
        .or_else(|| ConfigSource::Discover.candidate_path())
        .unwrap_or_else(|| PathBuf::from(config::CONFIG_FILE_NAME));
    let console = ChronilogConsole::stdout();

    let (_, warnings) = config::read_strict(&path)?;
    if warnings.is_empty() {
        console.success(&format!("✅ {} is valid", path.display()));
        return Ok(());
    }

    for warning in &warnings {
        console.warn(&format!("⚠️ {warning}"));
    }
    Err(CliError::Invalid {
        count: warnings.len(),
        path,
    })
}
