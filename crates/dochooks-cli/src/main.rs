use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dochooks_core::{CheckKind, Config, Report};
use dochooks_dbt::Manifest;
use dochooks_engine::{MacroDescriptionCheck, PrimaryKeyDescriptionCheck, SourceTableDescriptionCheck};

/// dochooks - documentation checks for dbt projects, run as pre-commit hooks
#[derive(Parser)]
#[command(name = "dochooks")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: dochooks.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that changed macros have a description
    CheckMacroHasDescription {
        /// Changed files
        filenames: Vec<String>,

        /// Path to dbt manifest.json
        #[arg(short = 'm', long, default_value = "target/manifest.json")]
        manifest: PathBuf,
    },

    /// Check that primary-key columns of changed models have a description
    CheckModelHasPrimaryKeyDescription {
        /// Changed files
        filenames: Vec<String>,

        /// Path to dbt manifest.json
        #[arg(short = 'm', long, default_value = "target/manifest.json")]
        manifest: PathBuf,
    },

    /// Check that source tables in changed properties files have a description
    CheckSourceTableHasDescription {
        /// Changed files
        filenames: Vec<String>,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Diagnostics go to stdout, logs to stderr
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();

    let config = Config::discover(cli.config.as_deref(), Path::new("."))?;
    tracing::debug!(?config, "loaded configuration");

    let report = match cli.command {
        Commands::CheckMacroHasDescription { filenames, manifest } => {
            let Some(manifest) = load_manifest(&manifest) else {
                return Ok(ExitCode::FAILURE);
            };
            MacroDescriptionCheck::run(&filenames, &manifest, &config)
        }
        Commands::CheckModelHasPrimaryKeyDescription { filenames, manifest } => {
            let Some(manifest) = load_manifest(&manifest) else {
                return Ok(ExitCode::FAILURE);
            };
            PrimaryKeyDescriptionCheck::run(&filenames, &manifest, &config)
        }
        Commands::CheckSourceTableHasDescription { filenames } => {
            SourceTableDescriptionCheck::run(&filenames, &config)
        }
    };

    print_report(&report);
    tracing::debug!(check = %report.check, violations = report.diagnostics.len(), "check finished");

    Ok(ExitCode::from(report.exit_code()))
}

/// Load the manifest, printing the failure instead of propagating it
fn load_manifest(path: &Path) -> Option<Manifest> {
    tracing::debug!(path = %path.display(), "loading manifest");

    match Manifest::from_file(path) {
        Ok(manifest) => Some(manifest),
        Err(e) => {
            println!("Unable to load manifest file ({})", e);
            None
        }
    }
}

/// Print one line per undocumented item
fn print_report(report: &Report) {
    match report.check {
        CheckKind::ModelHasPrimaryKeyDescription => {
            if report.has_violations() {
                println!("{}", PrimaryKeyDescriptionCheck::HEADER);
                for diag in &report.diagnostics {
                    println!("- {}", diag.subject.yellow());
                }
            }
        }
        CheckKind::MacroHasDescription | CheckKind::SourceTableHasDescription => {
            for diag in &report.diagnostics {
                println!("{}: {}", diag.subject.red(), diag.message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn manifest_defaults_to_target_dir() {
        let cli = Cli::parse_from(["dochooks", "check-macro-has-description", "macros/foo.sql"]);
        match cli.command {
            Commands::CheckMacroHasDescription { filenames, manifest } => {
                assert_eq!(filenames, vec!["macros/foo.sql".to_string()]);
                assert_eq!(manifest, PathBuf::from("target/manifest.json"));
            }
            _ => panic!("Expected macro check"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "dochooks",
            "check-source-table-has-description",
            "--verbose",
            "models/sources.yml",
        ]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::CheckSourceTableHasDescription { .. }));
    }

    #[test]
    fn unreadable_manifest_is_reported() {
        assert!(load_manifest(Path::new("does/not/exist/manifest.json")).is_none());
    }
}
