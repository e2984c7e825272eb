//! `sm-validate` — Validates SM Profile schema documents.
//!
//! **Usage:**
//! ```text
//! sm-validate <profile.jsonld|dir>... [--log-file <path>] [--rules <rules.toml>]
//! ```
//!
//! Directory arguments contribute every `*.jsonld` file beneath them. Exits
//! zero only if every profile is valid and every argument exists.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use sm_clients::discover;
use sm_clients::output::render_report;
use sm_conformance::{ProfileValidator, ValidationRules};
use tracing::error;

/// Validate SM Profile schema documents.
#[derive(Parser, Debug)]
#[command(name = "sm-validate", version, about, long_about = None)]
struct Args {
    /// Profile files or directories to validate.
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// File log lines are appended to.
    #[arg(long, default_value = "validation.log")]
    log_file: PathBuf,

    /// TOML file overriding the default validation rules.
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Enable verbose output. Repeat for more verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = sm_clients::logging::init_with_log_file(args.verbose, &args.log_file) {
        eprintln!("Failed to open log file {}: {e}", args.log_file.display());
        return ExitCode::FAILURE;
    }

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every argument existed and every profile was valid.
fn run(args: Args) -> Result<bool> {
    let rules = match &args.rules {
        Some(path) => ValidationRules::from_file(path)
            .with_context(|| format!("Failed to load rules from {}", path.display()))?,
        None => ValidationRules::default(),
    };
    let validator = ProfileValidator::new(rules);

    let targets = discover::targets(&args.paths);
    for path in &targets.missing {
        error!("File not found: {}", path.display());
    }

    let mut all_valid = targets.missing.is_empty();
    for path in &targets.files {
        let report = validator.validate_file(path);
        if targets.files.len() > 1 {
            println!("\n{}", path.display());
        }
        println!("{}", render_report(&report));
        all_valid &= report.is_valid();
    }
    Ok(all_valid)
}
