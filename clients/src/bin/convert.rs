//! `sm-convert` — Converts a meter configuration into an SM Profile instance.
//!
//! **Usage:**
//! ```text
//! sm-convert <input.json> [output.jsonld] [meterId]
//! ```
//!
//! The output defaults to the input path with its extension replaced by
//! `sm.jsonld`, and the meter id to the uppercased input file stem.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use sm_profile::convert::{convert_str, default_meter_id, default_output_path};
use sm_profile::document::{read_text, write_document};
use tracing::{error, info};

/// Convert a meter configuration into an SM Profile instance.
#[derive(Parser, Debug)]
#[command(name = "sm-convert", version, about, long_about = None)]
struct Args {
    /// Configuration document to convert.
    input: PathBuf,

    /// Where to write the instance (default: `<input>.sm.jsonld`).
    output: Option<PathBuf>,

    /// Meter identifier (default: the uppercased input file name).
    meter_id: Option<String>,

    /// Enable verbose output. Repeat for more verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    sm_clients::logging::init(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    if !args.input.exists() {
        bail!("Input file not found: {}", args.input.display());
    }
    let output = args
        .output
        .unwrap_or_else(|| default_output_path(&args.input));
    let meter_id = args
        .meter_id
        .unwrap_or_else(|| default_meter_id(&args.input));

    let text = read_text(&args.input).context("Failed to read input file")?;
    let instance = convert_str(&text, &meter_id).context("Conversion failed")?;
    write_document(&output, &instance).context("Failed to write output")?;
    info!("Written to: {}", output.display());

    println!(
        "{}",
        sm_clients::output::render_conversion(&args.input, &output, &meter_id)
    );
    Ok(())
}
