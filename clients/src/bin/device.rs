//! `sm-device` — Builds a live flow computer document from one polled payload.
//!
//! **Usage:**
//! ```text
//! sm-device <payload.json> [--registers] [--site <site.toml>] [--output <doc.jsonld>]
//! ```
//!
//! With `--registers` the input is a map of named Modbus registers rather
//! than a device payload. Without `--output` the document goes to stdout.

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
use chrono::Utc;
use clap::Parser;
use serde_json::{Map, Value};
use sm_profile::document::{read_document, to_pretty_json, write_document};
use sm_profile::live::{build_device_document, payload_from_registers, topic, DevicePayload, SiteConfig};
use tracing::{error, info};

/// Build a live flow computer document from one polled payload.
#[derive(Parser, Debug)]
#[command(name = "sm-device", version, about, long_about = None)]
struct Args {
    /// Device payload (or register map with `--registers`) to build from.
    input: PathBuf,

    /// Treat the input as named Modbus registers.
    #[arg(long)]
    registers: bool,

    /// Site settings: device, run, and meter identity plus register scaling.
    #[arg(long)]
    site: Option<PathBuf>,

    /// Where to write the document (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

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
    let site = match &args.site {
        Some(path) => SiteConfig::from_file(path).context("Failed to load site settings")?,
        None => SiteConfig::default(),
    };

    let payload = if args.registers {
        let registers: Map<String, Value> =
            read_document(&args.input).context("Failed to read register map")?;
        payload_from_registers(&registers, &site.registers).context("Invalid register map")?
    } else {
        read_document::<DevicePayload>(&args.input).context("Failed to read device payload")?
    };

    let document = build_device_document(&payload, &site, Utc::now());
    let topic = topic(&site);
    info!("Topic: {topic}");

    match &args.output {
        Some(output) => {
            write_document(output, &document).context("Failed to write output")?;
            info!("Written to: {}", output.display());
            println!(
                "{}",
                sm_clients::output::render_device(&topic, output, document.status())
            );
        }
        None => print!("{}", to_pretty_json(&document).context("Failed to serialize document")?),
    }
    Ok(())
}
