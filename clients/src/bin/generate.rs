//! `sm-generate` — Creates a skeleton SM Profile schema for an equipment type.
//!
//! **Usage:**
//! ```text
//! sm-generate
//! sm-generate --name "Turbine Meter" --property FlowRate::M3-PER-HR --property Tag:string
//! ```
//!
//! Without `--name` the tool asks for the equipment type and its properties
//! on standard input.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use sm_clients::output::{banner, render_generated};
use sm_clients::prompt::{ask_profile, ProfileRequest};
use sm_profile::document::write_document;
use sm_profile::generate::{generate, output_path, PropertyDescriptor, DEFAULT_PROFILE_DIR};
use tracing::{error, info};

/// Create a skeleton SM Profile schema for an equipment type.
#[derive(Parser, Debug)]
#[command(name = "sm-generate", version, about, long_about = None)]
struct Args {
    /// Equipment type name; skips the interactive prompts.
    #[arg(long)]
    name: Option<String>,

    /// Property as `NAME[:TYPE[:UNIT]]`. Repeat for each property.
    #[arg(long = "property", value_name = "NAME[:TYPE[:UNIT]]", requires = "name")]
    properties: Vec<PropertyDescriptor>,

    /// Directory the profile is written to.
    #[arg(long, default_value = DEFAULT_PROFILE_DIR)]
    out_dir: PathBuf,

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
    let request = match args.name {
        Some(name) => ProfileRequest::new(&name, args.properties),
        None => {
            println!("{}", banner("SM PROFILE GENERATOR"));
            ask_profile(io::stdin().lock(), io::stdout().lock())
                .context("Failed to read answers")?
        }
    };

    let schema = generate(&request.equipment_name, &request.properties)
        .context("Profile generation failed")?;
    let path = output_path(&args.out_dir, &request.equipment_name);
    write_document(&path, &schema).context("Failed to write profile")?;
    info!("Written to: {}", path.display());

    println!("{}", render_generated(&path));
    Ok(())
}
