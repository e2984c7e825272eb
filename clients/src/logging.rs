//! Logging setup.
//!
//! Verbosity comes from a repeatable `-v` flag: info by default, debug with
//! `-v`, trace with `-vv` or more.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing::Subscriber;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Maps a `-v` count to a filter.
#[must_use]
pub fn filter(verbose: u8) -> EnvFilter {
    match verbose {
        0 => EnvFilter::new("info"),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    }
}

/// Logs to stderr, leaving stdout for the tool's own summary.
pub fn init(verbose: u8) {
    tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Logs to stdout and appends the same lines, without colors, to `log_file`.
///
/// # Errors
///
/// Returns an error if `log_file` cannot be opened for appending.
pub fn init_with_log_file(verbose: u8, log_file: &Path) -> io::Result<()> {
    with_log_file(verbose, log_file)?.init();
    Ok(())
}

/// Builds the subscriber installed by [`init_with_log_file`].
///
/// # Errors
///
/// Returns an error if `log_file` cannot be opened for appending.
pub fn with_log_file(
    verbose: u8,
    log_file: &Path,
) -> io::Result<impl Subscriber + Send + Sync + 'static> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)?;

    Ok(tracing_subscriber::registry()
        .with(filter(verbose))
        .with(fmt::layer().with_target(false))
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        ))
}
