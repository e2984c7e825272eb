//! Shared plumbing for the SM Profile binaries.
//!
//! - [`logging`]: `tracing` subscriber setup (console, plus an append-only file for the validator)
//! - [`prompt`]: the generator's interactive question sequence
//! - [`output`]: banners and validation report rendering
//! - [`discover`]: expanding validator arguments into profile files

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod discover;
pub mod logging;
pub mod output;
pub mod prompt;
