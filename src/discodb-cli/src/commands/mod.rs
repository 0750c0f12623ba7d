//! Command handlers for discodb CLI
//!
//! Each subcommand has its own module with handler functions.

pub mod configure;
pub mod explore;
pub mod extract;
pub mod report;
pub mod survey;

use anyhow::{Context, Result};
use discodb::ExecDecoder;

use crate::config::Settings;

/// The decoder backend, for commands that always read bundles
fn require_decoder(settings: &Settings) -> Result<ExecDecoder> {
    settings.decoder().context(
        "No decoder configured (use --decoder, DISCODB_DECODER or `discodb configure --decoder`)",
    )
}
