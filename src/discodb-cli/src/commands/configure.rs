//! Configuration command handlers
//!
//! Handles the `configure` subcommand for setting up discodb defaults.

use crate::config::Config;
use anyhow::Result;

/// Handle the configure command
///
/// # Arguments
/// * `updates` - Settings to persist; `None` fields keep their saved value
/// * `show` - If true, show current configuration
pub fn handle(updates: Config, show: bool) -> Result<()> {
    let mut config = Config::load()?;

    if show {
        show_config(&config);
        return Ok(());
    }

    if updates.is_empty() {
        show_usage();
        return Ok(());
    }

    merge(&mut config, updates);
    let path = config.save()?;

    println!("Configuration saved to: {}", path.display());
    show_config(&config);

    Ok(())
}

/// Apply every set field of `updates` onto `config`
fn merge(config: &mut Config, updates: Config) {
    if updates.game_dir.is_some() {
        config.game_dir = updates.game_dir;
    }
    if updates.bundle_dir.is_some() {
        config.bundle_dir = updates.bundle_dir;
    }
    if updates.output_dir.is_some() {
        config.output_dir = updates.output_dir;
    }
    if updates.decoder.is_some() {
        config.decoder = updates.decoder;
    }
}

fn show_config(config: &Config) {
    let show_path = |label: &str, value: Option<&std::path::Path>| match value {
        Some(p) => println!("{}: {}", label, p.display()),
        None => println!("{}: (default)", label),
    };

    show_path("Game directory", config.game_dir.as_deref());
    show_path("Bundle directory", config.bundle_dir.as_deref());
    show_path("Output directory", config.output_dir.as_deref());
    match config.decoder.as_deref() {
        Some(cmd) => println!("Decoder: {}", cmd),
        None => println!("Decoder: (none)"),
    }

    if let Ok(path) = Config::config_path() {
        println!("Config file: {}", path.display());
    }
}

/// Show usage help for the configure command
fn show_usage() {
    println!("Usage: discodb configure --game-dir PATH [--bundle-dir PATH] [--output-dir PATH]");
    println!("   or: discodb configure --decoder COMMAND");
    println!("   or: discodb configure --show");
    println!();
    println!("Note: the decoder is an external command that lists and decodes bundle");
    println!("      objects as JSON. It is only needed until the database is cached.");
}
