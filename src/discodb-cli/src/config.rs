//! Configuration management for discodb CLI

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::PathArgs;

/// Bundle directory relative to the game directory
pub const DEFAULT_BUNDLE_SUBDIR: &str = "disco_Data/StreamingAssets/aa/StandaloneWindows64";

/// Output directory relative to the game directory
pub const DEFAULT_OUTPUT_SUBDIR: &str = "output/game_assets";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub game_dir: Option<PathBuf>,
    pub bundle_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub decoder: Option<String>,
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("discodb");

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from file, or default if it doesn't exist
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        toml::from_str(&contents).context("Failed to parse config file")
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<PathBuf> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory at {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, contents)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self == &Config::default()
    }
}

/// Directories and decoder for one run
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub game_dir: PathBuf,
    pub bundle_dir: PathBuf,
    pub output_dir: PathBuf,
    pub decoder: Option<String>,
}

impl Settings {
    /// Resolve each setting: flag or environment, then config file, then default
    ///
    /// Bundle and output defaults hang off the resolved game directory, which
    /// itself defaults to `cwd`.
    pub fn resolve(args: &PathArgs, config: &Config, cwd: &Path) -> Self {
        let game_dir = args
            .game_dir
            .clone()
            .or_else(|| config.game_dir.clone())
            .unwrap_or_else(|| cwd.to_path_buf());

        let bundle_dir = args
            .bundle_dir
            .clone()
            .or_else(|| config.bundle_dir.clone())
            .unwrap_or_else(|| game_dir.join(DEFAULT_BUNDLE_SUBDIR));

        let output_dir = args
            .output_dir
            .clone()
            .or_else(|| config.output_dir.clone())
            .unwrap_or_else(|| game_dir.join(DEFAULT_OUTPUT_SUBDIR));

        let decoder = args.decoder.clone().or_else(|| config.decoder.clone());

        Self {
            game_dir,
            bundle_dir,
            output_dir,
            decoder,
        }
    }

    /// Resolve against the saved config and the current directory
    pub fn load(args: &PathArgs) -> Result<Self> {
        let config = Config::load()?;
        let cwd = std::env::current_dir().context("Could not determine current directory")?;
        let settings = Self::resolve(args, &config, &cwd);
        tracing::debug!(?settings, "Resolved settings");
        Ok(settings)
    }

    /// The configured decoder backend, if any
    pub fn decoder(&self) -> Option<discodb::ExecDecoder> {
        self.decoder.as_deref().map(discodb::ExecDecoder::new)
    }
}
