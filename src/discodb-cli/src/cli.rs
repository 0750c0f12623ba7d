//! CLI argument definitions for discodb

use clap::{Args, Parser, Subcommand};
use discodb::DIALOGUE_BUNDLE_PREFIX;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "discodb")]
#[command(about = "Disco Elysium dialogue database extractor", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub paths: PathArgs,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Defaults to `extract` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Location overrides, applied before the config file
#[derive(Args, Debug, Clone, Default)]
pub struct PathArgs {
    /// Game installation directory
    #[arg(long, env = "DISCODB_GAME_DIR")]
    pub game_dir: Option<PathBuf>,

    /// Directory holding the asset bundles
    #[arg(long, env = "DISCODB_BUNDLE_DIR")]
    pub bundle_dir: Option<PathBuf>,

    /// Output directory for extracted JSON
    #[arg(short, long = "output", env = "DISCODB_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Bundle decoder helper command
    #[arg(long, env = "DISCODB_DECODER")]
    pub decoder: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract the dialogue database into categorized JSON files
    #[command(visible_alias = "x")]
    Extract {
        /// Ignore the cached database and decode the bundle again
        #[arg(long)]
        refresh: bool,
    },

    /// Summarize every bundle by category
    Survey,

    /// List the objects in a bundle
    #[command(visible_alias = "e")]
    Explore {
        /// Bundle filename prefix
        #[arg(default_value = DIALOGUE_BUNDLE_PREFIX)]
        prefix: String,
    },

    /// Write a per-object extraction report for a bundle
    Report {
        /// Bundle filename prefix
        #[arg(default_value = DIALOGUE_BUNDLE_PREFIX)]
        prefix: String,
    },

    /// Configure default settings
    #[command(visible_alias = "c")]
    Configure {
        /// Set default game directory
        #[arg(long)]
        game_dir: Option<PathBuf>,

        /// Set default bundle directory
        #[arg(long)]
        bundle_dir: Option<PathBuf>,

        /// Set default output directory
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Set default decoder command
        #[arg(long)]
        decoder: Option<String>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand() {
        let cli = Cli::try_parse_from(["discodb"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_explore_default_prefix() {
        let cli = Cli::try_parse_from(["discodb", "explore"]).unwrap();
        match cli.command {
            Some(Commands::Explore { prefix }) => assert_eq!(prefix, "dialoguebundle"),
            _ => panic!("expected explore"),
        }

        let cli = Cli::try_parse_from(["discodb", "explore", "fonts"]).unwrap();
        match cli.command {
            Some(Commands::Explore { prefix }) => assert_eq!(prefix, "fonts"),
            _ => panic!("expected explore"),
        }
    }

    #[test]
    fn test_path_flags_before_subcommand() {
        let cli = Cli::try_parse_from([
            "discodb",
            "--game-dir",
            "/games/disco",
            "-o",
            "/tmp/out",
            "extract",
            "--refresh",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.paths.game_dir, Some(PathBuf::from("/games/disco")));
        assert_eq!(cli.paths.output_dir, Some(PathBuf::from("/tmp/out")));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Some(Commands::Extract { refresh: true })));
    }

    #[test]
    fn test_configure_flags() {
        let cli = Cli::try_parse_from(["discodb", "configure", "--decoder", "unity-dump", "--show"]).unwrap();
        match cli.command {
            Some(Commands::Configure { decoder, show, game_dir, .. }) => {
                assert_eq!(decoder.as_deref(), Some("unity-dump"));
                assert!(show);
                assert!(game_dir.is_none());
            }
            _ => panic!("expected configure"),
        }
    }
}
