mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{Cli, Commands};
use config::{Config, Settings};

const DEFAULT_FILTER: &str = "discodb=info";
const VERBOSE_FILTER: &str = "discodb=debug";

/// Log to stderr; `-v` wins over `RUST_LOG`
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command.unwrap_or(Commands::Extract { refresh: false }) {
        Commands::Extract { refresh } => {
            let settings = Settings::load(&cli.paths)?;
            commands::extract::handle(&settings, refresh)?;
        }

        Commands::Survey => {
            let settings = Settings::load(&cli.paths)?;
            commands::survey::handle(&settings)?;
        }

        Commands::Explore { prefix } => {
            let settings = Settings::load(&cli.paths)?;
            commands::explore::handle(&settings, &prefix)?;
        }

        Commands::Report { prefix } => {
            let settings = Settings::load(&cli.paths)?;
            commands::report::handle(&settings, &prefix)?;
        }

        Commands::Configure {
            game_dir,
            bundle_dir,
            output_dir,
            decoder,
            show,
        } => {
            let updates = Config {
                game_dir,
                bundle_dir,
                output_dir,
                decoder,
            };
            commands::configure::handle(updates, show)?;
        }
    }

    Ok(())
}
