//! NearbyLink CLI - Command-line interface for beacon peer tracking.
//!
//! Discovers nearby beacon peers from the terminal, either as a one-shot
//! scan or a live found/lost event stream.

mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;

use cli::{Cli, Commands};
use error::{exit_codes, CliError};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(
                |_| tracing_subscriber::EnvFilter::new("nearby_link_core=debug,nearby_link_cli=debug"),
            ))
            .init();
    }

    let result = run(cli).await;

    match result {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Discover(args) => commands::run_discover(args, cli.config, cli.json).await,
        Commands::Config(args) => commands::run_config(args, cli.config, cli.json).await,
    }
}
