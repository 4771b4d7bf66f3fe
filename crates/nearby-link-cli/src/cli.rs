//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use nearby_link_core::ADVERTISEMENT_PORT;

/// NearbyLink CLI - Track nearby beacon peers from the terminal
#[derive(Parser, Debug)]
#[command(name = "nearby-link-cli")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the tracker config file
    #[arg(long, global = true, env = "NEARBY_LINK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Discover beacon peers on the network
    Discover(DiscoverArgs),

    /// Tracker configuration management
    Config(ConfigArgs),
}

// ==================== Discover ====================

#[derive(Args, Debug)]
pub struct DiscoverArgs {
    /// Watch mode - stream found/lost events until interrupted
    #[arg(short, long)]
    pub watch: bool,

    /// Discovery duration in seconds (ignored in watch mode)
    #[arg(short, long, default_value = "5")]
    pub duration: u64,

    /// UDP port to listen on for advertisements
    #[arg(long, default_value_t = ADVERTISEMENT_PORT)]
    pub port: u16,

    /// Only track peers whose name or URI matches this pattern
    #[arg(short, long)]
    pub filter: Option<String>,

    /// POST enrichment batches to this metadata endpoint
    #[arg(long)]
    pub resolve_endpoint: Option<String>,

    /// Override the inactivity threshold in milliseconds
    #[arg(long)]
    pub inactivity_ms: Option<u64>,
}

// ==================== Config ====================

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective tracker configuration
    Show,

    /// Write a default config file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Overwrite an existing config file
    #[arg(short, long)]
    pub force: bool,
}
