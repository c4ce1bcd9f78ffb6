//! Haven - covert messages in images and complaint matching
//!
//! A CLI for hiding text in images with LSB steganography and ranking
//! complaint records against a query embedding.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

use haven::HavenConfig;

mod commands;

use commands::{
    AppContext, CapacityCommand, CommandExecutor, ConfigCommand, DecodeCommand, EncodeCommand,
    MatchCommand,
};

/// Haven - covert messages in images and complaint matching
///
/// Hide a message in an ordinary picture, read it back, or find complaint
/// records related to a query embedding.
#[derive(Parser)]
#[command(name = "haven")]
#[command(version)]
#[command(about = "Hide messages in images and match complaint records by similarity")]
#[command(long_about = None)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the config file (defaults to ~/.haven/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hide a text message in an image (output is always PNG)
    Encode(EncodeCommand),

    /// Recover a hidden text message from an image
    Decode(DecodeCommand),

    /// Show how much text an image can hide
    Capacity(CapacityCommand),

    /// Rank complaint records against a query embedding
    Match(MatchCommand),

    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(|| HavenConfig::config_path().ok());
    let config = match &config_path {
        Some(path) => HavenConfig::load(Some(path.as_path()))
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => HavenConfig::default(),
    };

    init_logging(cli.verbose, &config);
    if config_path.is_none() {
        warn!("could not determine home directory, using default config");
    }

    let ctx = AppContext {
        config,
        config_path,
    };

    let command: &dyn CommandExecutor = match &cli.command {
        Commands::Encode(cmd) => cmd,
        Commands::Decode(cmd) => cmd,
        Commands::Capacity(cmd) => cmd,
        Commands::Match(cmd) => cmd,
        Commands::Config { action } => action,
    };

    command.execute(&ctx)
}

/// Installs the stderr subscriber.
///
/// `-v` flags win over `RUST_LOG`, which wins over the config file.
fn init_logging(verbose: u8, config: &HavenConfig) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.log_level))
            .unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
