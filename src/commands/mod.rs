//! Command module - Strategy pattern for CLI commands.
//!
//! Each command is a separate module implementing the `CommandExecutor` trait.
//! All file, stdin and stdout handling lives here; the library never does I/O
//! beyond what these commands ask of it.

mod capacity;
mod config;
mod decode;
mod encode;
mod find_match;

pub use capacity::CapacityCommand;
pub use config::ConfigCommand;
pub use decode::DecodeCommand;
pub use encode::EncodeCommand;
pub use find_match::MatchCommand;

use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use haven::{CarrierImage, HavenConfig};

/// State shared by every command.
#[derive(Debug)]
pub struct AppContext {
    /// Effective configuration (file values over defaults).
    pub config: HavenConfig,
    /// Where the configuration lives, if a location could be determined.
    pub config_path: Option<PathBuf>,
}

/// Trait for command execution - Strategy pattern.
///
/// Each command struct holds its parsed arguments and implements
/// this trait to define its execution logic.
pub trait CommandExecutor {
    /// Executes the command with its parsed arguments.
    fn execute(&self, ctx: &AppContext) -> Result<()>;
}

/// Where a carrier image comes from. Exactly one source must be given.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct ImageSource {
    /// Path to the carrier image (PNG, BMP, or any format decodable to 8/16-bit pixels)
    #[arg(short, long)]
    pub image: Option<PathBuf>,

    /// Read the carrier image bytes from stdin
    #[arg(long)]
    pub stdin: bool,
}

impl ImageSource {
    /// Loads and decodes the selected image.
    pub fn load(&self) -> Result<CarrierImage> {
        match &self.image {
            Some(path) => CarrierImage::from_file(path)
                .with_context(|| format!("Failed to load image from {}", path.display())),
            None => {
                let mut bytes = Vec::new();
                io::stdin()
                    .read_to_end(&mut bytes)
                    .context("Failed to read image from stdin")?;
                CarrierImage::from_bytes(&bytes).context("Failed to decode image from stdin")
            }
        }
    }

    /// Human-readable name of the source for log messages.
    pub fn describe(&self) -> String {
        match &self.image {
            Some(path) => path.display().to_string(),
            None => "<stdin>".to_string(),
        }
    }
}
