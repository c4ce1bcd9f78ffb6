//! Config command - inspect or create the configuration file.

use anyhow::{bail, Context, Result};
use clap::Subcommand;

use haven::HavenConfig;

use super::{AppContext, CommandExecutor};

/// Inspect or create the configuration file.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration as TOML
    Show,

    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl CommandExecutor for ConfigCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        match self {
            ConfigCommand::Show => {
                match &ctx.config_path {
                    Some(path) if path.exists() => println!("# {}", path.display()),
                    Some(path) => println!("# {} (not found, using defaults)", path.display()),
                    None => println!("# no config location, using defaults"),
                }
                print!("{}", toml::to_string_pretty(&ctx.config)?);
            }
            ConfigCommand::Init { force } => {
                let Some(path) = &ctx.config_path else {
                    bail!("Unable to determine config location; pass --config <PATH>");
                };
                if path.exists() && !force {
                    bail!("{} already exists (use --force to overwrite)", path.display());
                }
                HavenConfig::default()
                    .save(path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("Wrote {}", path.display());
            }
        }
        Ok(())
    }
}
