//! Decode command - recover a message hidden in an image.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use super::{AppContext, CommandExecutor, ImageSource};

/// Recover a text message hidden with `encode`.
///
/// Fails if the image carries no message.
#[derive(Args, Debug)]
pub struct DecodeCommand {
    #[command(flatten)]
    pub source: ImageSource,

    /// Print `{"decoded_text": ...}` instead of the raw text
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct DecodeOutput<'a> {
    decoded_text: &'a str,
}

impl CommandExecutor for DecodeCommand {
    fn execute(&self, _ctx: &AppContext) -> Result<()> {
        let carrier = self.source.load()?;
        let text = carrier
            .reveal()
            .with_context(|| format!("Failed to decode message from {}", self.source.describe()))?;

        if self.json {
            let output = DecodeOutput {
                decoded_text: &text,
            };
            println!("{}", serde_json::to_string(&output)?);
        } else {
            println!("{}", text);
        }
        Ok(())
    }
}
