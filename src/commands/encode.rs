//! Encode command - hide a message in a carrier image.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use super::{AppContext, CommandExecutor, ImageSource};

/// Hide a text message inside an image.
///
/// The message is written into the least significant bit of every color
/// channel. The result is always saved as PNG; lossy formats would destroy
/// the hidden bits.
#[derive(Args, Debug)]
pub struct EncodeCommand {
    /// Text message to hide
    #[arg(short, long)]
    pub text: String,

    #[command(flatten)]
    pub source: ImageSource,

    /// Output PNG path (defaults to `output` from the config file)
    #[arg(short, long, conflicts_with = "stdout")]
    pub output: Option<PathBuf>,

    /// Write the PNG bytes to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,
}

impl CommandExecutor for EncodeCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        let carrier = self.source.load()?;
        let (width, height) = carrier.dimensions();

        let hidden = carrier
            .hide(&self.text)
            .with_context(|| format!("Failed to hide message in {}", self.source.describe()))?;

        if self.stdout {
            let bytes = hidden.to_png_bytes().context("Failed to encode PNG")?;
            let mut stdout = io::stdout().lock();
            stdout.write_all(&bytes).context("Failed to write PNG to stdout")?;
            stdout.flush()?;
            info!(bytes = bytes.len(), "wrote carrier to stdout");
            return Ok(());
        }

        let output = self.output.as_ref().unwrap_or(&ctx.config.output);
        hidden
            .save(output)
            .with_context(|| format!("Failed to save image to {}", output.display()))?;

        info!(output = %output.display(), width, height, "wrote carrier");
        eprintln!(
            "Hidden {} bytes in {}x{} image -> {}",
            self.text.len(),
            width,
            height,
            output.display()
        );
        Ok(())
    }
}
