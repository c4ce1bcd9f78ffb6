//! Capacity command - show how much text an image can hide.

use anyhow::Result;
use clap::Args;

use super::{AppContext, CommandExecutor, ImageSource};

/// Show how many bytes of text an image can carry.
#[derive(Args, Debug)]
pub struct CapacityCommand {
    #[command(flatten)]
    pub source: ImageSource,
}

impl CommandExecutor for CapacityCommand {
    fn execute(&self, _ctx: &AppContext) -> Result<()> {
        let carrier = self.source.load()?;
        let (width, height) = carrier.dimensions();

        println!("Image:    {} ({}x{}, {:?})", self.source.describe(), width, height, carrier.image().color());
        println!("Capacity: {} bits", carrier.capacity_bits()?);
        println!("Message:  up to {} bytes of UTF-8 text", carrier.capacity_bytes()?);
        Ok(())
    }
}
