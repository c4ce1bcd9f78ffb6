//! Match command - rank stored complaints against a query embedding.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use haven::{load_records, rank, RecordMatch};

use super::{AppContext, CommandExecutor};

/// Find the complaint records most similar to a query.
///
/// The query embedding is produced by an external model and passed in as a
/// JSON array of numbers. Records must carry embeddings of the same length.
#[derive(Args, Debug)]
pub struct MatchCommand {
    /// Records file: JSON array or JSON Lines, each with an `embedding` field
    #[arg(short, long)]
    pub records: PathBuf,

    /// Query embedding as a JSON array (file path, or `-` for stdin)
    #[arg(short = 'q', long)]
    pub vector: PathBuf,

    /// Number of matches to return (defaults to `top_k` from the config file)
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,
}

impl CommandExecutor for MatchCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        let query = read_vector(&self.vector)?;
        let records = load_records(&self.records)
            .with_context(|| format!("Failed to load records from {}", self.records.display()))?;

        let k = self.top_k.unwrap_or(ctx.config.top_k);
        let ranked = rank(&query, &records, k).context("Failed to rank records")?;
        info!(candidates = records.len(), returned = ranked.len(), k, "matched records");

        let matches: Vec<RecordMatch> = ranked.into_iter().map(RecordMatch::from).collect();
        println!("{}", serde_json::to_string_pretty(&matches)?);
        Ok(())
    }
}

/// Reads a JSON array of numbers from a file or stdin.
fn read_vector(path: &Path) -> Result<Vec<f32>> {
    let content = if path == Path::new("-") {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read query vector from stdin")?;
        content
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read query vector from {}", path.display()))?
    };

    serde_json::from_str(&content).context("Query vector must be a JSON array of numbers")
}
