//! `grocer embed` command implementation.

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use grocer_embedding::Embedder;

use super::GlobalArgs;

/// Arguments for the `embed` command.
#[derive(Debug, Args)]
pub struct EmbedArgs {
    /// Query to embed (e.g., "organic apples").
    pub query: String,
}

pub async fn run(global: &GlobalArgs, args: &EmbedArgs) -> Result<()> {
    let config = global.load_config()?;
    let embedder = super::embedder(&config)?;

    println!(
        "{} Embedding with {}: {}",
        style("→").cyan(),
        style(embedder.model()).bold(),
        args.query
    );

    let embedding = embedder
        .embed(&args.query)
        .await
        .context("failed to generate embedding")?;

    println!(
        "{} {} dimensions",
        style("✓").green().bold(),
        embedding.len()
    );
    println!("{}", serde_json::to_string(&embedding)?);

    Ok(())
}
