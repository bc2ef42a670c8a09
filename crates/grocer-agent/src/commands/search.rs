//! `grocer search` command implementation.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use grocer_agent::ProductSearch;

use super::GlobalArgs;

/// Arguments for the `search` command.
#[derive(Debug, Args)]
pub struct SearchArgs {
    /// What the shopper is looking for (e.g., "sweet treats").
    pub query: String,
}

pub async fn run(global: &GlobalArgs, args: &SearchArgs) -> Result<()> {
    let config = global.load_config()?;
    let search = ProductSearch::new(
        Arc::new(super::embedder(&config)?),
        Arc::new(super::toolbox(&config)?),
    );

    println!(
        "{} Searching for: {}",
        style("→").cyan(),
        style(&args.query).bold()
    );

    let products = search
        .find_similar_products(&args.query)
        .await
        .context("product search failed")?;

    println!("{} Result:", style("✓").green().bold());
    println!("{}", serde_json::to_string_pretty(&products)?);

    Ok(())
}
