//! `grocer call` command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use grocer_toolbox::{ToolArgs, ToolboxError};
use serde_json::{Map, Value};

use super::GlobalArgs;

/// Arguments for the `call` command.
#[derive(Debug, Args)]
pub struct CallArgs {
    /// Tool to call (e.g., `add_to_cart`).
    pub tool: String,

    /// Named arguments as a JSON object (inline or @file.json).
    pub input: String,
}

pub async fn run(global: &GlobalArgs, args: &CallArgs) -> Result<()> {
    let input = parse_input(&args.input)?;
    let config = global.load_config()?;
    let agent = super::agent(&config).await?;

    println!(
        "{} Calling tool: {}",
        style("→").cyan(),
        style(&args.tool).bold()
    );

    match agent.tools.call(&args.tool, ToolArgs::from_named(input)).await {
        Ok(output) => {
            println!("{} Result:", style("✓").green().bold());
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Err(ToolboxError::Invocation { message, .. }) => {
            println!("{} Error: {}", style("✗").red().bold(), message);
        }
        Err(err) => return Err(err).context("failed to call tool"),
    }

    Ok(())
}

/// Reads the call input, from a file when it starts with `@`, and checks that
/// it is a JSON object.
fn parse_input(input: &str) -> Result<Map<String, Value>> {
    let json = match input.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(Path::new(path))
            .with_context(|| format!("failed to read input file: {path}"))?,
        None => input.to_string(),
    };

    match serde_json::from_str::<Value>(&json).context("invalid input JSON")? {
        Value::Object(map) => Ok(map),
        _ => anyhow::bail!("input must be a JSON object"),
    }
}
