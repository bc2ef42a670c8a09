//! `grocer tools` command implementation.
//!
//! Lists the agent's toolset in the order the agent receives it, either as a
//! table or as the JSON function declarations.

use anyhow::Result;
use clap::Args;
use console::style;

use super::GlobalArgs;

/// Shortens `description` to at most 50 characters, ending in "..." when cut.
fn truncate_description(description: &str) -> String {
    const MAX_DESCRIPTION_CHARS: usize = 50;
    const ELLIPSIS: &str = "...";

    let first_line = description.lines().next().unwrap_or_default();
    if first_line.chars().count() <= MAX_DESCRIPTION_CHARS && first_line == description {
        return description.to_string();
    }

    let prefix: String = first_line
        .chars()
        .take(MAX_DESCRIPTION_CHARS - ELLIPSIS.len())
        .collect();
    format!("{}{ELLIPSIS}", prefix.trim_end())
}

/// Arguments for the `tools` command.
#[derive(Debug, Args)]
pub struct ToolsArgs {
    /// Output format: "table" or "json".
    #[arg(short, long, default_value = "table")]
    pub format: String,
}

pub async fn run(global: &GlobalArgs, args: &ToolsArgs) -> Result<()> {
    let config = global.load_config()?;
    let agent = super::agent(&config).await?;

    if args.format == "json" {
        println!(
            "{}",
            serde_json::to_string_pretty(&agent.tools.declarations())?
        );
        return Ok(());
    }

    println!(
        "{:<30} {}",
        style("TOOL").bold(),
        style("DESCRIPTION").bold()
    );
    println!("{}", "-".repeat(80));
    for tool in agent.tools.iter() {
        println!(
            "{:<30} {}",
            tool.name(),
            truncate_description(tool.description())
        );
    }
    println!(
        "\n{} {} tool(s) in {}",
        style("✓").green(),
        agent.tools.len(),
        config.toolbox.toolset
    );

    Ok(())
}
