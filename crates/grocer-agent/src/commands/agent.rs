//! `grocer agent` command implementation.

use anyhow::Result;
use clap::Args;

use super::GlobalArgs;

/// Arguments for the `agent` command.
#[derive(Debug, Args)]
pub struct AgentArgs {}

pub async fn run(global: &GlobalArgs, _args: &AgentArgs) -> Result<()> {
    let config = global.load_config()?;
    let agent = super::agent(&config).await?;

    println!("{}", serde_json::to_string_pretty(&agent.describe())?);

    Ok(())
}
