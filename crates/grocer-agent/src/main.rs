//! Command-line front end for the grocery shopping assistant.
//!
//! Usage:
//! ```bash
//! grocer embed "organic apples"          # Print the query embedding
//! grocer search "sweet treats"           # Find similar products
//! grocer tools                           # List the agent's toolset
//! grocer call <tool> <json|@file.json>   # Call a tool by name
//! grocer agent                           # Print the agent definition
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "grocer", author, version, about)]
struct Cli {
    #[command(flatten)]
    global: commands::GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate the embedding for a query
    Embed(commands::embed::EmbedArgs),

    /// Find products similar to a query
    Search(commands::search::SearchArgs),

    /// List the tools handed to the agent
    Tools(commands::tools::ToolsArgs),

    /// Call a tool from the agent's toolset
    Call(commands::call::CallArgs),

    /// Print the agent definition as JSON
    Agent(commands::agent::AgentArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("info".parse().context("failed to parse log directive")?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Command::Embed(args) => commands::embed::run(&cli.global, args).await,
        Command::Search(args) => commands::search::run(&cli.global, args).await,
        Command::Tools(args) => commands::tools::run(&cli.global, args).await,
        Command::Call(args) => commands::call::run(&cli.global, args).await,
        Command::Agent(args) => commands::agent::run(&cli.global, args).await,
    }
}
