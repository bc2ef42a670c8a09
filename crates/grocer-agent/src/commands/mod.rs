//! CLI command implementations.

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Args;
use grocer_agent::{AgentDefinition, Config, load_agent};
use grocer_embedding::{GeminiEmbedder, resolve_api_key};
use grocer_toolbox::ToolboxClient;

pub mod agent;
pub mod call;
pub mod embed;
pub mod search;
pub mod tools;

/// Flags shared by every command.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Path to `grocer.toml` (defaults to `$GROCER_CONFIG_PATH`, then
    /// `./grocer.toml`).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Toolbox server URL, overriding the config file.
    #[arg(long, global = true)]
    pub toolbox_url: Option<String>,
}

impl GlobalArgs {
    /// Loads the configuration and applies command-line overrides.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        if let Some(url) = &self.toolbox_url {
            config.toolbox.url.clone_from(url);
        }
        Ok(config)
    }
}

/// Builds the Gemini embedder, reading the API key from the environment.
pub fn embedder(config: &Config) -> Result<GeminiEmbedder> {
    let api_key = resolve_api_key(&config.embedding.api_key_env, |name| {
        std::env::var(name).ok()
    })?;
    GeminiEmbedder::new(&config.embedding, api_key).context("failed to create embedder")
}

/// Connects to the configured toolbox server.
pub fn toolbox(config: &Config) -> Result<ToolboxClient> {
    ToolboxClient::new(&config.toolbox.url).context("failed to create toolbox client")
}

/// Assembles the agent from the configured toolset.
pub async fn agent(config: &Config) -> Result<AgentDefinition> {
    let embedder = Arc::new(embedder(config)?);
    let toolbox = toolbox(config)?;
    load_agent(config, embedder, &toolbox)
        .await
        .with_context(|| format!("failed to load toolset {}", config.toolbox.toolset))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_load_config_applies_toolbox_url_override() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("grocer.toml");
        fs::write(&path, "[toolbox]\nurl = \"http://from-file:5000\"\n")?;

        let from_file = GlobalArgs {
            config: Some(path.clone()),
            toolbox_url: None,
        }
        .load_config()?;
        let overridden = GlobalArgs {
            config: Some(path),
            toolbox_url: Some("http://from-flag:5000".to_string()),
        }
        .load_config()?;

        assert_eq!(from_file.toolbox.url, "http://from-file:5000");
        assert_eq!(overridden.toolbox.url, "http://from-flag:5000");
        assert_eq!(overridden.toolbox.toolset, "grocery-shopping-toolset");
        Ok(())
    }

    #[test]
    fn test_toolbox_rejects_invalid_url() {
        let mut config = Config::default();
        config.toolbox.url = "127.0.0.1:5000".to_string();

        let err = toolbox(&config).unwrap_err();

        assert!(format!("{err:#}").contains("failed to create toolbox client"));
    }
}
