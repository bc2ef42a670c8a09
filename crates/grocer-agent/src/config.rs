//! `grocer.toml` loading.
//!
//! The file is looked up at `GROCER_CONFIG_PATH` if that variable is set, and
//! at `./grocer.toml` otherwise. A missing file yields the defaults, and serde
//! defaults fill any missing table or field.
//!
//! ```toml
//! [embedding]
//! model = "gemini-embedding-001"
//! output_dimensionality = 3072
//!
//! [toolbox]
//! url = "http://127.0.0.1:5000"
//! toolset = "grocery-shopping-toolset"
//!
//! [agent]
//! name = "grocery_shopping_agent"
//! model = "gemini-2.5-flash"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use grocer_embedding::EmbeddingConfig;
use grocer_toolbox::ToolboxConfig;
use serde::{Deserialize, Serialize};

use crate::agent::AgentConfig;

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "GROCER_CONFIG_PATH";

const DEFAULT_CONFIG_FILE: &str = "grocer.toml";

/// Complete assistant configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Query embedding settings.
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Toolbox server settings.
    #[serde(default)]
    pub toolbox: ToolboxConfig,

    /// Agent identity.
    #[serde(default)]
    pub agent: AgentConfig,
}

impl Config {
    /// Loads the configuration from the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        load_toml_or_default(&config_path(|name| std::env::var(name).ok()))
    }

    /// Loads the configuration from `path`, falling back to defaults if the
    /// file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        load_toml_or_default(path)
    }
}

fn config_path(lookup: impl FnOnce(&str) -> Option<String>) -> PathBuf {
    lookup(CONFIG_PATH_ENV)
        .filter(|path| !path.trim().is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from)
}

fn load_toml_or_default<T: Default + serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    } else {
        Ok(T::default())
    }
}
