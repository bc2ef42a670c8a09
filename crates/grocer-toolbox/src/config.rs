//! Connection settings for the toolbox server.

use serde::{Deserialize, Serialize};

/// The `[toolbox]` table of `grocer.toml`.
///
/// ```toml
/// [toolbox]
/// url = "http://127.0.0.1:5000"
/// toolset = "grocery-shopping-toolset"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolboxConfig {
    /// Base URL of the toolbox server.
    #[serde(default = "default_url")]
    pub url: String,

    /// Toolset whose tools are handed to the agent.
    #[serde(default = "default_toolset")]
    pub toolset: String,
}

impl Default for ToolboxConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            toolset: default_toolset(),
        }
    }
}

fn default_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_toolset() -> String {
    "grocery-shopping-toolset".to_string()
}
