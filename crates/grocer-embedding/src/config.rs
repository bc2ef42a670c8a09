//! Configuration for the Gemini embedding client.
//!
//! The `[embedding]` table of `grocer.toml` deserializes into
//! [`EmbeddingConfig`]. Every field has a default, so an empty table (or no
//! table at all) yields the configuration the product index was built with.
//!
//! ```toml
//! [embedding]
//! model = "gemini-embedding-001"
//! output_dimensionality = 3072
//! api_key_env = "GOOGLE_API_KEY"
//! base_url = "https://generativelanguage.googleapis.com/v1beta"
//! ```

use serde::{Deserialize, Serialize};

use crate::embedding::{DEFAULT_MODEL, DEFAULT_OUTPUT_DIMENSIONALITY, EmbeddingError};

/// Settings for generating query embeddings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Gemini embedding model identifier, without the `models/` prefix.
    #[serde(default = "default_model")]
    pub model: String,

    /// Requested vector length.
    ///
    /// Must equal the dimensionality of the remote vector index; a mismatch
    /// only surfaces as a failure from the search tool.
    #[serde(default = "default_output_dimensionality")]
    pub output_dimensionality: u32,

    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Base URL of the Generative Language API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            output_dimensionality: default_output_dimensionality(),
            api_key_env: default_api_key_env(),
            base_url: default_base_url(),
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_output_dimensionality() -> u32 {
    DEFAULT_OUTPUT_DIMENSIONALITY
}

fn default_api_key_env() -> String {
    "GOOGLE_API_KEY".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

/// Resolves the API key from the variable named `env`.
///
/// `lookup` is the environment accessor; production code passes
/// `|name| std::env::var(name).ok()`.
///
/// # Errors
///
/// Returns [`EmbeddingError::MissingApiKey`] if the variable is unset or
/// contains only whitespace.
pub fn resolve_api_key(
    env: &str,
    lookup: impl FnOnce(&str) -> Option<String>,
) -> Result<String, EmbeddingError> {
    match lookup(env) {
        Some(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => Err(EmbeddingError::MissingApiKey {
            env: env.to_string(),
        }),
    }
}
