//! Text embedding generation for grocery product search.
//!
//! This crate turns a free-text shopping query into a fixed-length vector by
//! calling the Gemini embeddings API. The vector is later handed to a remote
//! vector search tool, so its dimensionality must match the one the product
//! index was built with.
//!
//! # Configuration
//!
//! [`EmbeddingConfig`] carries the model identifier, the requested output
//! dimensionality, the API base URL and the name of the environment variable
//! holding the API key. The key itself is never read implicitly: resolve it
//! with [`resolve_api_key`] at the composition root and pass it to
//! [`GeminiEmbedder::new`].
//!
//! # Example
//!
//! ```no_run
//! use grocer_embedding::{Embedder, EmbeddingConfig, GeminiEmbedder, resolve_api_key};
//!
//! # async fn example() -> Result<(), grocer_embedding::EmbeddingError> {
//! let config = EmbeddingConfig::default();
//! let api_key = resolve_api_key(&config.api_key_env, |name| std::env::var(name).ok())?;
//! let embedder = GeminiEmbedder::new(&config, api_key)?;
//!
//! let vector = embedder.embed("organic apples").await?;
//! assert_eq!(vector.len(), 3072);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod embedding;

pub use config::{EmbeddingConfig, resolve_api_key};
pub use embedding::{
    DEFAULT_MODEL, DEFAULT_OUTPUT_DIMENSIONALITY, Embedder, Embedding, EmbeddingError,
    GeminiEmbedder,
};
