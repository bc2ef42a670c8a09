//! Grocery shopping assistant: product search pipeline and agent assembly.
//!
//! The assistant answers product questions by embedding the user's query
//! with Gemini and running a vector search on the product catalog through a
//! toolbox server. This crate wires those two steps together and assembles
//! the agent definition an external runtime drives.
//!
//! # Key Components
//!
//! - **Product search**: [`ProductSearch`] turns a query into similar products
//!   and [`FindSimilarProducts`] exposes it as a tool
//! - **Agent**: [`load_agent`] builds an [`AgentDefinition`] from the
//!   configured toolset, with product search listed first
//! - **Configuration**: [`Config`] is loaded from `grocer.toml`
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use grocer_agent::ProductSearch;
//! use grocer_embedding::{EmbeddingConfig, GeminiEmbedder};
//! use grocer_toolbox::ToolboxClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let embedder = GeminiEmbedder::new(&EmbeddingConfig::default(), "api-key")?;
//! let toolbox = ToolboxClient::new("http://127.0.0.1:5000")?;
//! let search = ProductSearch::new(Arc::new(embedder), Arc::new(toolbox));
//!
//! let products = search.find_similar_products("organic apples").await?;
//! println!("{products}");
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod config;
pub mod instruction;
pub mod products;

pub use agent::{AgentConfig, AgentDefinition, AgentDescription, assemble_toolset, load_agent};
pub use config::Config;
pub use instruction::INSTRUCTION;
pub use products::{
    EMBEDDING_PATH, FIND_SIMILAR_PRODUCTS, FindSimilarProducts, FindSimilarProductsInput,
    ProductSearch, SearchError, VECTOR_INDEX, VECTOR_SEARCH_TOOL,
};
