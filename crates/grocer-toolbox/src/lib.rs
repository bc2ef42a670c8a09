//! Remote tool loading and ordered toolsets for the grocer agent.
//!
//! The database-backed tools the assistant relies on (vector search, cart
//! updates, cart totals) live on a toolbox server. This crate resolves them by
//! name over HTTP and exposes each one behind the [`Tool`] trait, next to any
//! tools implemented in-process.
//!
//! # Key Components
//!
//! - **Client**: [`ToolboxClient`] fetches tool manifests and invokes tools
//! - **Manifests**: [`ManifestSchema`], [`ToolSchema`] and [`ParameterSchema`]
//!   mirror the server's wire format
//! - **Arguments**: [`ToolArgs`] binds positional and named values to the
//!   parameters a manifest declares
//! - **Toolsets**: [`Toolset`] is an explicit, ordered list of tools built by
//!   the caller, with [`FunctionDeclaration`]s for an agent runtime
//!
//! # Example
//!
//! ```no_run
//! use grocer_toolbox::{Tool, ToolArgs, ToolLoader, ToolboxClient};
//!
//! # async fn example() -> Result<(), grocer_toolbox::ToolboxError> {
//! let client = ToolboxClient::new("http://127.0.0.1:5000")?;
//! let search = client.load_tool("find_similar_documents").await?;
//!
//! let args = ToolArgs::new()
//!     .arg(vec![0.1_f32, 0.2, 0.3])
//!     .named_arg("index", "vector_index")
//!     .named_arg("path", "gemini_embedding");
//! let result = search.call(args).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! [`ToolboxClient`] wraps a shared `reqwest::Client` and is never mutated
//! after construction; clones and the tools it hands out can be used from any
//! task concurrently.

mod args;
mod client;
mod config;
mod error;
mod manifest;
mod tool;
mod toolset;

pub use args::ToolArgs;
pub use client::ToolboxClient;
pub use config::ToolboxConfig;
pub use error::ToolboxError;
pub use manifest::{ManifestSchema, ParameterSchema, ToolSchema};
pub use tool::{RemoteTool, Tool, ToolLoader};
pub use toolset::{FunctionDeclaration, Toolset};
