//! Similar-product retrieval: query → embedding → remote vector search.
//!
//! [`ProductSearch`] is a stateless two-step pipeline. It embeds the query
//! once, resolves the `find_similar_documents` tool by name, and invokes it
//! with the embedding plus the fixed index name and field path. Whatever the
//! search tool returns is handed back unchanged; ranking, filtering and
//! deduplication all happen on the database side.
//!
//! [`FindSimilarProducts`] exposes the pipeline as a [`Tool`] so it can sit
//! in the agent's toolset next to the remote cart tools.

use std::sync::Arc;

use async_trait::async_trait;
use grocer_embedding::{Embedder, Embedding, EmbeddingError};
use grocer_toolbox::{ParameterSchema, Tool, ToolArgs, ToolLoader, ToolboxError};
use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument};

/// Name of the remote vector search tool.
pub const VECTOR_SEARCH_TOOL: &str = "find_similar_documents";

/// Vector index the product embeddings are stored in.
pub const VECTOR_INDEX: &str = "vector_index";

/// Document field holding each product's embedding.
pub const EMBEDDING_PATH: &str = "gemini_embedding";

/// Name the agent calls the pipeline by.
pub const FIND_SIMILAR_PRODUCTS: &str = "find_similar_products";

const FIND_SIMILAR_PRODUCTS_DESCRIPTION: &str = "Find similar products in the inventory based on \
     the user's query. Returns a list of products that are semantically similar to the query.";

/// Errors from the product search pipeline.
///
/// Both variants are transparent: the embedding or toolbox failure is
/// reported with its original kind and message.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SearchError {
    /// Generating the query embedding failed.
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    /// Resolving or invoking the vector search tool failed.
    #[error(transparent)]
    Toolbox(#[from] ToolboxError),
}

/// Query-to-similar-products pipeline.
///
/// Holds no per-call state; clones share the same embedder and tool loader.
#[derive(Clone)]
pub struct ProductSearch {
    embedder: Arc<dyn Embedder>,
    tools: Arc<dyn ToolLoader>,
}

impl ProductSearch {
    /// Creates a pipeline over an embedder and a tool loader.
    pub fn new(embedder: Arc<dyn Embedder>, tools: Arc<dyn ToolLoader>) -> Self {
        Self { embedder, tools }
    }

    /// Embeds `query`.
    ///
    /// # Errors
    ///
    /// Returns the embedder's error unchanged, including
    /// [`EmbeddingError::EmptyResponse`] when no vector came back.
    pub async fn generate_embeddings(&self, query: &str) -> Result<Embedding, EmbeddingError> {
        self.embedder.embed(query).await
    }

    /// Returns the products most similar to `query`.
    ///
    /// The embedding is passed to the search tool as its first positional
    /// argument, with `index` and `path` fixed to [`VECTOR_INDEX`] and
    /// [`EMBEDDING_PATH`]. The tool is resolved on every call.
    ///
    /// # Errors
    ///
    /// - [`SearchError::Embedding`] if embedding the query fails
    /// - [`SearchError::Toolbox`] if the search tool cannot be resolved or its
    ///   invocation fails
    #[instrument(skip(self))]
    pub async fn find_similar_products(&self, query: &str) -> Result<Value, SearchError> {
        info!(query, "Finding similar products for query");

        let embedding = self.generate_embeddings(query).await?;
        let search = self.tools.load_tool(VECTOR_SEARCH_TOOL).await?;
        let args = ToolArgs::new()
            .arg(embedding)
            .named_arg("index", VECTOR_INDEX)
            .named_arg("path", EMBEDDING_PATH);

        Ok(search.call(args).await?)
    }
}

/// Arguments of the `find_similar_products` tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct FindSimilarProductsInput {
    /// The user's search query. This can be a product name, a description,
    /// or anything else relevant to the products in the store, for example
    /// "organic apples" or "sweet treats".
    pub query: String,
}

/// [`ProductSearch`] exposed as an agent tool.
///
/// Both the advertised input schema and the argument binding come from
/// [`FindSimilarProductsInput`].
pub struct FindSimilarProducts {
    search: ProductSearch,
    parameters: Vec<ParameterSchema>,
    input_schema: Value,
}

impl FindSimilarProducts {
    /// Wraps `search` as the `find_similar_products` tool.
    pub fn new(search: ProductSearch) -> Self {
        let input_schema = schema_for!(FindSimilarProductsInput).as_value().clone();

        Self {
            search,
            parameters: binding_parameters(&input_schema),
            input_schema,
        }
    }
}

/// Lists the top-level properties of an object schema as bindable
/// parameters, in property order.
fn binding_parameters(schema: &Value) -> Vec<ParameterSchema> {
    let required: Vec<&str> = schema["required"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .collect();

    schema["properties"]
        .as_object()
        .into_iter()
        .flatten()
        .map(|(name, property)| ParameterSchema {
            name: name.clone(),
            kind: property["type"].as_str().unwrap_or("string").to_string(),
            description: property["description"]
                .as_str()
                .unwrap_or_default()
                .to_string(),
            required: required.contains(&name.as_str()),
            items: None,
            auth_sources: Vec::new(),
        })
        .collect()
}

#[async_trait]
impl Tool for FindSimilarProducts {
    fn name(&self) -> &str {
        FIND_SIMILAR_PRODUCTS
    }

    fn description(&self) -> &str {
        FIND_SIMILAR_PRODUCTS_DESCRIPTION
    }

    fn input_schema(&self) -> Value {
        self.input_schema.clone()
    }

    async fn call(&self, args: ToolArgs) -> Result<Value, ToolboxError> {
        let bound = args.bind(FIND_SIMILAR_PRODUCTS, &self.parameters)?;
        let input: FindSimilarProductsInput =
            serde_json::from_value(Value::Object(bound)).map_err(|e| ToolboxError::Execution {
                tool: FIND_SIMILAR_PRODUCTS.to_string(),
                source: Box::new(e),
            })?;

        self.search
            .find_similar_products(&input.query)
            .await
            .map_err(|e| ToolboxError::Execution {
                tool: FIND_SIMILAR_PRODUCTS.to_string(),
                source: Box::new(e),
            })
    }
}
