//! Agent definition assembly.
//!
//! The assistant's agent is described, not run: [`load_agent`] gathers the
//! identity, the system prompt and the ordered toolset, and
//! [`AgentDefinition::describe`] renders them for an external agent runtime.

use std::sync::Arc;

use grocer_embedding::Embedder;
use grocer_toolbox::{FunctionDeclaration, Tool, ToolboxClient, ToolboxError, Toolset};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{
    config::Config,
    instruction::INSTRUCTION,
    products::{FindSimilarProducts, ProductSearch},
};

/// The `[agent]` table of `grocer.toml`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Agent name reported to the runtime.
    #[serde(default = "default_name")]
    pub name: String,

    /// Conversation model the runtime should drive the agent with.
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            model: default_model(),
        }
    }
}

fn default_name() -> String {
    "grocery_shopping_agent".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

/// A fully assembled agent: identity, instruction and tools.
#[derive(Clone, Debug)]
pub struct AgentDefinition {
    /// Agent name reported to the runtime.
    pub name: String,
    /// Conversation model identifier.
    pub model: String,
    /// System prompt.
    pub instruction: String,
    /// Tools in the order the runtime should offer them.
    pub tools: Toolset,
}

/// Serializable view of an [`AgentDefinition`].
#[derive(Debug, Serialize)]
pub struct AgentDescription {
    /// Agent name reported to the runtime.
    pub name: String,
    /// Conversation model identifier.
    pub model: String,
    /// System prompt.
    pub instruction: String,
    /// One declaration per tool, in toolset order.
    pub tools: Vec<FunctionDeclaration>,
}

impl AgentDefinition {
    /// Describes the agent with one function declaration per tool, in toolset
    /// order.
    pub fn describe(&self) -> AgentDescription {
        AgentDescription {
            name: self.name.clone(),
            model: self.model.clone(),
            instruction: self.instruction.clone(),
            tools: self.tools.declarations(),
        }
    }
}

/// Builds the agent's toolset: `find_similar_products` first, then `remote`
/// in the order given.
///
/// # Errors
///
/// Returns [`ToolboxError::DuplicateTool`] if a remote tool is also named
/// `find_similar_products`, or if `remote` repeats a name.
pub fn assemble_toolset<I>(search: ProductSearch, remote: I) -> Result<Toolset, ToolboxError>
where
    I: IntoIterator<Item = Arc<dyn Tool>>,
{
    let mut toolset = Toolset::new();
    toolset.push(Arc::new(FindSimilarProducts::new(search)))?;
    toolset.extend(remote)?;
    Ok(toolset)
}

/// Loads the configured toolset from the toolbox server and assembles the
/// agent around it.
///
/// The product search resolves `find_similar_documents` through `toolbox` on
/// each call, so the search tool itself need not be part of the toolset.
///
/// # Errors
///
/// Returns the toolbox error if the toolset cannot be loaded, or
/// [`ToolboxError::DuplicateTool`] on a name clash.
#[instrument(skip_all, fields(toolset = %config.toolbox.toolset))]
pub async fn load_agent(
    config: &Config,
    embedder: Arc<dyn Embedder>,
    toolbox: &ToolboxClient,
) -> Result<AgentDefinition, ToolboxError> {
    let remote = toolbox.load_toolset(&config.toolbox.toolset).await?;
    let search = ProductSearch::new(embedder, Arc::new(toolbox.clone()));
    let tools = assemble_toolset(
        search,
        remote.into_iter().map(|tool| Arc::new(tool) as Arc<dyn Tool>),
    )?;

    info!(tools = tools.len(), agent = %config.agent.name, "Assembled agent");

    Ok(AgentDefinition {
        name: config.agent.name.clone(),
        model: config.agent.model.clone(),
        instruction: INSTRUCTION.to_string(),
        tools,
    })
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use grocer_embedding::{Embedding, EmbeddingError};
    use grocer_toolbox::{ToolArgs, ToolLoader};
    use serde_json::{Value, json};
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, method, path},
    };

    use super::*;

    struct FixedEmbedder(Embedding);

    #[async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed(&self, _query: &str) -> Result<Embedding, EmbeddingError> {
            Ok(self.0.clone())
        }
    }

    struct NoTools;

    #[async_trait]
    impl ToolLoader for NoTools {
        async fn load_tool(&self, name: &str) -> Result<Arc<dyn Tool>, ToolboxError> {
            Err(ToolboxError::ToolNotFound(name.to_string()))
        }
    }

    struct NamedTool(&'static str);

    #[async_trait]
    impl Tool for NamedTool {
        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "stub"
        }

        fn input_schema(&self) -> Value {
            json!({ "type": "object" })
        }

        async fn call(&self, _args: ToolArgs) -> Result<Value, ToolboxError> {
            Ok(Value::Null)
        }
    }

    fn offline_search() -> ProductSearch {
        ProductSearch::new(Arc::new(FixedEmbedder(vec![0.0])), Arc::new(NoTools))
    }

    fn cart_toolset_manifest() -> Value {
        json!({
            "serverVersion": "0.9.0",
            "tools": {
                "calculate_cart_total": {
                    "description": "Sums the user's cart.",
                    "parameters": [
                        { "name": "username", "type": "string", "description": "Cart owner." }
                    ]
                },
                "add_to_cart": {
                    "description": "Adds a product to the user's cart.",
                    "parameters": [
                        { "name": "product", "type": "string", "description": "" },
                        { "name": "category", "type": "string", "description": "" },
                        { "name": "price", "type": "float", "description": "" },
                        { "name": "username", "type": "string", "description": "" }
                    ]
                }
            }
        })
    }

    fn config_for(server: &MockServer) -> Config {
        let mut config = Config::default();
        config.toolbox.url = server.uri();
        config
    }

    #[test]
    fn test_assemble_toolset_puts_product_search_first() {
        let remote: Vec<Arc<dyn Tool>> =
            vec![Arc::new(NamedTool("add_to_cart")), Arc::new(NamedTool("calculate_cart_total"))];

        let toolset = assemble_toolset(offline_search(), remote).unwrap();

        assert_eq!(
            toolset.names().collect::<Vec<_>>(),
            ["find_similar_products", "add_to_cart", "calculate_cart_total"]
        );
    }

    #[test]
    fn test_assemble_toolset_with_no_remote_tools() {
        let toolset = assemble_toolset(offline_search(), Vec::new()).unwrap();

        assert_eq!(toolset.names().collect::<Vec<_>>(), ["find_similar_products"]);
    }

    #[test]
    fn test_assemble_toolset_rejects_remote_tool_shadowing_product_search() {
        let remote: Vec<Arc<dyn Tool>> = vec![Arc::new(NamedTool("find_similar_products"))];

        let err = assemble_toolset(offline_search(), remote).unwrap_err();

        assert!(
            matches!(&err, ToolboxError::DuplicateTool(name) if name == "find_similar_products"),
            "{err:?}"
        );
    }

    #[test]
    fn test_describe_serializes_declarations_in_order() {
        let remote: Vec<Arc<dyn Tool>> = vec![Arc::new(NamedTool("add_to_cart"))];
        let definition = AgentDefinition {
            name: "grocery_shopping_agent".to_string(),
            model: "gemini-2.5-flash".to_string(),
            instruction: INSTRUCTION.to_string(),
            tools: assemble_toolset(offline_search(), remote).unwrap(),
        };

        let described = serde_json::to_value(definition.describe()).unwrap();

        assert_eq!(described["name"], "grocery_shopping_agent");
        assert_eq!(described["model"], "gemini-2.5-flash");
        assert_eq!(described["instruction"], INSTRUCTION);
        assert_eq!(described["tools"][0]["name"], "find_similar_products");
        assert_eq!(
            described["tools"][0]["parameters"]["required"],
            json!(["query"])
        );
        assert_eq!(described["tools"][1]["name"], "add_to_cart");
        assert_eq!(described["tools"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_load_agent_orders_remote_tools_after_product_search() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/toolset/grocery-shopping-toolset"))
            .respond_with(ResponseTemplate::new(200).set_body_json(cart_toolset_manifest()))
            .mount(&server)
            .await;
        let toolbox = ToolboxClient::new(&server.uri()).unwrap();

        let agent = load_agent(
            &config_for(&server),
            Arc::new(FixedEmbedder(vec![0.5])),
            &toolbox,
        )
        .await
        .unwrap();

        assert_eq!(agent.name, "grocery_shopping_agent");
        assert_eq!(agent.model, "gemini-2.5-flash");
        assert_eq!(agent.instruction, INSTRUCTION);
        assert_eq!(
            agent.tools.names().collect::<Vec<_>>(),
            ["find_similar_products", "add_to_cart", "calculate_cart_total"]
        );
        let declarations = agent.tools.declarations();
        assert_eq!(declarations[1].parameters["properties"]["price"]["type"], "number");
    }

    #[tokio::test]
    async fn test_load_agent_missing_toolset_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/toolset/grocery-shopping-toolset"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let toolbox = ToolboxClient::new(&server.uri()).unwrap();

        let err = load_agent(
            &config_for(&server),
            Arc::new(FixedEmbedder(vec![0.5])),
            &toolbox,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ToolboxError::ToolsetNotFound(_)), "{err:?}");
    }

    #[tokio::test]
    async fn test_agent_product_search_reaches_vector_search_tool() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/toolset/grocery-shopping-toolset"))
            .respond_with(ResponseTemplate::new(200).set_body_json(cart_toolset_manifest()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/tool/find_similar_documents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "serverVersion": "0.9.0",
                "tools": {
                    "find_similar_documents": {
                        "description": "Vector search.",
                        "parameters": [
                            { "name": "vector", "type": "array", "description": "" },
                            { "name": "index", "type": "string", "description": "" },
                            { "name": "path", "type": "string", "description": "" }
                        ]
                    }
                }
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/tool/find_similar_documents/invoke"))
            .and(body_json(json!({
                "vector": [0.1, -0.012_345_678_901_234],
                "index": "vector_index",
                "path": "gemini_embedding"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": [{ "name": "Organic Gala Apples", "price": 3.49 }]
            })))
            .expect(1)
            .mount(&server)
            .await;
        let toolbox = ToolboxClient::new(&server.uri()).unwrap();
        let agent = load_agent(
            &config_for(&server),
            Arc::new(FixedEmbedder(vec![0.1, -0.012_345_678_901_234])),
            &toolbox,
        )
        .await
        .unwrap();

        let result = agent
            .tools
            .call(
                "find_similar_products",
                ToolArgs::new().named_arg("query", "organic apples"),
            )
            .await
            .unwrap();

        assert_eq!(result, json!([{ "name": "Organic Gala Apples", "price": 3.49 }]));
    }
}
