//! The [`Tool`] abstraction shared by remote and in-process tools.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use serde_json::Value;
use tracing::instrument;

use crate::{ToolArgs, ToolboxClient, ToolboxError, manifest::ToolSchema};

/// A named procedure an agent runtime can invoke.
///
/// Implementations must be thread-safe; the agent runtime may call several
/// tools concurrently.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name the model uses to call the tool.
    fn name(&self) -> &str;

    /// Description shown to the model.
    fn description(&self) -> &str;

    /// JSON Schema object describing the tool's parameters.
    fn input_schema(&self) -> Value;

    /// Invokes the tool and returns its result unchanged.
    async fn call(&self, args: ToolArgs) -> Result<Value, ToolboxError>;
}

/// Resolves tools by name.
#[async_trait]
pub trait ToolLoader: Send + Sync {
    /// Returns the tool registered under `name`.
    async fn load_tool(&self, name: &str) -> Result<Arc<dyn Tool>, ToolboxError>;
}

/// A tool hosted by a toolbox server.
#[derive(Clone)]
pub struct RemoteTool {
    name: String,
    schema: ToolSchema,
    client: ToolboxClient,
}

impl fmt::Debug for RemoteTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteTool")
            .field("name", &self.name)
            .field("parameters", &self.schema.parameters.len())
            .finish_non_exhaustive()
    }
}

impl RemoteTool {
    pub(crate) fn new(name: String, schema: ToolSchema, client: ToolboxClient) -> Self {
        Self {
            name,
            schema,
            client,
        }
    }

    /// Returns the manifest entry this tool was built from.
    pub fn schema(&self) -> &ToolSchema {
        &self.schema
    }
}

#[async_trait]
impl Tool for RemoteTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.schema.description
    }

    fn input_schema(&self) -> Value {
        self.schema.input_schema()
    }

    #[instrument(skip(self, args), fields(tool = %self.name))]
    async fn call(&self, args: ToolArgs) -> Result<Value, ToolboxError> {
        let payload = args.bind(&self.name, &self.schema.parameters)?;
        self.client.invoke(&self.name, payload).await
    }
}
