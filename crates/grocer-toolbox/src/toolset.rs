//! Ordered collections of tools handed to an agent runtime.
//!
//! A [`Toolset`] is assembled explicitly by the caller: tools keep the order
//! they were pushed in, and names must be unique. Nothing is inserted at a
//! fixed position of a list loaded from elsewhere.

use std::{fmt, sync::Arc};

use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use crate::{Tool, ToolArgs, ToolboxError};

/// Function-calling declaration for one tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDeclaration {
    /// Name the model calls the tool by.
    pub name: String,
    /// Description shown to the model.
    pub description: String,
    /// JSON Schema object for the arguments.
    pub parameters: Value,
}

/// Ordered list of uniquely named tools.
#[derive(Clone, Default)]
pub struct Toolset {
    tools: Vec<Arc<dyn Tool>>,
}

impl fmt::Debug for Toolset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl Toolset {
    /// Creates an empty toolset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `tool`.
    ///
    /// # Errors
    ///
    /// Returns [`ToolboxError::DuplicateTool`] if a tool with the same name is
    /// already present; the toolset is left unchanged.
    pub fn push(&mut self, tool: Arc<dyn Tool>) -> Result<(), ToolboxError> {
        if self.get(tool.name()).is_some() {
            return Err(ToolboxError::DuplicateTool(tool.name().to_string()));
        }
        self.tools.push(tool);
        Ok(())
    }

    /// Appends every tool of `tools`, in iteration order.
    ///
    /// # Errors
    ///
    /// Returns [`ToolboxError::DuplicateTool`] on the first name clash. Tools
    /// appended before the clash stay in the toolset.
    pub fn extend<I>(&mut self, tools: I) -> Result<(), ToolboxError>
    where
        I: IntoIterator<Item = Arc<dyn Tool>>,
    {
        tools.into_iter().try_for_each(|tool| self.push(tool))
    }

    /// Returns the tool named `name`.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|tool| tool.name() == name)
    }

    /// Iterates over the tools in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.tools.iter()
    }

    /// Iterates over tool names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(|tool| tool.name())
    }

    /// Returns the number of tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns `true` if the toolset holds no tools.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Returns function declarations for every tool, in registration order.
    pub fn declarations(&self) -> Vec<FunctionDeclaration> {
        self.tools
            .iter()
            .map(|tool| FunctionDeclaration {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                parameters: tool.input_schema(),
            })
            .collect()
    }

    /// Calls the tool named `name` with `args`.
    ///
    /// # Errors
    ///
    /// Returns [`ToolboxError::ToolNotFound`] if no tool has that name, or the
    /// tool's own error otherwise.
    #[instrument(skip(self, args))]
    pub async fn call(&self, name: &str, args: ToolArgs) -> Result<Value, ToolboxError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolboxError::ToolNotFound(name.to_string()))?;
        tool.call(args).await
    }
}
