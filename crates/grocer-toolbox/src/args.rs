//! Call arguments for tools.

use serde_json::{Map, Value};

use crate::{ToolboxError, manifest::ParameterSchema};

/// Positional and named arguments for a tool call.
///
/// Positional values bind to the tool's declared parameters in order; named
/// values bind by name. Binding happens in [`ToolArgs::bind`], which produces
/// the JSON object sent to the server.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolArgs {
    positional: Vec<Value>,
    named: Map<String, Value>,
}

impl ToolArgs {
    /// Creates an empty argument list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates arguments from an already-named JSON object.
    pub fn from_named(named: Map<String, Value>) -> Self {
        Self {
            positional: Vec::new(),
            named,
        }
    }

    /// Appends a positional argument.
    #[must_use]
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Sets a named argument, replacing any earlier value for `name`.
    #[must_use]
    pub fn named_arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.named.insert(name.into(), value.into());
        self
    }

    /// Returns the positional arguments in call order.
    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    /// Returns the named arguments.
    pub fn named(&self) -> &Map<String, Value> {
        &self.named
    }

    /// Returns the value bound to `name`, looking at named arguments first and
    /// then at the positional argument at `position`.
    pub fn get(&self, name: &str, position: usize) -> Option<&Value> {
        self.named.get(name).or_else(|| self.positional.get(position))
    }

    /// Binds the arguments to `parameters` for a call to `tool`.
    ///
    /// Named arguments that match no declared parameter are passed through
    /// unchanged; the server decides whether to accept them.
    ///
    /// # Errors
    ///
    /// - [`ToolboxError::TooManyArguments`] if there are more positional
    ///   arguments than parameters
    /// - [`ToolboxError::DuplicateArgument`] if a parameter is bound both
    ///   positionally and by name
    /// - [`ToolboxError::MissingArgument`] if a required parameter is left
    ///   unbound
    pub fn bind(
        self,
        tool: &str,
        parameters: &[ParameterSchema],
    ) -> Result<Map<String, Value>, ToolboxError> {
        if self.positional.len() > parameters.len() {
            return Err(ToolboxError::TooManyArguments {
                tool: tool.to_string(),
                expected: parameters.len(),
                given: self.positional.len(),
            });
        }

        let mut bound = self.named;
        for (param, value) in parameters.iter().zip(self.positional) {
            if bound.contains_key(&param.name) {
                return Err(ToolboxError::DuplicateArgument {
                    tool: tool.to_string(),
                    name: param.name.clone(),
                });
            }
            bound.insert(param.name.clone(), value);
        }

        if let Some(missing) = parameters
            .iter()
            .find(|p| p.required && p.auth_sources.is_empty() && !bound.contains_key(&p.name))
        {
            return Err(ToolboxError::MissingArgument {
                tool: tool.to_string(),
                name: missing.name.clone(),
            });
        }

        Ok(bound)
    }
}
