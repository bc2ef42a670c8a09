//! Tool manifests as served by `GET /api/tool/{name}` and
//! `GET /api/toolset/{name}`.
//!
//! A manifest maps tool names to their description and ordered parameter
//! list:
//!
//! ```json
//! {
//!   "serverVersion": "0.9.0",
//!   "tools": {
//!     "find_similar_documents": {
//!       "description": "Vector search over the inventory",
//!       "parameters": [
//!         { "name": "vector", "type": "array", "description": "...",
//!           "items": { "name": "", "type": "float", "description": "" } },
//!         { "name": "index", "type": "string", "description": "..." },
//!         { "name": "path", "type": "string", "description": "..." }
//!       ]
//!     }
//!   }
//! }
//! ```
//!
//! Parameter order is significant: positional arguments bind to it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// A set of tool definitions returned by the toolbox server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestSchema {
    /// Version string reported by the server.
    #[serde(default)]
    pub server_version: String,
    /// Tool definitions keyed by tool name.
    #[serde(default)]
    pub tools: BTreeMap<String, ToolSchema>,
}

/// Definition of a single remote tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSchema {
    /// What the tool does, as shown to the model.
    #[serde(default)]
    pub description: String,
    /// Declared parameters, in binding order.
    #[serde(default)]
    pub parameters: Vec<ParameterSchema>,
}

/// Definition of a single tool parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSchema {
    /// Parameter name; empty for array item schemas.
    #[serde(default)]
    pub name: String,
    /// Toolbox type name: `string`, `integer`, `float`, `boolean` or `array`.
    #[serde(rename = "type")]
    pub kind: String,
    /// What the parameter means.
    #[serde(default)]
    pub description: String,
    /// Whether a value must be supplied.
    #[serde(default = "default_required")]
    pub required: bool,
    /// Element schema for `array` parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ParameterSchema>>,
    /// Auth services that supply this parameter instead of the caller.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub auth_sources: Vec<String>,
}

fn default_required() -> bool {
    true
}

impl ParameterSchema {
    /// Returns the JSON Schema fragment describing this parameter.
    pub fn json_schema(&self) -> Value {
        let mut schema = Map::new();
        schema.insert("type".to_string(), json!(json_type(&self.kind)));
        if !self.description.is_empty() {
            schema.insert("description".to_string(), json!(self.description));
        }
        if let Some(items) = &self.items {
            schema.insert("items".to_string(), items.json_schema());
        }
        Value::Object(schema)
    }
}

impl ToolSchema {
    /// Returns a JSON Schema object describing the tool's parameters.
    ///
    /// Parameters supplied by auth services are omitted; the caller never
    /// provides them.
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for param in self.parameters.iter().filter(|p| p.auth_sources.is_empty()) {
            properties.insert(param.name.clone(), param.json_schema());
            if param.required {
                required.push(Value::String(param.name.clone()));
            }
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

fn json_type(kind: &str) -> &str {
    match kind {
        "float" => "number",
        "integer" | "string" | "boolean" | "array" | "object" => kind,
        _ => "string",
    }
}
