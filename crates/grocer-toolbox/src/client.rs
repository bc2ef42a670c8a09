//! HTTP client for the toolbox server.
//!
//! # Endpoints
//!
//! - `GET  {url}/api/tool/{name}`: manifest containing one tool
//! - `GET  {url}/api/toolset/{name}`: manifest containing every tool of a
//!   toolset
//! - `POST {url}/api/tool/{name}/invoke`: runs a tool with a JSON object of
//!   arguments and answers `{"result": ...}` or `{"error": ...}`

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

use crate::{
    ToolboxError,
    manifest::{ManifestSchema, ToolSchema},
    tool::{RemoteTool, Tool, ToolLoader},
};

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for a toolbox server.
///
/// Cloning is cheap: clones share the same connection pool.
#[derive(Clone)]
pub struct ToolboxClient {
    http: reqwest::Client,
    base_url: Url,
}

impl fmt::Debug for ToolboxClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolboxClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ToolboxClient {
    /// Creates a client for the server at `url`.
    ///
    /// No connection is made until the first request.
    ///
    /// # Errors
    ///
    /// Returns [`ToolboxError::InvalidUrl`] if `url` is not an absolute
    /// `http` or `https` URL.
    pub fn new(url: &str) -> Result<Self, ToolboxError> {
        let trimmed = url.trim();
        let base_url = Url::parse(trimmed).map_err(|e| ToolboxError::InvalidUrl {
            url: trimmed.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ToolboxError::InvalidUrl {
                url: trimmed.to_string(),
                reason: "scheme must be http or https".to_string(),
            });
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
        })
    }

    /// Returns the server URL requests are made against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetches a single tool definition.
    ///
    /// # Errors
    ///
    /// - [`ToolboxError::ToolNotFound`] if the server does not know `name`
    /// - [`ToolboxError::Api`] or [`ToolboxError::Http`] if the request fails
    #[instrument(skip(self))]
    pub async fn fetch_tool(&self, name: &str) -> Result<RemoteTool, ToolboxError> {
        info!("Loading tool");
        let url = self.url_with_segments(&["api", "tool", name])?;
        let mut manifest = self
            .get_manifest(url, || ToolboxError::ToolNotFound(name.to_string()))
            .await?;

        let schema = manifest
            .tools
            .remove(name)
            .ok_or_else(|| ToolboxError::ToolNotFound(name.to_string()))?;
        Ok(self.remote_tool(name.to_string(), schema))
    }

    /// Fetches every tool of a toolset.
    ///
    /// Tools are returned sorted by name, the order the manifest lists them in.
    ///
    /// # Errors
    ///
    /// - [`ToolboxError::ToolsetNotFound`] if the server does not know `name`
    /// - [`ToolboxError::Api`] or [`ToolboxError::Http`] if the request fails
    #[instrument(skip(self))]
    pub async fn load_toolset(&self, name: &str) -> Result<Vec<RemoteTool>, ToolboxError> {
        info!("Loading toolset");
        let url = self.url_with_segments(&["api", "toolset", name])?;
        let manifest = self
            .get_manifest(url, || ToolboxError::ToolsetNotFound(name.to_string()))
            .await?;

        debug!(
            server_version = %manifest.server_version,
            tools = manifest.tools.len(),
            "Loaded toolset manifest"
        );
        Ok(manifest
            .tools
            .into_iter()
            .map(|(tool_name, schema)| self.remote_tool(tool_name, schema))
            .collect())
    }

    /// Invokes tool `name` with already-bound arguments.
    ///
    /// The `result` member of the response is returned as-is; a response
    /// without one is returned whole.
    ///
    /// # Errors
    ///
    /// - [`ToolboxError::Invocation`] if the server reports a tool failure
    /// - [`ToolboxError::ToolNotFound`] if the server does not know `name`
    /// - [`ToolboxError::Api`] or [`ToolboxError::Http`] if the request fails
    #[instrument(skip(self, payload), fields(arguments = payload.len()))]
    pub async fn invoke(
        &self,
        name: &str,
        payload: Map<String, Value>,
    ) -> Result<Value, ToolboxError> {
        let url = self.url_with_segments(&["api", "tool", name, "invoke"])?;
        let response = self.http.post(url).json(&payload).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ToolboxError::ToolNotFound(name.to_string()));
        }
        if !status.is_success() {
            let text = response.text().await?;
            return Err(api_error(status, &text));
        }

        let body: Value = response.json().await?;
        if let Some(error) = body.get("error").filter(|e| !e.is_null()) {
            return Err(ToolboxError::Invocation {
                tool: name.to_string(),
                message: error
                    .as_str()
                    .map_or_else(|| error.to_string(), str::to_string),
            });
        }

        debug!("Tool invocation succeeded");
        match body {
            Value::Object(mut map) if map.contains_key("result") => {
                Ok(map.remove("result").unwrap_or_default())
            }
            other => Ok(other),
        }
    }

    fn remote_tool(&self, name: String, schema: ToolSchema) -> RemoteTool {
        RemoteTool::new(name, schema, self.clone())
    }

    fn url_with_segments(&self, segments: &[&str]) -> Result<Url, ToolboxError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ToolboxError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "must be an absolute URL".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_manifest(
        &self,
        url: Url,
        not_found: impl FnOnce() -> ToolboxError,
    ) -> Result<ManifestSchema, ToolboxError> {
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(not_found());
        }
        if !status.is_success() {
            let text = response.text().await?;
            return Err(api_error(status, &text));
        }

        Ok(response.json::<ManifestSchema>().await?)
    }
}

#[async_trait]
impl ToolLoader for ToolboxClient {
    async fn load_tool(&self, name: &str) -> Result<Arc<dyn Tool>, ToolboxError> {
        Ok(Arc::new(self.fetch_tool(name).await?))
    }
}

fn api_error(status: StatusCode, body: &str) -> ToolboxError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| body.trim().to_string());
    ToolboxError::Api { status, message }
}
