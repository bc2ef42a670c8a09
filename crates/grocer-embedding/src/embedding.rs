//! Query embedding via the Gemini `batchEmbedContents` endpoint.
//!
//! # Key Components
//!
//! - [`Embedder`]: the seam the search pipeline depends on
//! - [`GeminiEmbedder`]: the HTTP-backed implementation
//! - [`EmbeddingError`]: failure kinds, including the distinct
//!   [`EmbeddingError::EmptyResponse`] for a reply without vectors
//!
//! One request embeds one query. Nothing is cached and nothing is retried;
//! every failure is returned to the caller as-is.

use std::fmt;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::config::EmbeddingConfig;

/// Model the product catalog embeddings were generated with.
pub const DEFAULT_MODEL: &str = "gemini-embedding-001";

/// Dimensionality of the product vector index.
pub const DEFAULT_OUTPUT_DIMENSIONALITY: u32 = 3072;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// A dense embedding vector.
///
/// Components keep the `f64` precision they were decoded with, so the vector
/// handed to the search tool is exactly what the API returned.
pub type Embedding = Vec<f64>;

/// Errors produced while generating an embedding.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum EmbeddingError {
    /// No usable API key was configured.
    #[error("API key not found: {env} is not set")]
    MissingApiKey {
        /// Name of the environment variable that was consulted.
        env: String,
    },

    /// The client configuration cannot be used (e.g. a malformed base URL).
    #[error("invalid embedding configuration: {0}")]
    InvalidConfig(String),

    /// The request could not be sent or the response could not be decoded.
    #[error("embedding request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("embedding API error ({status}): {message}")]
    Api {
        /// HTTP status returned by the API.
        status: StatusCode,
        /// Error message from the response body.
        message: String,
    },

    /// The API answered successfully but returned no embedding, or an
    /// embedding without values.
    #[error("empty embedding response")]
    EmptyResponse,
}

/// Converts query text into an embedding vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Returns the embedding for `query`.
    async fn embed(&self, query: &str) -> Result<Embedding, EmbeddingError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchEmbedRequest<'a> {
    requests: [EmbedContentRequest<'a>; 1],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedContentRequest<'a> {
    model: &'a str,
    content: Content<'a>,
    output_dimensionality: u32,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<ContentEmbedding>,
}

#[derive(Debug, Deserialize)]
struct ContentEmbedding {
    #[serde(default)]
    values: Embedding,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Gemini-backed [`Embedder`].
///
/// The underlying `reqwest::Client` is built once and reused for every
/// request, so a single `GeminiEmbedder` can be shared behind an `Arc`.
#[derive(Clone)]
pub struct GeminiEmbedder {
    http: reqwest::Client,
    endpoint: Url,
    model: String,
    output_dimensionality: u32,
    api_key: String,
}

impl fmt::Debug for GeminiEmbedder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiEmbedder")
            .field("endpoint", &self.endpoint.as_str())
            .field("model", &self.model)
            .field("output_dimensionality", &self.output_dimensionality)
            .finish_non_exhaustive()
    }
}

impl GeminiEmbedder {
    /// Creates an embedder from `config` and an explicit API key.
    ///
    /// No request is made here; credentials are first checked by the API on
    /// the first [`Embedder::embed`] call.
    ///
    /// # Errors
    ///
    /// - [`EmbeddingError::MissingApiKey`] if `api_key` is blank
    /// - [`EmbeddingError::InvalidConfig`] if the model is blank, the
    ///   dimensionality is zero, or the base URL is not an absolute URL
    pub fn new(
        config: &EmbeddingConfig,
        api_key: impl Into<String>,
    ) -> Result<Self, EmbeddingError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(EmbeddingError::MissingApiKey {
                env: config.api_key_env.clone(),
            });
        }

        let model = config.model.trim();
        if model.is_empty() {
            return Err(EmbeddingError::InvalidConfig(
                "model must not be empty".to_string(),
            ));
        }
        if config.output_dimensionality == 0 {
            return Err(EmbeddingError::InvalidConfig(
                "output_dimensionality must be greater than zero".to_string(),
            ));
        }

        let base_url = config.base_url.trim().trim_end_matches('/');
        let endpoint = Url::parse(&format!("{base_url}/models/{model}:batchEmbedContents"))
            .map_err(|e| EmbeddingError::InvalidConfig(format!("base_url {base_url:?}: {e}")))?;

        Ok(Self {
            http: reqwest::Client::new(),
            endpoint,
            model: model.to_string(),
            output_dimensionality: config.output_dimensionality,
            api_key,
        })
    }

    /// Returns the model identifier sent with each request.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the requested vector length.
    pub fn output_dimensionality(&self) -> u32 {
        self.output_dimensionality
    }

    async fn request(&self, query: &str) -> Result<BatchEmbedResponse, EmbeddingError> {
        let model = format!("models/{}", self.model);
        let body = BatchEmbedRequest {
            requests: [EmbedContentRequest {
                model: &model,
                content: Content {
                    parts: [Part { text: query }],
                },
                output_dimensionality: self.output_dimensionality,
            }],
        };

        let response = self
            .http
            .post(self.endpoint.clone())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            return Err(EmbeddingError::Api {
                status,
                message: api_error_message(&text),
            });
        }

        Ok(response.json::<BatchEmbedResponse>().await?)
    }
}

#[async_trait]
impl Embedder for GeminiEmbedder {
    #[instrument(skip(self), fields(model = %self.model))]
    async fn embed(&self, query: &str) -> Result<Embedding, EmbeddingError> {
        info!(query, "Generating embeddings for query");

        let response = self.request(query).await?;
        debug!(
            embeddings = response.embeddings.len(),
            dimensions = response.embeddings.first().map_or(0, |e| e.values.len()),
            "Received embedding response"
        );

        response
            .embeddings
            .into_iter()
            .next()
            .map(|embedding| embedding.values)
            .filter(|values| !values.is_empty())
            .ok_or(EmbeddingError::EmptyResponse)
    }
}

fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_partial_json, header, method, path},
    };

    use super::*;

    const EMBED_PATH: &str = "/v1beta/models/gemini-embedding-001:batchEmbedContents";

    fn config_for(server: &MockServer) -> EmbeddingConfig {
        EmbeddingConfig {
            base_url: format!("{}/v1beta", server.uri()),
            ..EmbeddingConfig::default()
        }
    }

    fn embedder_for(server: &MockServer) -> GeminiEmbedder {
        GeminiEmbedder::new(&config_for(server), "test-api-key").unwrap()
    }

    #[tokio::test]
    async fn test_embed_returns_vector_of_configured_dimensionality() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(EMBED_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "embeddings": [{ "values": vec![0.25; 3072] }]
            })))
            .mount(&server)
            .await;

        let vector = embedder_for(&server).embed("organic apples").await.unwrap();

        assert_eq!(vector.len(), 3072);
        assert!(vector.iter().all(|v| (*v - 0.25).abs() < f64::EPSILON));
    }

    #[tokio::test]
    async fn test_embed_sends_model_query_dimensionality_and_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(EMBED_PATH))
            .and(header("x-goog-api-key", "test-api-key"))
            .and(body_partial_json(json!({
                "requests": [{
                    "model": "models/gemini-embedding-001",
                    "content": { "parts": [{ "text": "sweet treats" }] },
                    "outputDimensionality": 3072
                }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "embeddings": [{ "values": [0.1, 0.2, 0.3] }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let vector = embedder_for(&server).embed("sweet treats").await.unwrap();

        assert_eq!(vector, [0.1, 0.2, 0.3]);
    }

    #[tokio::test]
    async fn test_embed_returns_first_of_several_embeddings() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(EMBED_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "embeddings": [{ "values": [1.0, 2.0] }, { "values": [3.0, 4.0] }]
            })))
            .mount(&server)
            .await;

        let vector = embedder_for(&server).embed("milk").await.unwrap();

        assert_eq!(vector, [1.0, 2.0]);
    }

    #[tokio::test]
    async fn test_embed_with_zero_embeddings_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(EMBED_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "embeddings": [] })))
            .mount(&server)
            .await;

        let err = embedder_for(&server).embed("bread").await.unwrap_err();

        assert!(matches!(err, EmbeddingError::EmptyResponse), "{err:?}");
        assert_eq!(err.to_string(), "empty embedding response");
    }

    #[tokio::test]
    async fn test_embed_without_embeddings_field_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(EMBED_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let err = embedder_for(&server).embed("bread").await.unwrap_err();

        assert!(matches!(err, EmbeddingError::EmptyResponse), "{err:?}");
    }

    #[tokio::test]
    async fn test_embed_with_valueless_embedding_is_empty_response() {
        for body in [
            json!({ "embeddings": [{}] }),
            json!({ "embeddings": [{ "values": [] }] }),
        ] {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path(EMBED_PATH))
                .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
                .mount(&server)
                .await;

            let err = embedder_for(&server).embed("bread").await.unwrap_err();

            assert!(matches!(err, EmbeddingError::EmptyResponse), "{body}: {err:?}");
        }
    }

    #[tokio::test]
    async fn test_embed_keeps_full_precision_of_values() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(EMBED_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"embeddings":[{"values":[0.1,-0.012345678901234,0.30000000000000004]}]}"#,
            ))
            .mount(&server)
            .await;

        let vector = embedder_for(&server).embed("organic apples").await.unwrap();

        assert_eq!(vector, [0.1, -0.012_345_678_901_234, 0.300_000_000_000_000_04]);
        assert_eq!(
            serde_json::to_string(&vector).unwrap(),
            "[0.1,-0.012345678901234,0.30000000000000004]"
        );
    }

    #[tokio::test]
    async fn test_embed_truncated_error_body_is_http_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            use tokio::io::{AsyncReadExt, AsyncWriteExt};

            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0_u8; 64 * 1024];
            let _ = socket.read(&mut buf).await;
            let response = concat!(
                "HTTP/1.1 500 Internal Server Error\r\n",
                "content-length: 100\r\n\r\n",
                "partial"
            );
            let _ = socket.write_all(response.as_bytes()).await;
        });
        let config = EmbeddingConfig {
            base_url: format!("http://{addr}/v1beta"),
            ..EmbeddingConfig::default()
        };

        let err = GeminiEmbedder::new(&config, "test-api-key")
            .unwrap()
            .embed("eggs")
            .await
            .unwrap_err();

        assert!(matches!(err, EmbeddingError::Http(_)), "{err:?}");
    }

    #[tokio::test]
    async fn test_embed_api_error_uses_google_error_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(EMBED_PATH))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": {
                    "code": 403,
                    "message": "API key not valid. Please pass a valid API key.",
                    "status": "PERMISSION_DENIED"
                }
            })))
            .mount(&server)
            .await;

        let err = embedder_for(&server).embed("eggs").await.unwrap_err();

        let EmbeddingError::Api { status, message } = &err else {
            panic!("expected Api error, got {err:?}");
        };
        assert_eq!(*status, StatusCode::FORBIDDEN);
        assert_eq!(message, "API key not valid. Please pass a valid API key.");
    }

    #[tokio::test]
    async fn test_embed_api_error_falls_back_to_raw_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(EMBED_PATH))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exhausted\n"))
            .mount(&server)
            .await;

        let err = embedder_for(&server).embed("eggs").await.unwrap_err();

        assert!(
            matches!(&err, EmbeddingError::Api { status, message }
                if *status == StatusCode::TOO_MANY_REQUESTS && message == "quota exhausted"),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn test_embed_unreachable_server_is_http_error() {
        let config = EmbeddingConfig {
            base_url: "http://127.0.0.1:1/v1beta".to_string(),
            ..EmbeddingConfig::default()
        };

        let embedder = GeminiEmbedder::new(&config, "test-api-key").unwrap();
        let err = embedder.embed("eggs").await.unwrap_err();

        assert!(matches!(err, EmbeddingError::Http(_)), "{err:?}");
    }

    #[test]
    fn test_new_with_blank_api_key_is_missing_api_key() {
        let err = GeminiEmbedder::new(&EmbeddingConfig::default(), "  ").unwrap_err();

        assert!(
            matches!(&err, EmbeddingError::MissingApiKey { env } if env == "GOOGLE_API_KEY"),
            "{err:?}"
        );
    }

    #[test]
    fn test_new_with_relative_base_url_is_invalid_config() {
        let config = EmbeddingConfig {
            base_url: "not a url".to_string(),
            ..EmbeddingConfig::default()
        };

        let err = GeminiEmbedder::new(&config, "key").unwrap_err();

        assert!(matches!(err, EmbeddingError::InvalidConfig(_)), "{err:?}");
    }

    #[test]
    fn test_new_with_zero_dimensionality_is_invalid_config() {
        let config = EmbeddingConfig {
            output_dimensionality: 0,
            ..EmbeddingConfig::default()
        };

        let err = GeminiEmbedder::new(&config, "key").unwrap_err();

        assert!(matches!(err, EmbeddingError::InvalidConfig(_)), "{err:?}");
    }

    #[test]
    fn test_debug_output_omits_api_key() {
        let embedder = GeminiEmbedder::new(&EmbeddingConfig::default(), "super-secret").unwrap();

        let debug = format!("{embedder:?}");

        assert!(!debug.contains("super-secret"), "{debug}");
        assert!(debug.contains("gemini-embedding-001"), "{debug}");
        assert_eq!(embedder.output_dimensionality(), 3072);
        assert_eq!(embedder.model(), "gemini-embedding-001");
    }
}
