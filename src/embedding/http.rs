//! HTTP provider for OpenAI-compatible `/embeddings` endpoints.
//!
//! Works with OpenAI, Ollama (`/v1/embeddings`) and most hosted gateways that
//! accept `{"model": ..., "input": ...}` and answer `{"data": [{"embedding": [...]}]}`.

use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::ProviderError;
use super::provider::EmbeddingProvider;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// reqwest-backed [`EmbeddingProvider`].
#[derive(Clone)]
pub struct HttpEmbeddingProvider {
    http: HttpClient,
    url: String,
    model: String,
    api_key: Option<String>,
}

impl HttpEmbeddingProvider {
    /// Creates a provider posting to `url` with the default request timeout.
    pub fn new(url: impl Into<String>, model: impl Into<String>, api_key: Option<String>) -> Self {
        Self::with_timeout(url, model, api_key, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(
        url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            http: HttpClient::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| HttpClient::new()),
            url: url.into(),
            model: model.into(),
            api_key,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl std::fmt::Debug for HttpEmbeddingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpEmbeddingProvider")
            .field("url", &self.url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let body = EmbeddingRequest {
            model: &self.model,
            input: text,
        };

        let mut request = self.http.post(&self.url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: EmbeddingResponse =
            response
                .json()
                .await
                .map_err(|e| ProviderError::InvalidResponse {
                    reason: e.to_string(),
                })?;

        let embedding = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| ProviderError::InvalidResponse {
                reason: "response contained no embeddings".to_string(),
            })?;

        debug!(
            model = %self.model,
            dim = embedding.len(),
            "Embedding received"
        );

        Ok(embedding)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Flattens a reqwest error and its source chain into a transport error.
///
/// The chain carries the text that identifies resets, DNS failures and
/// timeouts (e.g. `dns error: failed to lookup address information`).
fn transport_error(err: reqwest::Error) -> ProviderError {
    let mut message = if err.is_timeout() {
        format!("request timed out: {err}")
    } else {
        err.to_string()
    };

    let mut source = std::error::Error::source(&err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    ProviderError::Transport { message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_openai_shape() {
        let body = EmbeddingRequest {
            model: "nomic-embed-text",
            input: "Rust engineer",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "nomic-embed-text");
        assert_eq!(json["input"], "Rust engineer");
    }

    #[test]
    fn test_response_parses_first_embedding() {
        let json = r#"{"object":"list","data":[{"object":"embedding","index":0,"embedding":[0.5,-0.25]}],"model":"m"}"#;
        let parsed: EmbeddingResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.data[0].embedding, vec![0.5, -0.25]);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let provider = HttpEmbeddingProvider::new(
            "http://localhost:11434/v1/embeddings",
            "nomic-embed-text",
            Some("sk-secret".to_string()),
        );
        let debug = format!("{provider:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
        assert_eq!(provider.model_name(), "nomic-embed-text");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let provider = HttpEmbeddingProvider::with_timeout(
            "http://127.0.0.1:9/v1/embeddings",
            "m",
            None,
            Duration::from_millis(500),
        );

        let err = provider.embed("hello").await.unwrap_err();
        assert!(matches!(err, ProviderError::Transport { .. }));
    }
}
