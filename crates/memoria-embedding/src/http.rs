// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for OpenAI-compatible `/v1/embeddings` endpoints.
//!
//! A single attempt per call. Retrying and failure isolation belong to the
//! caller (see the circuit breaker in `memoria-resilience`).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::debug;

use memoria_config::model::EmbeddingConfig;
use memoria_core::traits::{EmbeddingAdapter, PluginAdapter};
use memoria_core::types::{AdapterType, EmbeddingInput, EmbeddingOutput, HealthStatus};
use memoria_core::MemoriaError;

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: Option<usize>,
}

/// Embedding adapter backed by an OpenAI-compatible HTTP API.
#[derive(Debug, Clone)]
pub struct HttpEmbedder {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    dimensions: usize,
    timeout: Duration,
}

impl HttpEmbedder {
    /// Build a client from the `[embedding]` config section.
    ///
    /// The API key, when present, is sent as a bearer token on every request.
    pub fn new(config: &EmbeddingConfig) -> Result<Self, MemoriaError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = config.api_key.as_deref().filter(|k| !k.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {key}")).map_err(|e| {
                MemoriaError::Config(format!("invalid embedding API key header value: {e}"))
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| MemoriaError::embedding("failed to build HTTP client", e))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            dimensions: config.dimensions,
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_error(&self, context: &str, err: reqwest::Error) -> MemoriaError {
        if err.is_timeout() {
            MemoriaError::Timeout {
                duration: self.timeout,
            }
        } else {
            MemoriaError::embedding(format!("{context}: {err}"), err)
        }
    }
}

/// Parse an embeddings response body into vectors in input order.
///
/// Items are ordered by their `index` field; items without one keep their
/// position in `data`.
pub fn parse_embeddings_response(body: &str) -> Result<Vec<Vec<f32>>, MemoriaError> {
    let response: EmbeddingResponse = serde_json::from_str(body)
        .map_err(|e| MemoriaError::embedding("failed to parse embeddings response", e))?;

    let mut indexed: Vec<(usize, Vec<f32>)> = response
        .data
        .into_iter()
        .enumerate()
        .map(|(position, item)| (item.index.unwrap_or(position), item.embedding))
        .collect();
    indexed.sort_by_key(|(index, _)| *index);

    Ok(indexed.into_iter().map(|(_, embedding)| embedding).collect())
}

#[async_trait]
impl PluginAdapter for HttpEmbedder {
    fn name(&self) -> &str {
        "http-embedder"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Embedding
    }

    async fn health_check(&self) -> Result<HealthStatus, MemoriaError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MemoriaError> {
        Ok(())
    }
}

#[async_trait]
impl EmbeddingAdapter for HttpEmbedder {
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, MemoriaError> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: &input.texts,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.request_error("HTTP request failed", e))?;

        let status = response.status();
        debug!(status = %status, texts = input.texts.len(), "embedding response received");

        let body = response
            .text()
            .await
            .map_err(|e| self.request_error("failed to read response body", e))?;

        if !status.is_success() {
            return Err(MemoriaError::Embedding {
                message: format!("embedding API returned {status}: {body}"),
                source: None,
            });
        }

        let embeddings = parse_embeddings_response(&body)?;
        if embeddings.len() != input.texts.len() {
            return Err(MemoriaError::Embedding {
                message: format!(
                    "expected {} embeddings, got {}",
                    input.texts.len(),
                    embeddings.len()
                ),
                source: None,
            });
        }

        let dimensions = embeddings.first().map_or(self.dimensions, Vec::len);
        Ok(EmbeddingOutput {
            embeddings,
            dimensions,
        })
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn config(endpoint: String, api_key: Option<&str>) -> EmbeddingConfig {
        EmbeddingConfig {
            endpoint,
            api_key: api_key.map(str::to_string),
            model: "test-model".to_string(),
            dimensions: 3,
            ..Default::default()
        }
    }

    fn input(texts: &[&str]) -> EmbeddingInput {
        EmbeddingInput {
            texts: texts.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn parse_orders_by_index() {
        let body = r#"{"data": [
            {"index": 1, "embedding": [0.4, 0.5]},
            {"index": 0, "embedding": [0.1, 0.2]}
        ]}"#;
        let vectors = parse_embeddings_response(body).unwrap();
        assert_eq!(vectors, vec![vec![0.1, 0.2], vec![0.4, 0.5]]);
    }

    #[test]
    fn parse_without_index_keeps_position() {
        let body = r#"{"data": [{"embedding": [1.0]}, {"embedding": [2.0]}]}"#;
        assert_eq!(
            parse_embeddings_response(body).unwrap(),
            vec![vec![1.0], vec![2.0]]
        );
    }

    #[test]
    fn parse_rejects_missing_data() {
        let err = parse_embeddings_response(r#"{"object": "list"}"#).unwrap_err();
        assert!(matches!(err, MemoriaError::Embedding { .. }));
    }

    #[tokio::test]
    async fn embed_posts_model_and_input() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_json(serde_json::json!({
                "model": "test-model",
                "input": ["hello"]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "object": "list",
                "data": [{"object": "embedding", "index": 0, "embedding": [0.1, 0.2, 0.3]}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let embedder =
            HttpEmbedder::new(&config(format!("{}/v1/embeddings", server.uri()), Some("sk-test")))
                .unwrap();
        let output = embedder.embed(input(&["hello"])).await.unwrap();
        assert_eq!(output.embeddings, vec![vec![0.1, 0.2, 0.3]]);
        assert_eq!(output.dimensions, 3);
    }

    #[tokio::test]
    async fn error_status_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .expect(1)
            .mount(&server)
            .await;

        let embedder = HttpEmbedder::new(&config(server.uri(), None)).unwrap();
        let err = embedder.embed(input(&["hello"])).await.unwrap_err();
        match err {
            MemoriaError::Embedding { message, .. } => {
                assert!(message.contains("503"), "message: {message}");
                assert!(message.contains("overloaded"));
            }
            other => panic!("expected Embedding error, got {other}"),
        }
    }

    #[tokio::test]
    async fn count_mismatch_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{"index": 0, "embedding": [0.1]}]
            })))
            .mount(&server)
            .await;

        let embedder = HttpEmbedder::new(&config(server.uri(), None)).unwrap();
        let err = embedder.embed(input(&["a", "b"])).await.unwrap_err();
        assert!(err.to_string().contains("expected 2 embeddings, got 1"));
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"data": []}))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let mut cfg = config(server.uri(), None);
        cfg.timeout_secs = 1;
        let embedder = HttpEmbedder::new(&cfg).unwrap();
        let err = embedder.embed(input(&["hello"])).await.unwrap_err();
        assert!(
            matches!(err, MemoriaError::Timeout { duration } if duration == Duration::from_secs(1)),
            "got {err}"
        );
    }

    #[test]
    fn accessors_reflect_config() {
        let embedder =
            HttpEmbedder::new(&config("http://localhost:1/embed".to_string(), None)).unwrap();
        assert_eq!(embedder.endpoint(), "http://localhost:1/embed");
        assert_eq!(embedder.model(), "test-model");
    }
}
