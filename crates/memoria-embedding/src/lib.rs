// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding service adapters for Memoria.
//!
//! | `embedding.provider` | Adapter |
//! |----------------------|---------|
//! | `"openai"` | [`HttpEmbedder`] (any OpenAI-compatible endpoint) |
//! | `"disabled"` | [`DisabledEmbedder`] |

pub mod disabled;
pub mod http;

use std::sync::Arc;

use memoria_config::model::EmbeddingConfig;
use memoria_core::traits::EmbeddingAdapter;
use memoria_core::MemoriaError;

pub use disabled::DisabledEmbedder;
pub use http::HttpEmbedder;

/// Build the embedding adapter named by `config.provider`.
pub fn create_embedder(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingAdapter>, MemoriaError> {
    match config.provider.as_str() {
        "openai" => Ok(Arc::new(HttpEmbedder::new(config)?)),
        "disabled" => Ok(Arc::new(DisabledEmbedder)),
        other => Err(MemoriaError::Config(format!(
            "unknown embedding provider: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selects_adapter_by_provider() {
        let openai = EmbeddingConfig::default();
        assert_eq!(create_embedder(&openai).unwrap().name(), "http-embedder");

        let disabled = EmbeddingConfig {
            provider: "disabled".to_string(),
            ..Default::default()
        };
        assert_eq!(create_embedder(&disabled).unwrap().name(), "disabled-embedder");
    }

    #[test]
    fn unknown_provider_is_a_config_error() {
        let config = EmbeddingConfig {
            provider: "cohere".to_string(),
            ..Default::default()
        };
        match create_embedder(&config) {
            Err(MemoriaError::Config(msg)) => assert!(msg.contains("cohere")),
            Err(other) => panic!("expected Config error, got {other}"),
            Ok(_) => panic!("expected an error"),
        }
    }
}
