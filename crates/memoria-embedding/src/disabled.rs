// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! No-op embedder used when `embedding.provider = "disabled"`.

use async_trait::async_trait;

use memoria_core::traits::{EmbeddingAdapter, PluginAdapter};
use memoria_core::types::{AdapterType, EmbeddingInput, EmbeddingOutput, HealthStatus};
use memoria_core::MemoriaError;

/// Rejects every request. Chunk creation fails fast instead of producing
/// chunks without vectors.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledEmbedder;

#[async_trait]
impl PluginAdapter for DisabledEmbedder {
    fn name(&self) -> &str {
        "disabled-embedder"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Embedding
    }

    async fn health_check(&self) -> Result<HealthStatus, MemoriaError> {
        Ok(HealthStatus::Degraded("embeddings disabled".to_string()))
    }

    async fn shutdown(&self) -> Result<(), MemoriaError> {
        Ok(())
    }
}

#[async_trait]
impl EmbeddingAdapter for DisabledEmbedder {
    async fn embed(&self, _input: EmbeddingInput) -> Result<EmbeddingOutput, MemoriaError> {
        Err(MemoriaError::Config(
            "embeddings are disabled (set embedding.provider = \"openai\")".to_string(),
        ))
    }
}
