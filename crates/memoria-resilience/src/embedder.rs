// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `EmbeddingAdapter` wrapper guarded by a circuit breaker.
//!
//! There is no fallback: a chunk without a vector is never produced, so a
//! rejected call surfaces as an error to the chunking service.

use async_trait::async_trait;

use memoria_config::model::ResilienceConfig;
use memoria_core::traits::{EmbeddingAdapter, PluginAdapter};
use memoria_core::types::{AdapterType, EmbeddingInput, EmbeddingOutput, HealthStatus};
use memoria_core::MemoriaError;

use crate::circuit_breaker::CircuitBreaker;

pub struct CircuitBreakerEmbedder<E> {
    embedder: E,
    breaker: CircuitBreaker,
}

impl<E: EmbeddingAdapter> CircuitBreakerEmbedder<E> {
    pub fn new(embedder: E, config: &ResilienceConfig) -> Self {
        Self::with_breaker(embedder, CircuitBreaker::new("embedding", config.into()))
    }

    pub fn with_breaker(embedder: E, breaker: CircuitBreaker) -> Self {
        Self { embedder, breaker }
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    pub fn inner(&self) -> &E {
        &self.embedder
    }
}

#[async_trait]
impl<E: EmbeddingAdapter> PluginAdapter for CircuitBreakerEmbedder<E> {
    fn name(&self) -> &str {
        self.embedder.name()
    }

    fn version(&self) -> semver::Version {
        self.embedder.version()
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Embedding
    }

    async fn health_check(&self) -> Result<HealthStatus, MemoriaError> {
        match self.breaker.call(|| self.embedder.health_check()).await {
            Err(MemoriaError::CircuitOpen { name }) => {
                Ok(HealthStatus::Unhealthy(format!("circuit breaker `{name}` is open")))
            }
            other => other,
        }
    }

    async fn shutdown(&self) -> Result<(), MemoriaError> {
        self.embedder.shutdown().await
    }
}

#[async_trait]
impl<E: EmbeddingAdapter> EmbeddingAdapter for CircuitBreakerEmbedder<E> {
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, MemoriaError> {
        self.breaker.call(|| self.embedder.embed(input)).await
    }
}
