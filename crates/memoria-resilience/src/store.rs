// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `ChunkStore` wrapper that routes every operation through a circuit breaker.
//!
//! Reads that can degrade gracefully (listing, stats, batches) fall back to
//! an empty or all-failed result instead of erroring. Point operations
//! (`store`, `get_by_id`, `update`, `delete`, `initialize`) propagate the
//! error. `close` never touches the breaker.

use async_trait::async_trait;

use memoria_config::model::ResilienceConfig;
use memoria_core::traits::{ChunkStore, PluginAdapter};
use memoria_core::types::{AdapterType, BatchResult, ConversationChunk, HealthStatus, StoreStats};
use memoria_core::MemoriaError;

use crate::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig};

/// Error recorded in fallback batch results.
pub const CIRCUIT_OPEN_MESSAGE: &str = "circuit breaker open";

/// A chunk store guarded by a circuit breaker.
pub struct CircuitBreakerStore<S> {
    store: S,
    breaker: CircuitBreaker,
}

impl<S: ChunkStore> CircuitBreakerStore<S> {
    pub fn new(store: S, config: &ResilienceConfig) -> Self {
        Self::with_breaker(store, CircuitBreaker::new("chunk-store", config.into()))
    }

    pub fn with_breaker(store: S, breaker: CircuitBreaker) -> Self {
        Self { store, breaker }
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S: ChunkStore> From<S> for CircuitBreakerStore<S> {
    fn from(store: S) -> Self {
        Self::with_breaker(
            store,
            CircuitBreaker::new("chunk-store", CircuitBreakerConfig::default()),
        )
    }
}

fn failed_batch(count: usize) -> BatchResult {
    BatchResult {
        success: 0,
        failed: count,
        errors: vec![CIRCUIT_OPEN_MESSAGE.to_string()],
        processed_ids: Vec::new(),
    }
}

#[async_trait]
impl<S: ChunkStore> PluginAdapter for CircuitBreakerStore<S> {
    fn name(&self) -> &str {
        self.store.name()
    }

    fn version(&self) -> semver::Version {
        self.store.version()
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, MemoriaError> {
        match self.breaker.call(|| self.store.health_check()).await {
            Err(MemoriaError::CircuitOpen { name }) => {
                Ok(HealthStatus::Unhealthy(format!("circuit breaker `{name}` is open")))
            }
            other => other,
        }
    }

    async fn shutdown(&self) -> Result<(), MemoriaError> {
        self.store.shutdown().await
    }
}

#[async_trait]
impl<S: ChunkStore> ChunkStore for CircuitBreakerStore<S> {
    async fn initialize(&self) -> Result<(), MemoriaError> {
        self.breaker.call(|| self.store.initialize()).await
    }

    async fn store(&self, chunk: ConversationChunk) -> Result<(), MemoriaError> {
        self.breaker.call(|| self.store.store(chunk)).await
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<ConversationChunk>, MemoriaError> {
        self.breaker.call(|| self.store.get_by_id(id)).await
    }

    async fn list_by_session(
        &self,
        session_id: &str,
    ) -> Result<Vec<ConversationChunk>, MemoriaError> {
        Ok(self
            .breaker
            .call_with_fallback(|| self.store.list_by_session(session_id), |_| Vec::new())
            .await)
    }

    async fn list_by_repository(
        &self,
        repository: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ConversationChunk>, MemoriaError> {
        Ok(self
            .breaker
            .call_with_fallback(
                || self.store.list_by_repository(repository, limit, offset),
                |_| Vec::new(),
            )
            .await)
    }

    async fn update(&self, chunk: ConversationChunk) -> Result<(), MemoriaError> {
        self.breaker.call(|| self.store.update(chunk)).await
    }

    async fn delete(&self, id: &str) -> Result<(), MemoriaError> {
        self.breaker.call(|| self.store.delete(id)).await
    }

    async fn stats(&self) -> Result<StoreStats, MemoriaError> {
        Ok(self
            .breaker
            .call_with_fallback(|| self.store.stats(), |_| StoreStats::default())
            .await)
    }

    async fn batch_store(
        &self,
        chunks: Vec<ConversationChunk>,
    ) -> Result<BatchResult, MemoriaError> {
        let count = chunks.len();
        Ok(self
            .breaker
            .call_with_fallback(|| self.store.batch_store(chunks), |_| failed_batch(count))
            .await)
    }

    async fn batch_delete(&self, ids: &[String]) -> Result<BatchResult, MemoriaError> {
        Ok(self
            .breaker
            .call_with_fallback(|| self.store.batch_delete(ids), |_| failed_batch(ids.len()))
            .await)
    }

    async fn close(&self) -> Result<(), MemoriaError> {
        self.store.close().await
    }
}

#[cfg(test)]
mod tests {
    use memoria_core::types::{ChunkMetadata, ChunkType};
    use memoria_test_utils::InMemoryChunkStore;

    use super::*;
    use crate::circuit_breaker::CircuitState;

    fn chunk() -> ConversationChunk {
        ConversationChunk::new("s1", "body", ChunkType::Discussion, ChunkMetadata::default())
            .unwrap()
    }

    #[tokio::test]
    async fn passes_through_when_closed() {
        let store = CircuitBreakerStore::from(InMemoryChunkStore::new());
        let c = chunk();
        store.store(c.clone()).await.unwrap();
        assert_eq!(store.get_by_id(&c.id).await.unwrap(), Some(c));
        assert_eq!(store.list_by_session("s1").await.unwrap().len(), 1);
        assert_eq!(store.name(), "in-memory-store");
    }

    #[tokio::test]
    async fn list_and_stats_fall_back_to_empty() {
        let store = CircuitBreakerStore::from(InMemoryChunkStore::new());
        store.inner().set_failing(true);
        assert!(store.list_by_session("s1").await.unwrap().is_empty());
        assert!(store.list_by_repository("r", 10, 0).await.unwrap().is_empty());
        assert_eq!(store.stats().await.unwrap(), StoreStats::default());
    }
}
