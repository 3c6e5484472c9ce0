// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory `ChunkStore` for tests.
//!
//! Chunks are kept in insertion order. A failure switch makes every
//! operation except `close` return a storage error, which is what the
//! circuit breaker tests need.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use memoria_core::traits::{ChunkStore, PluginAdapter};
use memoria_core::types::{AdapterType, BatchResult, ConversationChunk, HealthStatus, StoreStats};
use memoria_core::MemoriaError;

#[derive(Default)]
pub struct InMemoryChunkStore {
    chunks: Arc<RwLock<Vec<ConversationChunk>>>,
    failing: AtomicBool,
    calls: AtomicUsize,
    closed: AtomicBool,
}

impl InMemoryChunkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation (except `close`) fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of operations that reached this store, including failed ones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.chunks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.chunks.read().await.is_empty()
    }

    fn enter(&self) -> Result<(), MemoriaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(MemoriaError::Storage {
                source: "in-memory store set to fail".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for InMemoryChunkStore {
    fn name(&self) -> &str {
        "in-memory-store"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, MemoriaError> {
        if self.failing.load(Ordering::SeqCst) {
            Ok(HealthStatus::Unhealthy("set to fail".to_string()))
        } else {
            Ok(HealthStatus::Healthy)
        }
    }

    async fn shutdown(&self) -> Result<(), MemoriaError> {
        Ok(())
    }
}

#[async_trait]
impl ChunkStore for InMemoryChunkStore {
    async fn initialize(&self) -> Result<(), MemoriaError> {
        self.enter()
    }

    async fn store(&self, chunk: ConversationChunk) -> Result<(), MemoriaError> {
        self.enter()?;
        let mut chunks = self.chunks.write().await;
        match chunks.iter_mut().find(|c| c.id == chunk.id) {
            Some(existing) => *existing = chunk,
            None => chunks.push(chunk),
        }
        Ok(())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<ConversationChunk>, MemoriaError> {
        self.enter()?;
        Ok(self.chunks.read().await.iter().find(|c| c.id == id).cloned())
    }

    async fn list_by_session(
        &self,
        session_id: &str,
    ) -> Result<Vec<ConversationChunk>, MemoriaError> {
        self.enter()?;
        Ok(self
            .chunks
            .read()
            .await
            .iter()
            .filter(|c| c.session_id == session_id)
            .cloned()
            .collect())
    }

    async fn list_by_repository(
        &self,
        repository: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ConversationChunk>, MemoriaError> {
        self.enter()?;
        let chunks = self.chunks.read().await;
        let mut matching: Vec<ConversationChunk> = chunks
            .iter()
            .filter(|c| c.metadata.repository.as_deref() == Some(repository))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(matching.into_iter().skip(offset).take(limit).collect())
    }

    async fn update(&self, chunk: ConversationChunk) -> Result<(), MemoriaError> {
        self.enter()?;
        let mut chunks = self.chunks.write().await;
        let existing = chunks
            .iter_mut()
            .find(|c| c.id == chunk.id)
            .ok_or_else(|| MemoriaError::Storage {
                source: format!("chunk {} not found", chunk.id).into(),
            })?;
        *existing = chunk;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), MemoriaError> {
        self.enter()?;
        let mut chunks = self.chunks.write().await;
        let before = chunks.len();
        chunks.retain(|c| c.id != id);
        if chunks.len() == before {
            return Err(MemoriaError::Storage {
                source: format!("chunk {id} not found").into(),
            });
        }
        Ok(())
    }

    async fn stats(&self) -> Result<StoreStats, MemoriaError> {
        self.enter()?;
        let chunks = self.chunks.read().await;
        let mut chunks_by_type = BTreeMap::new();
        let mut chunks_by_repo = BTreeMap::new();
        for chunk in chunks.iter() {
            *chunks_by_type.entry(chunk.chunk_type.to_string()).or_insert(0) += 1;
            if let Some(repo) = &chunk.metadata.repository {
                *chunks_by_repo.entry(repo.clone()).or_insert(0) += 1;
            }
        }
        Ok(StoreStats {
            total_chunks: chunks.len() as u64,
            chunks_by_type,
            chunks_by_repo,
        })
    }

    async fn batch_store(
        &self,
        chunks: Vec<ConversationChunk>,
    ) -> Result<BatchResult, MemoriaError> {
        let mut result = BatchResult::default();
        for chunk in chunks {
            let id = chunk.id.clone();
            match self.store(chunk).await {
                Ok(()) => {
                    result.success += 1;
                    result.processed_ids.push(id);
                }
                Err(e) => {
                    result.failed += 1;
                    result.errors.push(format!("{id}: {e}"));
                }
            }
        }
        Ok(result)
    }

    async fn batch_delete(&self, ids: &[String]) -> Result<BatchResult, MemoriaError> {
        let mut result = BatchResult::default();
        for id in ids {
            match self.delete(id).await {
                Ok(()) => {
                    result.success += 1;
                    result.processed_ids.push(id.clone());
                }
                Err(e) => {
                    result.failed += 1;
                    result.errors.push(format!("{id}: {e}"));
                }
            }
        }
        Ok(result)
    }

    async fn close(&self) -> Result<(), MemoriaError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
