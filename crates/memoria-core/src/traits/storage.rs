// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chunk store trait for the downstream persistence layer.

use async_trait::async_trait;

use crate::error::MemoriaError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{BatchResult, ConversationChunk, StoreStats};

/// Persistence backend for finished conversation chunks.
///
/// The chunking engine never calls a store itself; the server layer hands
/// chunks to an implementation of this trait, usually wrapped in a
/// circuit breaker.
#[async_trait]
pub trait ChunkStore: PluginAdapter {
    /// Initializes the backend (schema, collections, connections).
    async fn initialize(&self) -> Result<(), MemoriaError>;

    /// Stores a single chunk.
    async fn store(&self, chunk: ConversationChunk) -> Result<(), MemoriaError>;

    /// Fetches a chunk by id.
    async fn get_by_id(&self, id: &str) -> Result<Option<ConversationChunk>, MemoriaError>;

    /// Lists all chunks of a session in creation order.
    async fn list_by_session(&self, session_id: &str)
    -> Result<Vec<ConversationChunk>, MemoriaError>;

    /// Lists chunks belonging to a repository, newest first.
    async fn list_by_repository(
        &self,
        repository: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ConversationChunk>, MemoriaError>;

    /// Replaces an existing chunk.
    async fn update(&self, chunk: ConversationChunk) -> Result<(), MemoriaError>;

    /// Deletes a chunk by id.
    async fn delete(&self, id: &str) -> Result<(), MemoriaError>;

    /// Returns aggregate statistics.
    async fn stats(&self) -> Result<StoreStats, MemoriaError>;

    /// Stores many chunks, reporting per-chunk failures in the result.
    async fn batch_store(&self, chunks: Vec<ConversationChunk>)
    -> Result<BatchResult, MemoriaError>;

    /// Deletes many chunks, reporting per-id failures in the result.
    async fn batch_delete(&self, ids: &[String]) -> Result<BatchResult, MemoriaError>;

    /// Closes the backend, flushing pending writes.
    async fn close(&self) -> Result<(), MemoriaError>;
}
