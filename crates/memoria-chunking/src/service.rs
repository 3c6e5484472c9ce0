// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The chunking service: owns one session's state and turns conversation
//! text into classified, scored, embedded chunks.
//!
//! One instance serves one session. Every state-changing method takes
//! `&mut self`, so sharing an instance across tasks requires the caller to
//! wrap it in a mutex.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use memoria_config::model::ChunkingConfig;
use memoria_core::error::MemoriaError;
use memoria_core::traits::EmbeddingAdapter;
use memoria_core::types::{
    ChunkMetadata, ChunkType, ChunkingContext, ConversationChunk, EmbeddingInput,
};
use tracing::{debug, info, warn};

use crate::classifier;
use crate::context::{ContextHistory, ContextUpdate};
use crate::recording;
use crate::segmenter::Segmenter;
use crate::summarizer::{
    self, ROLLING_SUMMARY_INTERVAL, ROLLING_SUMMARY_TAGS, SESSION_SUMMARY_MIN_CHUNKS,
    SESSION_SUMMARY_TAGS,
};
use crate::trigger;

/// Stateful chunking engine for a single session.
pub struct ChunkingService {
    config: ChunkingConfig,
    embedder: Arc<dyn EmbeddingAdapter>,
    segmenter: Segmenter,
    current: ChunkingContext,
    history: ContextHistory,
    last_chunk_at: DateTime<Utc>,
}

impl ChunkingService {
    pub fn new(config: ChunkingConfig, embedder: Arc<dyn EmbeddingAdapter>) -> Self {
        let segmenter = Segmenter::new(config.max_content_length);
        Self {
            config,
            embedder,
            segmenter,
            current: ChunkingContext::default(),
            history: ContextHistory::new(),
            last_chunk_at: Utc::now(),
        }
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Adopt `context` as the current context and decide whether a chunk
    /// boundary has been reached.
    pub fn should_create_chunk(&mut self, context: ChunkingContext) -> bool {
        self.current = context;
        match trigger::evaluate(&self.config, &self.current, self.history.latest()) {
            Some(reason) => {
                debug!(%reason, "chunk boundary triggered");
                recording::record_trigger(reason);
                true
            }
            None => false,
        }
    }

    /// Create one chunk from `content`.
    ///
    /// Fails with [`MemoriaError::EmptyContent`] for empty content and with
    /// [`MemoriaError::Embedding`] when no vector could be generated; in
    /// both cases session state is left untouched.
    pub async fn create_chunk(
        &mut self,
        session_id: &str,
        content: &str,
        metadata: ChunkMetadata,
    ) -> Result<ConversationChunk, MemoriaError> {
        let chunk = self.build_chunk(session_id, content, metadata).await?;
        recording::record_chunk_created(chunk.chunk_type);
        Ok(chunk)
    }

    async fn build_chunk(
        &mut self,
        session_id: &str,
        content: &str,
        metadata: ChunkMetadata,
    ) -> Result<ConversationChunk, MemoriaError> {
        if content.is_empty() {
            return Err(MemoriaError::EmptyContent);
        }

        let chunk_type = classifier::classify_type(content);
        let metadata = classifier::enrich_metadata(metadata, content, &self.current);

        let mut chunk = ConversationChunk::new(session_id, content, chunk_type, metadata)?;
        chunk.summary = summarizer::extractive_summary(content);

        let text = summarizer::embedding_text(&chunk, self.config.max_embedding_content_length);
        chunk.embeddings = self.embed(text).await?;

        self.history.push(self.current.clone());
        self.last_chunk_at = Utc::now();

        debug!(
            chunk_id = %chunk.id,
            chunk_type = %chunk.chunk_type,
            tags = chunk.metadata.tags.len(),
            "chunk created"
        );
        Ok(chunk)
    }

    async fn embed(&self, text: String) -> Result<Vec<f32>, MemoriaError> {
        let output = self
            .embedder
            .embed(EmbeddingInput { texts: vec![text] })
            .await
            .map_err(|e| {
                recording::record_embedding_failure();
                warn!(error = %e, embedder = self.embedder.name(), "embedding generation failed");
                match e {
                    MemoriaError::Embedding { .. } => e,
                    other => MemoriaError::embedding("embedding service failed", other),
                }
            })?;

        output.embeddings.into_iter().next().ok_or_else(|| {
            recording::record_embedding_failure();
            MemoriaError::Embedding {
                message: "embedding service returned no vectors".to_string(),
                source: None,
            }
        })
    }

    /// Split a conversation into segments and chunk each one.
    ///
    /// Output order: segment chunks in input order, a rolling summary after
    /// every fifth segment chunk, then a session summary when more than
    /// three chunks were produced. Any failure aborts the whole call.
    pub async fn process_conversation(
        &mut self,
        session_id: &str,
        conversation: &str,
        base_metadata: ChunkMetadata,
    ) -> Result<Vec<ConversationChunk>, MemoriaError> {
        if conversation.is_empty() {
            return Err(MemoriaError::EmptyConversation);
        }
        if session_id.trim().is_empty() {
            return Err(MemoriaError::InvalidInput(
                "session id cannot be empty".to_string(),
            ));
        }

        let segmenter = self.segmenter;
        let mut chunks: Vec<ConversationChunk> = Vec::new();
        let mut segment_chunks = 0usize;

        for (index, segment) in segmenter.split(conversation).enumerate() {
            let chunk = self
                .create_chunk(session_id, &segment, base_metadata.clone())
                .await
                .map_err(|e| MemoriaError::ChunkCreation {
                    segment: index,
                    source: Box::new(e),
                })?;
            chunks.push(chunk);
            segment_chunks += 1;

            if segment_chunks % ROLLING_SUMMARY_INTERVAL == 0 {
                let group = &chunks[chunks.len() - ROLLING_SUMMARY_INTERVAL..];
                let content = summarizer::rolling_summary_content(group);
                let summary = self
                    .create_summary_chunk(session_id, &content, &base_metadata, ROLLING_SUMMARY_TAGS)
                    .await?;
                chunks.push(summary);
            }
        }

        recording::record_segments(segment_chunks);

        if chunks.len() > SESSION_SUMMARY_MIN_CHUNKS {
            let content = summarizer::session_summary_content(&chunks);
            let summary = self
                .create_summary_chunk(session_id, &content, &base_metadata, SESSION_SUMMARY_TAGS)
                .await?;
            chunks.push(summary);
        }

        info!(
            session_id,
            segments = segment_chunks,
            chunks = chunks.len(),
            "conversation processed"
        );
        Ok(chunks)
    }

    /// Run summary content through the full pipeline, then force its type.
    async fn create_summary_chunk(
        &mut self,
        session_id: &str,
        content: &str,
        base_metadata: &ChunkMetadata,
        tags: [&str; 2],
    ) -> Result<ConversationChunk, MemoriaError> {
        let mut metadata = base_metadata.clone();
        metadata.extend_tags(tags);

        let mut chunk = self.build_chunk(session_id, content, metadata).await?;
        chunk.chunk_type = ChunkType::SessionSummary;
        recording::record_chunk_created(chunk.chunk_type);
        Ok(chunk)
    }

    /// Apply a partial update to the current context.
    pub fn update_context(&mut self, update: ContextUpdate) {
        update.apply_to(&mut self.current);
    }

    pub fn current_context(&self) -> &ChunkingContext {
        &self.current
    }

    /// Contexts recorded at chunk creation, oldest first.
    pub fn history(&self) -> &ContextHistory {
        &self.history
    }

    pub fn last_chunk_at(&self) -> DateTime<Utc> {
        self.last_chunk_at
    }

    /// Whole minutes since the last chunk; suitable for
    /// [`ChunkingContext::elapsed_minutes`].
    pub fn minutes_since_last_chunk(&self) -> u32 {
        let minutes = (Utc::now() - self.last_chunk_at).num_minutes().max(0);
        u32::try_from(minutes).unwrap_or(u32::MAX)
    }

    /// Forget all session state. Call when a session ends.
    pub fn reset(&mut self) {
        self.current = ChunkingContext::default();
        self.history.clear();
        self.last_chunk_at = Utc::now();
        debug!("chunking state reset");
    }
}
