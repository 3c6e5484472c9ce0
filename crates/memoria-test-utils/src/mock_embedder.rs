// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock embedding adapter for deterministic testing.
//!
//! `MockEmbedder` implements `EmbeddingAdapter` with vectors derived from the
//! input text, so the same text always embeds the same way. Failures are
//! scripted through a FIFO queue, and every request is recorded.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use memoria_core::traits::{EmbeddingAdapter, PluginAdapter};
use memoria_core::types::{AdapterType, EmbeddingInput, EmbeddingOutput, HealthStatus};
use memoria_core::MemoriaError;

/// Default vector width.
pub const MOCK_DIMENSIONS: usize = 8;

/// A mock embedder returning deterministic vectors.
///
/// Each call pops the next scripted outcome: `Some(message)` fails the call
/// with that message, `None` lets it succeed. An empty script succeeds
/// unless [`MockEmbedder::fail_always`] was set.
pub struct MockEmbedder {
    dimensions: usize,
    script: Arc<Mutex<VecDeque<Option<String>>>>,
    always_fail: Arc<Mutex<Option<String>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self::with_dimensions(MOCK_DIMENSIONS)
    }

    pub fn with_dimensions(dimensions: usize) -> Self {
        Self {
            dimensions,
            script: Arc::new(Mutex::new(VecDeque::new())),
            always_fail: Arc::new(Mutex::new(None)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue one failing call.
    pub async fn fail_next(&self, message: impl Into<String>) {
        self.script.lock().await.push_back(Some(message.into()));
    }

    /// Queue one successful call (useful between scripted failures).
    pub async fn succeed_next(&self) {
        self.script.lock().await.push_back(None);
    }

    /// Fail every unscripted call until [`MockEmbedder::recover`].
    pub async fn fail_always(&self, message: impl Into<String>) {
        *self.always_fail.lock().await = Some(message.into());
    }

    pub async fn recover(&self) {
        *self.always_fail.lock().await = None;
    }

    /// Every text received so far, in call order.
    pub async fn requests(&self) -> Vec<String> {
        self.requests.lock().await.clone()
    }

    pub async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    /// The vector this embedder produces for `text`.
    pub fn vector_for(&self, text: &str) -> Vec<f32> {
        let seed = text
            .bytes()
            .fold(17u64, |acc, b| acc.wrapping_mul(31).wrapping_add(u64::from(b)));
        (0..self.dimensions as u64)
            .map(|i| {
                let mixed = seed.wrapping_mul(i + 1).rotate_left((i % 64) as u32);
                (mixed % 10_000) as f32 / 10_000.0
            })
            .collect()
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockEmbedder {
    fn name(&self) -> &str {
        "mock-embedder"
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
impl EmbeddingAdapter for MockEmbedder {
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, MemoriaError> {
        self.requests.lock().await.extend(input.texts.iter().cloned());

        let scripted = self.script.lock().await.pop_front();
        let failure = match scripted {
            Some(outcome) => outcome,
            None => self.always_fail.lock().await.clone(),
        };
        if let Some(message) = failure {
            return Err(MemoriaError::Embedding {
                message,
                source: None,
            });
        }

        Ok(EmbeddingOutput {
            embeddings: input.texts.iter().map(|t| self.vector_for(t)).collect(),
            dimensions: self.dimensions,
        })
    }
}
