// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding adapter trait for vector embedding generation.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::MemoriaError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{EmbeddingInput, EmbeddingOutput};

/// Adapter for generating vector embeddings from text.
///
/// The chunking engine calls this once per created chunk with a single
/// text. Implementations own any retry or timeout policy.
#[async_trait]
pub trait EmbeddingAdapter: PluginAdapter {
    /// Generates embeddings for the given input.
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, MemoriaError>;
}

/// Shared adapters (`Arc<dyn EmbeddingAdapter>`) can be wrapped like owned ones.
#[async_trait]
impl<T: EmbeddingAdapter + ?Sized> EmbeddingAdapter for Arc<T> {
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, MemoriaError> {
        (**self).embed(input).await
    }
}
