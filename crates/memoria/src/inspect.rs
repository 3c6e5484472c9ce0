// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Offline views of the chunking pipeline: segmentation and classification
//! without calling the embedding service.

use memoria_chunking::{classifier, summarizer, Segmenter};
use memoria_config::model::ChunkingConfig;
use memoria_core::types::{ChunkMetadata, ChunkType, ChunkingContext};
use memoria_core::MemoriaError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Classification {
    pub chunk_type: ChunkType,
    pub summary: String,
    pub metadata: ChunkMetadata,
}

pub fn segments(config: &ChunkingConfig, text: &str) -> Vec<String> {
    Segmenter::new(config.max_content_length).split(text).collect()
}

pub fn classify(text: &str) -> Result<Classification, MemoriaError> {
    if text.trim().is_empty() {
        return Err(MemoriaError::EmptyContent);
    }
    Ok(Classification {
        chunk_type: classifier::classify_type(text),
        summary: summarizer::extractive_summary(text),
        metadata: classifier::enrich_metadata(
            ChunkMetadata::default(),
            text,
            &ChunkingContext::default(),
        ),
    })
}
