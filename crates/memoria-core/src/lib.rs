// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Memoria, a persistent-memory engine for AI assistants.
//!
//! This crate provides the error type, the chunk domain types shared by the
//! chunking engine and the storage layer, and the adapter traits for the
//! external collaborators (embedding service, chunk store).

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::MemoriaError;
pub use types::{
    AdapterType, ChunkMetadata, ChunkType, ChunkingContext, ConversationChunk, ConversationFlow,
    Difficulty, HealthStatus, Outcome,
};

pub use traits::{ChunkStore, EmbeddingAdapter, PluginAdapter};
