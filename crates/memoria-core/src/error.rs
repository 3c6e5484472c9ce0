// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Memoria memory engine.

use thiserror::Error;

/// The primary error type used across all Memoria adapter traits and core operations.
#[derive(Debug, Error)]
pub enum MemoriaError {
    /// Configuration errors (invalid TOML, unknown provider, missing fields).
    #[error("configuration error: {0}")]
    Config(String),

    /// A chunk was requested for empty content.
    #[error("content cannot be empty")]
    EmptyContent,

    /// A conversation was submitted for processing with no text.
    #[error("conversation cannot be empty")]
    EmptyConversation,

    /// Other caller-supplied input that cannot be turned into a chunk.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The embedding service failed to produce a vector.
    #[error("embedding generation failed: {message}")]
    Embedding {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Creating the chunk for one conversation segment failed.
    #[error("failed to create chunk for segment {segment}: {source}")]
    ChunkCreation {
        segment: usize,
        source: Box<MemoriaError>,
    },

    /// Storage backend errors (connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A circuit breaker rejected the call without reaching the backend.
    #[error("circuit breaker `{name}` is open")]
    CircuitOpen { name: String },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MemoriaError {
    /// Wrap any error as an embedding-stage failure.
    pub fn embedding(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        MemoriaError::Embedding {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Returns true for errors caused by the caller's input rather than a dependency.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            MemoriaError::EmptyContent
                | MemoriaError::EmptyConversation
                | MemoriaError::InvalidInput(_)
        )
    }
}
