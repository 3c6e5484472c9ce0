// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Failure isolation for Memoria's external collaborators.
//!
//! [`CircuitBreaker`] is the primitive. [`CircuitBreakerStore`] and
//! [`CircuitBreakerEmbedder`] wrap a `ChunkStore` or `EmbeddingAdapter` so
//! that a failing backend is rejected quickly instead of being hammered.

pub mod circuit_breaker;
pub mod embedder;
pub mod store;

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitBreakerStats, CircuitState};
pub use embedder::CircuitBreakerEmbedder;
pub use store::{CircuitBreakerStore, CIRCUIT_OPEN_MESSAGE};
