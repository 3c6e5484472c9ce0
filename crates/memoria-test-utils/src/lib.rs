// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Memoria integration tests.
//!
//! Provides mock adapters for fast, deterministic, CI-runnable tests without
//! an embedding service or a real chunk store.
//!
//! # Components
//!
//! - [`MockEmbedder`] - Deterministic embedder with scripted failures
//! - [`InMemoryChunkStore`] - `ChunkStore` backed by a vector, with a failure switch

pub mod memory_store;
pub mod mock_embedder;

pub use memory_store::InMemoryChunkStore;
pub use mock_embedder::MockEmbedder;
