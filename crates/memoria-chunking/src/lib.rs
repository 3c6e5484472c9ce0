// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation chunking and classification engine for Memoria.
//!
//! Decides *when* accumulated conversation becomes a chunk, *what kind* of
//! chunk it is, how significant and reusable it is, and rolls groups of
//! chunks up into summaries.
//!
//! ## Architecture
//!
//! - **patterns**: compiled, shared pattern tables
//! - **classifier**: chunk type, difficulty, outcome, tags
//! - **scorer**: impact, reusability, significance, concepts, complexity
//! - **segmenter**: lazy conversation splitting
//! - **trigger**: chunk-boundary rules and context-switch detection
//! - **summarizer**: extractive summaries and roll-up content
//! - **service**: [`ChunkingService`], the per-session orchestrator

pub mod classifier;
pub mod context;
mod patterns;
pub mod recording;
pub mod scorer;
pub mod segmenter;
pub mod service;
pub mod summarizer;
pub mod trigger;

pub use context::{ContextHistory, ContextUpdate, HISTORY_CAPACITY};
pub use segmenter::{Segmenter, Segments};
pub use service::ChunkingService;
pub use trigger::TriggerReason;
