// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers for the chunking engine.
//!
//! Uses the metrics-rs facade; without an installed recorder every call is
//! a no-op.

use memoria_core::types::ChunkType;
use metrics::{describe_counter, describe_histogram};

use crate::trigger::TriggerReason;

/// Register all chunking metric descriptions.
///
/// Called once at startup after the recorder is installed.
pub fn register_metrics() {
    describe_counter!("memoria_chunks_created_total", "Chunks created, by type");
    describe_counter!(
        "memoria_chunk_triggers_total",
        "Chunk boundaries triggered, by reason"
    );
    describe_counter!(
        "memoria_embedding_failures_total",
        "Embedding requests that failed during chunk creation"
    );
    describe_histogram!(
        "memoria_conversation_segments",
        "Segments produced per processed conversation"
    );
}

pub fn record_chunk_created(chunk_type: ChunkType) {
    metrics::counter!("memoria_chunks_created_total", "type" => chunk_type.to_string())
        .increment(1);
}

pub fn record_trigger(reason: TriggerReason) {
    let reason: &'static str = reason.into();
    metrics::counter!("memoria_chunk_triggers_total", "reason" => reason).increment(1);
}

pub fn record_embedding_failure() {
    metrics::counter!("memoria_embedding_failures_total").increment(1);
}

pub fn record_segments(count: usize) {
    metrics::histogram!("memoria_conversation_segments").record(count as f64);
}
