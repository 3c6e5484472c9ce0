// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the chunking engine.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::error::MemoriaError;

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Embedding,
    Storage,
}

// --- Embedding types ---

/// Input for an embedding adapter.
#[derive(Debug, Clone)]
pub struct EmbeddingInput {
    /// Texts to embed, one vector is returned per entry.
    pub texts: Vec<String>,
}

/// Output from an embedding adapter.
#[derive(Debug, Clone)]
pub struct EmbeddingOutput {
    /// One vector per input text, in input order.
    pub embeddings: Vec<Vec<f32>>,
    /// Dimensionality of each vector.
    pub dimensions: usize,
}

// --- Chunk domain types ---

/// The kind of knowledge a chunk carries.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ChunkType {
    ArchitectureDecision,
    CodeChange,
    Solution,
    Problem,
    Discussion,
    SessionSummary,
}

impl ChunkType {
    /// All chunk types in reporting order.
    pub const ALL: [ChunkType; 6] = [
        ChunkType::ArchitectureDecision,
        ChunkType::CodeChange,
        ChunkType::Solution,
        ChunkType::Problem,
        ChunkType::Discussion,
        ChunkType::SessionSummary,
    ];
}

/// How hard the work captured in a chunk was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Simple,
    Moderate,
    Complex,
}

/// Where the work captured in a chunk ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Failed,
    InProgress,
    Abandoned,
}

/// Coarse phase of a conversation.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConversationFlow {
    ProblemIdentification,
    SolutionExploration,
    Implementation,
    Verification,
    #[default]
    Idle,
}

/// Combined impact/reusability category of a chunk.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SignificanceLevel {
    Low,
    Medium,
    High,
    Critical,
}

/// Educational value of a chunk for future sessions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LearningValue {
    Low,
    Medium,
    High,
}

/// Status of a tracked todo item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

/// A todo item tracked by the assistant during a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub status: TodoStatus,
    #[serde(default)]
    pub priority: Option<String>,
}

impl TodoItem {
    /// Creates a pending todo item.
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            status: TodoStatus::Pending,
            priority: None,
        }
    }

    /// Returns a copy of this item with the given status.
    pub fn with_status(mut self, status: TodoStatus) -> Self {
        self.status = status;
        self
    }
}

/// Snapshot of what is happening in a session, used to decide when to cut a chunk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkingContext {
    /// Todo items visible to the assistant.
    #[serde(default)]
    pub current_todos: Vec<TodoItem>,
    /// Files modified since the last chunk, in modification order.
    #[serde(default)]
    pub file_modifications: Vec<String>,
    /// Tools invoked since the last chunk, in call order.
    #[serde(default)]
    pub tools_used: Vec<String>,
    /// Minutes elapsed since the last chunk.
    #[serde(default)]
    pub elapsed_minutes: u32,
    /// Current conversation phase.
    #[serde(default)]
    pub flow: ConversationFlow,
}

impl ChunkingContext {
    /// Returns true if any tracked todo has been completed.
    pub fn has_completed_todos(&self) -> bool {
        self.current_todos
            .iter()
            .any(|todo| todo.status == TodoStatus::Completed)
    }
}

/// Structural measurements of a chunk's content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityIndicators {
    pub content_length: usize,
    pub tools_count: usize,
    pub files_count: usize,
    pub code_blocks: usize,
    pub technical_density: usize,
}

/// Analysis results attached to every chunk by the scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtendedMetadata {
    /// Impact score in `[0.0, 1.0]`.
    pub impact_score: f64,
    /// Reusability score in `[0.0, 1.0]`.
    pub reusability_score: f64,
    pub significance_level: SignificanceLevel,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub technical_concepts: Vec<String>,
    pub complexity_indicators: ComplexityIndicators,
    pub time_investment_minutes: u32,
    pub learning_value: LearningValue,
    /// Additional caller-defined analysis values.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Metadata attached to a conversation chunk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    /// Tags in insertion order. Never contains duplicates.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub tools_used: Vec<String>,
    #[serde(default)]
    pub files_modified: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended: Option<ExtendedMetadata>,
}

impl ChunkMetadata {
    /// Appends a tag unless an identical (case-sensitive) tag is already present.
    ///
    /// Returns true if the tag was added.
    pub fn add_tag(&mut self, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        if self.tags.contains(&tag) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    /// Appends every tag from `tags`, skipping duplicates.
    pub fn extend_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for tag in tags {
            self.add_tag(tag);
        }
    }

    /// Returns true if `tag` is present.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// A unit of conversational memory ready to be handed to storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationChunk {
    pub id: String,
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub chunk_type: ChunkType,
    pub content: String,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embeddings: Vec<f32>,
    pub metadata: ChunkMetadata,
}

impl ConversationChunk {
    /// Creates a chunk with a fresh id and no summary or embedding yet.
    pub fn new(
        session_id: &str,
        content: &str,
        chunk_type: ChunkType,
        metadata: ChunkMetadata,
    ) -> Result<Self, MemoriaError> {
        if session_id.trim().is_empty() {
            return Err(MemoriaError::InvalidInput(
                "session id cannot be empty".to_string(),
            ));
        }
        if content.is_empty() {
            return Err(MemoriaError::EmptyContent);
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.to_string(),
            timestamp: Utc::now(),
            chunk_type,
            content: content.to_string(),
            summary: String::new(),
            embeddings: Vec::new(),
            metadata,
        })
    }
}

// --- Storage types ---

/// Aggregate statistics reported by a chunk store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreStats {
    pub total_chunks: u64,
    pub chunks_by_type: BTreeMap<String, u64>,
    pub chunks_by_repo: BTreeMap<String, u64>,
}

/// Outcome of a batch store or delete operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub success: usize,
    pub failed: usize,
    pub errors: Vec<String>,
    pub processed_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn chunk_type_display_is_snake_case() {
        assert_eq!(ChunkType::ArchitectureDecision.to_string(), "architecture_decision");
        assert_eq!(ChunkType::SessionSummary.to_string(), "session_summary");
        assert_eq!(
            ChunkType::from_str("code_change").expect("should parse"),
            ChunkType::CodeChange
        );
    }

    #[test]
    fn chunk_type_serde_matches_display() {
        for chunk_type in ChunkType::ALL {
            let json = serde_json::to_string(&chunk_type).expect("should serialize");
            assert_eq!(json, format!("\"{chunk_type}\""));
        }
    }

    #[test]
    fn default_context_is_idle_and_empty() {
        let ctx = ChunkingContext::default();
        assert_eq!(ctx.flow, ConversationFlow::Idle);
        assert_eq!(ctx.elapsed_minutes, 0);
        assert!(ctx.tools_used.is_empty());
        assert!(!ctx.has_completed_todos());
    }

    #[test]
    fn completed_todo_is_detected() {
        let ctx = ChunkingContext {
            current_todos: vec![
                TodoItem::new("1", "write parser"),
                TodoItem::new("2", "write tests").with_status(TodoStatus::Completed),
            ],
            ..Default::default()
        };
        assert!(ctx.has_completed_todos());
    }

    #[test]
    fn add_tag_rejects_exact_duplicates_only() {
        let mut meta = ChunkMetadata::default();
        assert!(meta.add_tag("rust"));
        assert!(!meta.add_tag("rust"));
        assert!(meta.add_tag("Rust"));
        meta.extend_tags(["rust", "api", "api"]);
        assert_eq!(meta.tags, vec!["rust", "Rust", "api"]);
    }

    #[test]
    fn new_chunk_rejects_empty_content_and_session() {
        let err = ConversationChunk::new("s1", "", ChunkType::Discussion, ChunkMetadata::default())
            .unwrap_err();
        assert!(matches!(err, MemoriaError::EmptyContent));

        let err = ConversationChunk::new("  ", "hi", ChunkType::Discussion, ChunkMetadata::default())
            .unwrap_err();
        assert!(matches!(err, MemoriaError::InvalidInput(_)));
    }

    #[test]
    fn new_chunk_has_unique_ids() {
        let a = ConversationChunk::new("s1", "a", ChunkType::Discussion, ChunkMetadata::default())
            .unwrap();
        let b = ConversationChunk::new("s1", "a", ChunkType::Discussion, ChunkMetadata::default())
            .unwrap();
        assert_ne!(a.id, b.id);
        assert!(a.summary.is_empty());
        assert!(a.embeddings.is_empty());
    }

    #[test]
    fn chunk_serializes_type_field() {
        let chunk =
            ConversationChunk::new("s1", "hello", ChunkType::Problem, ChunkMetadata::default())
                .unwrap();
        let json = serde_json::to_value(&chunk).expect("should serialize");
        assert_eq!(json["type"], "problem");
        assert!(json.get("embeddings").is_none());
    }
}
