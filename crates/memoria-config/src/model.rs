// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Memoria.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Memoria configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemoriaConfig {
    /// Process-level settings (logging).
    #[serde(default)]
    pub server: ServerConfig,

    /// Chunk triggering and segmentation settings.
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Embedding service settings.
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Circuit breaker settings for the embedding service and chunk store.
    #[serde(default)]
    pub resilience: ResilienceConfig,
}

/// Process-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Chunking engine configuration.
///
/// Controls when accumulated conversation is cut into a chunk and how large
/// segments and embedding texts may grow.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChunkingConfig {
    /// Cut a chunk as soon as any todo item is completed.
    #[serde(default = "default_todo_completion_trigger")]
    pub todo_completion_trigger: bool,

    /// Number of modified files that triggers a chunk.
    #[serde(default = "default_file_change_threshold")]
    pub file_change_threshold: usize,

    /// Minutes since the last chunk that trigger a new one.
    #[serde(default = "default_time_threshold_minutes")]
    pub time_threshold_minutes: u32,

    /// Maximum segment size in bytes; also the content-volume trigger limit.
    #[serde(default = "default_max_content_length")]
    pub max_content_length: usize,

    /// Maximum length of the text sent to the embedding service.
    #[serde(default = "default_max_embedding_content_length")]
    pub max_embedding_content_length: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            todo_completion_trigger: default_todo_completion_trigger(),
            file_change_threshold: default_file_change_threshold(),
            time_threshold_minutes: default_time_threshold_minutes(),
            max_content_length: default_max_content_length(),
            max_embedding_content_length: default_max_embedding_content_length(),
        }
    }
}

fn default_todo_completion_trigger() -> bool {
    true
}

fn default_file_change_threshold() -> usize {
    3
}

fn default_time_threshold_minutes() -> u32 {
    10
}

fn default_max_content_length() -> usize {
    4000
}

fn default_max_embedding_content_length() -> usize {
    8000
}

/// Embedding service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EmbeddingConfig {
    /// Provider name: `openai` (any OpenAI-compatible endpoint) or `disabled`.
    #[serde(default = "default_embedding_provider")]
    pub provider: String,

    /// Full URL of the embeddings endpoint.
    #[serde(default = "default_embedding_endpoint")]
    pub endpoint: String,

    /// Embedding model identifier.
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Expected vector dimensionality.
    #[serde(default = "default_embedding_dimensions")]
    pub dimensions: usize,

    /// API key sent as a bearer token. `None` sends no authorization header.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Per-request HTTP timeout in seconds.
    #[serde(default = "default_embedding_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            endpoint: default_embedding_endpoint(),
            model: default_embedding_model(),
            dimensions: default_embedding_dimensions(),
            api_key: None,
            timeout_secs: default_embedding_timeout_secs(),
        }
    }
}

fn default_embedding_provider() -> String {
    "openai".to_string()
}

fn default_embedding_endpoint() -> String {
    "https://api.openai.com/v1/embeddings".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_embedding_dimensions() -> usize {
    1536
}

fn default_embedding_timeout_secs() -> u64 {
    30
}

/// Circuit breaker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ResilienceConfig {
    /// Consecutive failures that open the circuit.
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u32,

    /// Consecutive half-open successes that close the circuit again.
    #[serde(default = "default_success_threshold")]
    pub success_threshold: u32,

    /// Seconds the circuit stays open before admitting trial calls.
    #[serde(default = "default_open_timeout_secs")]
    pub open_timeout_secs: u64,

    /// Concurrent trial calls admitted while half-open.
    #[serde(default = "default_max_half_open_requests")]
    pub max_half_open_requests: u32,
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            failure_threshold: default_failure_threshold(),
            success_threshold: default_success_threshold(),
            open_timeout_secs: default_open_timeout_secs(),
            max_half_open_requests: default_max_half_open_requests(),
        }
    }
}

fn default_failure_threshold() -> u32 {
    5
}

fn default_success_threshold() -> u32 {
    2
}

fn default_open_timeout_secs() -> u64 {
    30
}

fn default_max_half_open_requests() -> u32 {
    3
}
