// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `memoria process`: chunk a whole conversation and print the chunks.

use std::sync::Arc;

use memoria_chunking::ChunkingService;
use memoria_config::model::ChunkingConfig;
use memoria_config::MemoriaConfig;
use memoria_core::traits::{EmbeddingAdapter, PluginAdapter};
use memoria_core::types::{ChunkMetadata, ConversationChunk};
use memoria_core::MemoriaError;
use memoria_resilience::CircuitBreakerEmbedder;
use tracing::info;

use crate::{input, print_json, ProcessArgs};

pub async fn run(config: &MemoriaConfig, args: ProcessArgs) -> Result<(), MemoriaError> {
    let conversation = input::read_input(args.file.as_deref()).await?;

    let embedder = memoria_embedding::create_embedder(&config.embedding)?;
    info!(
        provider = %config.embedding.provider,
        embedder = embedder.name(),
        "embedding service ready"
    );
    let embedder = Arc::new(CircuitBreakerEmbedder::new(embedder, &config.resilience));

    let metadata = base_metadata(args.repository, &args.tags);
    let chunks = chunk_conversation(
        config.chunking.clone(),
        embedder,
        &args.session,
        &conversation,
        metadata,
    )
    .await?;

    print_json(&chunks)
}

/// Metadata shared by every chunk of one `process` run.
pub fn base_metadata(repository: Option<String>, tags: &[String]) -> ChunkMetadata {
    let mut metadata = ChunkMetadata {
        repository,
        ..Default::default()
    };
    metadata.extend_tags(tags.iter().map(String::as_str));
    metadata
}

pub async fn chunk_conversation(
    config: ChunkingConfig,
    embedder: Arc<dyn EmbeddingAdapter>,
    session_id: &str,
    conversation: &str,
    metadata: ChunkMetadata,
) -> Result<Vec<ConversationChunk>, MemoriaError> {
    let mut service = ChunkingService::new(config, embedder);
    service
        .process_conversation(session_id, conversation, metadata)
        .await
}

#[cfg(test)]
mod tests {
    use memoria_core::types::ChunkType;
    use memoria_test_utils::MockEmbedder;

    use super::*;

    #[test]
    fn base_metadata_dedups_tags() {
        let tags = vec!["api".to_string(), "api".to_string(), "urgent".to_string()];
        let metadata = base_metadata(Some("acme/api".to_string()), &tags);
        assert_eq!(metadata.tags, vec!["api", "urgent"]);
        assert_eq!(metadata.repository.as_deref(), Some("acme/api"));
    }

    #[tokio::test]
    async fn chunks_conversation_with_shared_metadata() {
        let conversation = "User: login fails with an error\n\
                            Assistant: Fixed the token check\n\
                            User: works now, thanks\n\
                            Assistant: great";
        let chunks = chunk_conversation(
            ChunkingConfig::default(),
            Arc::new(MockEmbedder::new()),
            "s-1",
            conversation,
            base_metadata(Some("acme/api".to_string()), &["cli".to_string()]),
        )
        .await
        .unwrap();

        assert_eq!(chunks.len(), 5);
        assert_eq!(chunks[4].chunk_type, ChunkType::SessionSummary);
        for chunk in &chunks {
            assert_eq!(chunk.session_id, "s-1");
            assert!(chunk.metadata.has_tag("cli"));
            assert_eq!(chunk.metadata.repository.as_deref(), Some("acme/api"));
            assert!(!chunk.embeddings.is_empty());
        }
    }

    #[tokio::test]
    async fn open_circuit_fails_the_run() {
        let mock = MockEmbedder::new();
        mock.fail_always("unreachable").await;
        let embedder = CircuitBreakerEmbedder::new(mock, &Default::default());

        let err = chunk_conversation(
            ChunkingConfig::default(),
            Arc::new(embedder),
            "s-1",
            "User: hello",
            ChunkMetadata::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, MemoriaError::ChunkCreation { segment: 0, .. }));
    }
}
