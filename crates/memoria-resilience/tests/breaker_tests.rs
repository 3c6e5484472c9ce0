// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the store and embedder wrappers.

use std::sync::Arc;
use std::time::Duration;

use memoria_chunking::ChunkingService;
use memoria_config::model::{ChunkingConfig, ResilienceConfig};
use memoria_core::traits::{ChunkStore, EmbeddingAdapter, PluginAdapter};
use memoria_core::types::{
    ChunkMetadata, ChunkType, ConversationChunk, EmbeddingInput, HealthStatus,
};
use memoria_core::MemoriaError;
use memoria_resilience::{
    CircuitBreaker, CircuitBreakerConfig, CircuitBreakerEmbedder, CircuitBreakerStore,
    CircuitState, CIRCUIT_OPEN_MESSAGE,
};
use memoria_test_utils::{InMemoryChunkStore, MockEmbedder};

fn config() -> ResilienceConfig {
    ResilienceConfig {
        failure_threshold: 2,
        success_threshold: 1,
        open_timeout_secs: 5,
        max_half_open_requests: 1,
    }
}

fn chunk(session: &str) -> ConversationChunk {
    ConversationChunk::new(session, "body", ChunkType::Discussion, ChunkMetadata::default())
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn open_store_rejects_without_calling_backend() {
    let store = CircuitBreakerStore::new(InMemoryChunkStore::new(), &config());
    store.inner().set_failing(true);

    assert!(matches!(store.store(chunk("s")).await, Err(MemoriaError::Storage { .. })));
    assert!(matches!(store.delete("x").await, Err(MemoriaError::Storage { .. })));
    assert_eq!(store.breaker().state(), CircuitState::Open);
    assert_eq!(store.inner().calls(), 2);

    let err = store.get_by_id("x").await.unwrap_err();
    assert!(matches!(err, MemoriaError::CircuitOpen { ref name } if name == "chunk-store"));
    assert_eq!(store.inner().calls(), 2);
    assert!(matches!(
        store.health_check().await.unwrap(),
        HealthStatus::Unhealthy(_)
    ));
}

#[tokio::test(start_paused = true)]
async fn store_recovers_after_timeout() {
    let store = CircuitBreakerStore::new(InMemoryChunkStore::new(), &config());
    store.inner().set_failing(true);
    for _ in 0..2 {
        store.initialize().await.unwrap_err();
    }
    store.inner().set_failing(false);

    tokio::time::advance(Duration::from_secs(5)).await;
    store.store(chunk("s")).await.unwrap();
    assert_eq!(store.breaker().state(), CircuitState::Closed);
    assert_eq!(store.inner().len().await, 1);
}

#[tokio::test(start_paused = true)]
async fn batches_fall_back_to_all_failed() {
    let store = CircuitBreakerStore::new(InMemoryChunkStore::new(), &config());
    store.inner().set_failing(true);
    for _ in 0..2 {
        store.initialize().await.unwrap_err();
    }

    let result = store
        .batch_store(vec![chunk("a"), chunk("b"), chunk("c")])
        .await
        .unwrap();
    assert_eq!(result.success, 0);
    assert_eq!(result.failed, 3);
    assert_eq!(result.errors, vec![CIRCUIT_OPEN_MESSAGE]);
    assert!(result.processed_ids.is_empty());

    let ids = vec!["a".to_string(), "b".to_string()];
    let result = store.batch_delete(&ids).await.unwrap();
    assert_eq!(result.failed, 2);
}

#[tokio::test]
async fn close_bypasses_open_breaker() {
    let store = CircuitBreakerStore::new(InMemoryChunkStore::new(), &config());
    store.inner().set_failing(true);
    for _ in 0..2 {
        store.initialize().await.unwrap_err();
    }
    assert_eq!(store.breaker().state(), CircuitState::Open);

    store.close().await.unwrap();
    assert!(store.inner().is_closed());
}

#[tokio::test(start_paused = true)]
async fn embedder_breaker_opens_and_recovers() {
    let embedder = CircuitBreakerEmbedder::new(MockEmbedder::new(), &config());
    embedder.inner().fail_next("down").await;
    embedder.inner().fail_next("down").await;

    let input = || EmbeddingInput {
        texts: vec!["text".to_string()],
    };
    assert!(matches!(embedder.embed(input()).await, Err(MemoriaError::Embedding { .. })));
    assert!(matches!(embedder.embed(input()).await, Err(MemoriaError::Embedding { .. })));
    assert!(matches!(embedder.embed(input()).await, Err(MemoriaError::CircuitOpen { .. })));
    assert_eq!(embedder.inner().request_count().await, 2);

    tokio::time::advance(Duration::from_secs(5)).await;
    assert!(embedder.embed(input()).await.is_ok());
    assert_eq!(embedder.breaker().state(), CircuitState::Closed);
    assert_eq!(embedder.name(), "mock-embedder");
}

#[tokio::test]
async fn chunking_service_surfaces_open_circuit_as_embedding_error() {
    let embedder = CircuitBreakerEmbedder::with_breaker(
        MockEmbedder::new(),
        CircuitBreaker::new(
            "embedding",
            CircuitBreakerConfig {
                failure_threshold: 1,
                ..Default::default()
            },
        ),
    );
    embedder.inner().fail_always("unreachable").await;
    let embedder = Arc::new(embedder);
    let mut service = ChunkingService::new(ChunkingConfig::default(), embedder.clone());

    let first = service
        .create_chunk("s", "first attempt", ChunkMetadata::default())
        .await
        .unwrap_err();
    assert!(first.to_string().contains("unreachable"));

    let second = service
        .create_chunk("s", "second attempt", ChunkMetadata::default())
        .await
        .unwrap_err();
    match second {
        MemoriaError::Embedding { source, .. } => {
            let source = source.expect("circuit error kept as source");
            assert!(source.to_string().contains("circuit breaker `embedding` is open"));
        }
        other => panic!("expected Embedding error, got {other}"),
    }
    assert_eq!(embedder.inner().request_count().await, 1);
    assert!(service.history().is_empty());
}
