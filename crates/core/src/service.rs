//! Collaborator traits — the seams to every external service.
//!
//! The pipeline only ever sees these traits; HTTP implementations live in
//! the `ragline-providers`, `ragline-search`, `ragline-chatlog`, and
//! `ragline-indexer` crates, and tests substitute scripted fakes. All
//! calls are single-attempt: retry policy, if any, belongs to the caller's
//! deployment environment, not this pipeline.

use async_trait::async_trait;

use crate::error::{IndexerError, ProviderError, SearchError, StoreError};
use crate::message::{ChatLogRecord, ChatMessage};
use crate::retrieval::{HybridQuery, IndexDocument, SearchOutcome};

/// Chat completion service: role-tagged messages in, one continuation out.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Send `messages` to the given model deployment and return the text
    /// of its single response.
    async fn complete(
        &self,
        deployment: &str,
        messages: &[ChatMessage],
    ) -> std::result::Result<String, ProviderError>;
}

/// Text embedding service.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    /// Embed `text` with the given model deployment.
    async fn embed(
        &self,
        deployment: &str,
        text: &str,
    ) -> std::result::Result<Vec<f32>, ProviderError>;
}

/// The vector/keyword search index.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Issue one hybrid query and read back ranked passages plus any
    /// extractive answers.
    async fn hybrid_search(
        &self,
        query: &HybridQuery,
    ) -> std::result::Result<SearchOutcome, SearchError>;

    /// Upload chunk documents produced by the indexing pipeline.
    async fn upload(
        &self,
        documents: &[IndexDocument],
    ) -> std::result::Result<(), SearchError>;
}

/// Durable conversation-log store.
#[async_trait]
pub trait ChatLogStore: Send + Sync {
    /// Persist a record and return the identifier the store assigned.
    async fn insert(&self, record: &ChatLogRecord) -> std::result::Result<String, StoreError>;
}

/// Document text-extraction service: file bytes in, plain text out.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(
        &self,
        file_name: &str,
        bytes: &[u8],
    ) -> std::result::Result<String, IndexerError>;
}
