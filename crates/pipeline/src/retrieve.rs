//! Hybrid retrieval.
//!
//! Two query halves feed one search request: an embedding of the user's
//! raw question (vector similarity) and the composed search query
//! (keyword/semantic ranking). The index answers with top-ranked passages
//! and, when its semantic ranking is confident, an extractive answer.
//! Which of the two becomes the answer source is the answer composer's
//! call, not ours.

use std::sync::Arc;
use tracing::debug;

use ragline_core::retrieval::{HybridQuery, SearchOutcome};
use ragline_core::service::{EmbeddingService, SearchIndex};
use ragline_core::Result;

/// Retrieval half of the pipeline: owns the embedding client, the index
/// client, and the embedding deployment identifier.
pub struct HybridRetriever {
    embedding: Arc<dyn EmbeddingService>,
    index: Arc<dyn SearchIndex>,
    embedding_deployment: String,
}

impl HybridRetriever {
    pub fn new(
        embedding: Arc<dyn EmbeddingService>,
        index: Arc<dyn SearchIndex>,
        embedding_deployment: impl Into<String>,
    ) -> Self {
        Self {
            embedding,
            index,
            embedding_deployment: embedding_deployment.into(),
        }
    }

    /// Embed the user's raw question for the vector stage.
    ///
    /// Independent of query composition; the handler runs the two
    /// concurrently.
    pub async fn embed_question(&self, raw_question: &str) -> Result<Vec<f32>> {
        let vector = self
            .embedding
            .embed(&self.embedding_deployment, raw_question)
            .await?;
        debug!(dims = vector.len(), "Question embedded");
        Ok(vector)
    }

    /// Issue the hybrid search: 3 vector neighbors, top-2 results,
    /// extractive answers requested. Single attempt.
    pub async fn search(&self, vector: Vec<f32>, composed_query: &str) -> Result<SearchOutcome> {
        let query = HybridQuery::for_answering(vector, composed_query);
        let outcome = self.index.hybrid_search(&query).await?;

        debug!(
            passages = outcome.passages.len(),
            has_extractive = outcome.extractive_answer().is_some(),
            "Hybrid search complete"
        );

        Ok(outcome)
    }

    /// Convenience for sequential callers: embed, then search.
    pub async fn retrieve(&self, raw_question: &str, composed_query: &str) -> Result<SearchOutcome> {
        let vector = self.embed_question(raw_question).await?;
        self.search(vector, composed_query).await
    }
}
