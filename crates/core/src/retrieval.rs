//! Retrieval domain types.
//!
//! One hybrid query carries both a vector (nearest-neighbor similarity)
//! and a text query (keyword/semantic ranking). The index answers with
//! ranked passages and, when its semantic ranking finds a high-confidence
//! excerpt, an extractive answer.

use serde::{Deserialize, Serialize};

/// A hybrid search request: vector similarity plus keyword/semantic
/// ranking in a single query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HybridQuery {
    /// Embedding of the user's raw question
    pub vector: Vec<f32>,

    /// The composed textual search query
    pub text: String,

    /// Neighbors requested at the vector stage
    pub k_nearest: usize,

    /// Ranked results to read back
    pub top: usize,

    /// Whether to ask the service for extractive captions/answers
    pub want_extractive_answer: bool,
}

impl HybridQuery {
    /// The query shape the answering pipeline issues: 3 vector neighbors,
    /// top-2 results, extractive answers on.
    pub fn for_answering(vector: Vec<f32>, text: impl Into<String>) -> Self {
        Self {
            vector,
            text: text.into(),
            k_nearest: 3,
            top: 2,
            want_extractive_answer: true,
        }
    }
}

/// A ranked passage returned by the search index.
///
/// Ordering within a result set reflects the service's relevance ranking,
/// not insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievedPassage {
    pub id: String,
    pub content: String,
}

/// A high-confidence excerpt surfaced by the service's semantic ranking.
///
/// When present it supersedes passage concatenation as the answer source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractiveAnswer {
    pub text: String,
}

/// Everything one hybrid search returns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Top-K passages in relevance-rank order
    pub passages: Vec<RetrievedPassage>,

    /// Extractive answers, best first; empty when the ranking found none
    pub extractive_answers: Vec<ExtractiveAnswer>,
}

impl SearchOutcome {
    /// The best extractive answer, if the service produced any.
    pub fn extractive_answer(&self) -> Option<&ExtractiveAnswer> {
        self.extractive_answers.first()
    }
}

/// A chunk uploaded to the search index by the indexing pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexDocument {
    pub id: String,
    pub content: String,

    /// Embedding of `content`, stored for vector search
    #[serde(rename = "contentVector")]
    pub content_vector: Vec<f32>,
}
