//! Model profiles and token counting.
//!
//! The set of usable models is a closed enum: unknown names are rejected
//! when configuration is loaded, not at request time. Each model carries a
//! fixed token capacity; request composition works against 80% of that
//! capacity to stay safely under the service's hard ceiling.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The models this backend knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelKind {
    #[serde(rename = "gpt-35-turbo")]
    Gpt35Turbo,
    #[serde(rename = "gpt-4")]
    Gpt4,
    #[serde(rename = "gpt-4-32k")]
    Gpt4_32k,
    #[serde(rename = "text-embedding-ada-002")]
    TextEmbeddingAda002,
}

impl ModelKind {
    /// Parse a configured model name, rejecting anything outside the
    /// closed set.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "gpt-35-turbo" => Some(Self::Gpt35Turbo),
            "gpt-4" => Some(Self::Gpt4),
            "gpt-4-32k" => Some(Self::Gpt4_32k),
            "text-embedding-ada-002" => Some(Self::TextEmbeddingAda002),
            _ => None,
        }
    }

    /// The model's hard token capacity.
    pub fn max_tokens(self) -> usize {
        match self {
            Self::Gpt35Turbo => 4096,
            Self::Gpt4 => 8192,
            Self::Gpt4_32k => 32768,
            Self::TextEmbeddingAda002 => 4096,
        }
    }

    /// Whether this model answers chat completions (as opposed to
    /// producing embeddings).
    pub fn is_chat(self) -> bool {
        !matches!(self, Self::TextEmbeddingAda002)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gpt35Turbo => "gpt-35-turbo",
            Self::Gpt4 => "gpt-4",
            Self::Gpt4_32k => "gpt-4-32k",
            Self::TextEmbeddingAda002 => "text-embedding-ada-002",
        }
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token counting capability, selected per active model.
///
/// The exact tokenizer algorithm is an external dependency; implementations
/// only need to be deterministic for a given text.
pub trait TokenCounter: Send + Sync {
    /// Count (or estimate) the tokens in `text`.
    fn count(&self, text: &str) -> usize;
}

/// Character-based token estimator: ~4 characters per token, rounding up.
///
/// Accurate within ~10% for BPE tokenizers on English text, and close
/// enough for budget trimming, where the 20% capacity margin absorbs the
/// estimation error.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicTokenCounter;

impl TokenCounter for HeuristicTokenCounter {
    fn count(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        text.len().div_ceil(4)
    }
}

/// The active model's deployment, capacity, and token counter.
///
/// One profile is selected at startup from configuration and shared
/// immutably by every in-flight request.
#[derive(Clone)]
pub struct ModelProfile {
    /// Which model this profile drives
    pub kind: ModelKind,

    /// The service-side deployment identifier for API calls
    pub deployment: String,

    /// Hard token capacity
    pub max_tokens: usize,

    /// Token counting capability for this model
    pub counter: Arc<dyn TokenCounter>,
}

impl ModelProfile {
    /// Build a profile with the model's fixed capacity and the heuristic
    /// counter.
    pub fn new(kind: ModelKind, deployment: impl Into<String>) -> Self {
        Self {
            kind,
            deployment: deployment.into(),
            max_tokens: kind.max_tokens(),
            counter: Arc::new(HeuristicTokenCounter),
        }
    }

    /// Swap in a different token counter.
    pub fn with_counter(mut self, counter: Arc<dyn TokenCounter>) -> Self {
        self.counter = counter;
        self
    }

    /// The working budget: 80% of capacity, a safety margin below the
    /// service's hard ceiling.
    pub fn scaled_budget(&self) -> usize {
        self.max_tokens * 8 / 10
    }
}

impl std::fmt::Debug for ModelProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelProfile")
            .field("kind", &self.kind)
            .field("deployment", &self.deployment)
            .field("max_tokens", &self.max_tokens)
            .finish_non_exhaustive()
    }
}
