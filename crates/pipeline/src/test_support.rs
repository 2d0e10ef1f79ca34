//! Scripted collaborator fakes shared by the pipeline tests.
//!
//! Each fake answers from a fixed script and records what it was asked,
//! so tests can assert on the exact requests the pipeline composed.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use ragline_core::error::{ProviderError, SearchError, StoreError};
use ragline_core::message::{ChatLogRecord, ChatMessage};
use ragline_core::retrieval::{HybridQuery, IndexDocument, SearchOutcome};
use ragline_core::service::{ChatLogStore, CompletionService, EmbeddingService, SearchIndex};

/// Completion fake that returns scripted replies in order.
///
/// Panics when more calls are made than replies were scripted.
pub struct ScriptedCompletion {
    replies: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<(String, Vec<ChatMessage>)>>,
    fail: bool,
}

impl ScriptedCompletion {
    pub fn replying<'a>(replies: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().map(String::from).collect()),
            requests: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    /// A completion service whose every call fails.
    pub fn failing() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Every `(deployment, messages)` pair this fake received, in order.
    pub fn requests(&self) -> Vec<(String, Vec<ChatMessage>)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionService for ScriptedCompletion {
    async fn complete(
        &self,
        deployment: &str,
        messages: &[ChatMessage],
    ) -> Result<String, ProviderError> {
        if self.fail {
            return Err(ProviderError::Network("connection refused".into()));
        }

        let mut requests = self.requests.lock().unwrap();
        requests.push((deployment.to_string(), messages.to_vec()));
        let call = requests.len();

        match self.replies.lock().unwrap().pop_front() {
            Some(reply) => Ok(reply),
            None => panic!("ScriptedCompletion: no reply scripted for call #{call}"),
        }
    }
}

/// Embedding fake returning one fixed vector.
pub struct FixedEmbedding {
    vector: Vec<f32>,
    inputs: Mutex<Vec<String>>,
    fail: bool,
}

impl FixedEmbedding {
    pub fn new(vector: Vec<f32>) -> Self {
        Self {
            vector,
            inputs: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            vector: Vec::new(),
            inputs: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// The most recent text this fake was asked to embed.
    pub fn last_input(&self) -> Option<String> {
        self.inputs.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl EmbeddingService for FixedEmbedding {
    async fn embed(&self, _deployment: &str, text: &str) -> Result<Vec<f32>, ProviderError> {
        if self.fail {
            return Err(ProviderError::Timeout("deadline exceeded".into()));
        }
        self.inputs.lock().unwrap().push(text.to_string());
        Ok(self.vector.clone())
    }
}

/// Search fake returning one fixed outcome and recording queries.
pub struct ScriptedSearch {
    outcome: SearchOutcome,
    queries: Mutex<Vec<HybridQuery>>,
    fail: bool,
}

impl ScriptedSearch {
    pub fn returning(outcome: SearchOutcome) -> Self {
        Self {
            outcome,
            queries: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            outcome: SearchOutcome::default(),
            queries: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn queries(&self) -> Vec<HybridQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchIndex for ScriptedSearch {
    async fn hybrid_search(&self, query: &HybridQuery) -> Result<SearchOutcome, SearchError> {
        if self.fail {
            return Err(SearchError::Network("connection refused".into()));
        }
        self.queries.lock().unwrap().push(query.clone());
        Ok(self.outcome.clone())
    }

    async fn upload(&self, _documents: &[IndexDocument]) -> Result<(), SearchError> {
        if self.fail {
            return Err(SearchError::Network("connection refused".into()));
        }
        Ok(())
    }
}

/// Chat-log fake that records inserts, optionally failing them all.
#[derive(Default)]
pub struct RecordingStore {
    pub records: Mutex<Vec<ChatLogRecord>>,
    fail: bool,
}

impl RecordingStore {
    pub fn failing() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            fail: true,
        }
    }
}

#[async_trait]
impl ChatLogStore for RecordingStore {
    async fn insert(&self, record: &ChatLogRecord) -> Result<String, StoreError> {
        if self.fail {
            return Err(StoreError::Network("connection refused".into()));
        }
        self.records.lock().unwrap().push(record.clone());
        Ok("log-1".into())
    }
}
