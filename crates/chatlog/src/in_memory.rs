//! In-memory chat log for tests and local development.

use async_trait::async_trait;
use std::sync::Mutex;

use ragline_core::error::StoreError;
use ragline_core::message::ChatLogRecord;
use ragline_core::service::ChatLogStore;

/// Keeps records in a Vec behind a Mutex, assigning UUID identifiers.
///
/// Can be told to fail every write, for exercising the pipeline's
/// log-failure tolerance.
#[derive(Default)]
pub struct InMemoryChatLog {
    records: Mutex<Vec<(String, ChatLogRecord)>>,
    fail_writes: bool,
}

impl InMemoryChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every insert fails.
    pub fn failing() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            fail_writes: true,
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of stored records, insertion order.
    pub fn records(&self) -> Vec<ChatLogRecord> {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|(_, r)| r.clone())
            .collect()
    }
}

#[async_trait]
impl ChatLogStore for InMemoryChatLog {
    async fn insert(&self, record: &ChatLogRecord) -> Result<String, StoreError> {
        if self.fail_writes {
            return Err(StoreError::ApiError {
                status_code: 503,
                message: "store unavailable".into(),
            });
        }

        let id = uuid::Uuid::new_v4().to_string();
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((id.clone(), record.clone()));
        Ok(id)
    }
}
