//! Conversation-log persistence.
//!
//! The pipeline appends one record per answered question and never reads
//! them back, so the store interface is a single `insert`. Two backends:
//! an HTTP client for a remote document store, and an in-memory store for
//! tests and local development.

mod doc_store;
mod in_memory;

pub use doc_store::DocStoreClient;
pub use in_memory::InMemoryChatLog;
