//! Error types for the Ragline domain.
//!
//! Uses `thiserror` for ergonomic error definitions. Each bounded context
//! has its own error enum; the top-level `Error` unites them for the
//! request handler, which maps variants to HTTP statuses at the boundary.

use thiserror::Error;

/// The top-level error type for all Ragline operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Required endpoint/credential missing or invalid at startup; fatal.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Empty or invalid conversation history; the caller's fault.
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// Completion or embedding call failed.
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Hybrid search call failed.
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    /// Chat-log write failed. Caught and logged by the handler, never
    /// surfaced to the caller.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Document extraction or upload failed during indexing.
    #[error("Indexer error: {0}")]
    Indexer(#[from] IndexerError),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider returned no content for {0}")]
    EmptyResponse(String),
}

#[derive(Debug, Clone, Error)]
pub enum SearchError {
    #[error("Search API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Search request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unreadable search response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Store API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Store write timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum IndexerError {
    #[error("Extraction API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to read {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("No text extracted from {0}")]
    NoText(String),
}

impl Error {
    /// Whether the caller, rather than an upstream service, caused this
    /// failure. Drives the 4xx/5xx split at the HTTP boundary.
    pub fn is_client_fault(&self) -> bool {
        matches!(self, Self::MalformedRequest(_))
    }
}
