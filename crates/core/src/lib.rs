//! # Ragline Core
//!
//! Domain types, traits, and error definitions for the Ragline
//! retrieval-augmented chatbot backend. This crate has **zero framework
//! dependencies** — it defines the domain model that all other crates
//! implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator (completion service, embedding service,
//! search index, chat-log store, text extractor) is defined as a trait
//! here. HTTP implementations live in their respective crates. This
//! enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod message;
pub mod model;
pub mod retrieval;
pub mod service;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use message::{ChatLogRecord, ChatMessage, ConversationTurn, Role};
pub use model::{HeuristicTokenCounter, ModelKind, ModelProfile, TokenCounter};
pub use retrieval::{ExtractiveAnswer, HybridQuery, IndexDocument, RetrievedPassage, SearchOutcome};
pub use service::{ChatLogStore, CompletionService, EmbeddingService, SearchIndex, TextExtractor};
