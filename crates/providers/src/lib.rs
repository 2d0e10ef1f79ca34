//! HTTP clients for the LLM completion and embedding services.
//!
//! One client speaks the deployment-scoped dialect
//! (`/openai/deployments/{deployment}/...?api-version=...` with an
//! `api-key` header) and implements both `CompletionService` and
//! `EmbeddingService` from `ragline-core`.

mod azure_openai;

pub use azure_openai::AzureOpenAiClient;
