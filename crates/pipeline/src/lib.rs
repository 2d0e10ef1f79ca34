//! Query-time conversation and retrieval orchestration.
//!
//! The request-answer flow, stage by stage:
//!
//! 1. Extract the open question from the conversation history
//! 2. Compose a concise search query from the conversation ([`query`])
//!    while embedding the raw question ([`retrieve`]) — these two run
//!    concurrently, both must land before the search
//! 3. Issue one hybrid search: vector neighbors + semantic ranking
//! 4. Ground a completion on the retrieved sources ([`answer`])
//! 5. Persist the question/answer pair, tolerating store failures
//!
//! Every message list sent to the completion service is first trimmed to
//! 80% of the active model's capacity ([`budget`]).

pub mod answer;
pub mod budget;
pub mod handler;
pub mod query;
pub mod retrieve;

pub use handler::ChatPipeline;
pub use retrieve::HybridRetriever;

#[cfg(test)]
pub(crate) mod test_support;
