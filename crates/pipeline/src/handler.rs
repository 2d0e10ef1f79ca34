//! Request orchestration.
//!
//! `ChatPipeline` is built once at startup and shared by every in-flight
//! request; it holds nothing mutable, only `Arc`s to the collaborator
//! clients and the immutable model profile. Each request runs the stages
//! strictly in dependency order — the only concurrency is between query
//! composition and question embedding, which are independent and both
//! prerequisites of the search.

use std::sync::Arc;
use tracing::{debug, info, warn};

use ragline_core::message::{ChatLogRecord, ConversationTurn};
use ragline_core::model::ModelProfile;
use ragline_core::service::{ChatLogStore, CompletionService};
use ragline_core::{Error, Result};

use crate::answer::compose_answer;
use crate::query::compose_search_query;
use crate::retrieve::HybridRetriever;

/// Identity recorded for unauthenticated callers.
const LOG_USER_ID: &str = "guest";

/// The end-to-end question answering pipeline.
pub struct ChatPipeline {
    completion: Arc<dyn CompletionService>,
    retriever: HybridRetriever,
    store: Arc<dyn ChatLogStore>,
    profile: ModelProfile,
}

impl ChatPipeline {
    pub fn new(
        completion: Arc<dyn CompletionService>,
        retriever: HybridRetriever,
        store: Arc<dyn ChatLogStore>,
        profile: ModelProfile,
    ) -> Self {
        Self {
            completion,
            retriever,
            store,
            profile,
        }
    }

    /// Answer the open question at the end of `history`.
    ///
    /// The last turn's `user` field is the current question; its
    /// `assistant` field is ignored. The first failing stage
    /// short-circuits the request — except the chat-log write, which is
    /// tolerated because the answer already exists.
    pub async fn answer(&self, history: &[ConversationTurn]) -> Result<String> {
        let Some((open_turn, prior_turns)) = history.split_last() else {
            return Err(Error::MalformedRequest(
                "conversation history is empty".into(),
            ));
        };

        let question = open_turn.user.trim();
        if question.is_empty() {
            return Err(Error::MalformedRequest(
                "last turn carries no question".into(),
            ));
        }

        info!(
            model = %self.profile.kind,
            prior_turns = prior_turns.len(),
            "Answering question"
        );

        // Query composition and question embedding are independent; both
        // must land before the hybrid search.
        let (composed_query, vector) = tokio::try_join!(
            compose_search_query(self.completion.as_ref(), &self.profile, prior_turns, question),
            self.retriever.embed_question(question),
        )?;

        let outcome = self.retriever.search(vector, &composed_query).await?;

        let answer = compose_answer(
            self.completion.as_ref(),
            &self.profile,
            prior_turns,
            question,
            &outcome,
        )
        .await?;

        self.log_exchange(question, &answer).await;

        info!(answer_len = answer.len(), "Answer generated");
        Ok(answer)
    }

    /// Persist the question/answer pair. The answer is already computed,
    /// so a failed write is logged and swallowed, never surfaced to the
    /// caller.
    async fn log_exchange(&self, question: &str, answer: &str) {
        let record = ChatLogRecord::new(LOG_USER_ID, question, answer);
        match self.store.insert(&record).await {
            Ok(id) => debug!(id = %id, "Chat log written"),
            Err(e) => warn!(error = %e, "Chat log write failed, returning answer anyway"),
        }
    }
}
