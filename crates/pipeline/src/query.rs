//! Search-query composition.
//!
//! The user's question is often anaphoric ("how long can I take it?"),
//! so the raw text makes a poor keyword query. This stage shows the model
//! the conversation so far and asks it to emit nothing but a concise
//! search query, which then drives the keyword/semantic half of the
//! hybrid search.

use tracing::debug;

use ragline_core::error::ProviderError;
use ragline_core::message::{ChatMessage, ConversationTurn};
use ragline_core::model::ModelProfile;
use ragline_core::service::CompletionService;
use ragline_core::Result;

use crate::budget::trim_to_budget;

/// Instruction wrapped around the current question. The model must reply
/// with the search query alone.
const QUERY_PROMPT_TEMPLATE: &str = "\
Based on the conversation history so far and the user question below, generate a search query.
Do not include anything other than the search query in your reply.
For example, for the question \"How long can I take parental leave?\", reply with something like \"parental leave duration\".

question: {question}";

/// Build the message list for query composition: each prior turn as a
/// user/assistant pair in chronological order, then the templated
/// question.
pub fn build_query_messages(
    prior_turns: &[ConversationTurn],
    question: &str,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(prior_turns.len() * 2 + 1);

    for turn in prior_turns {
        messages.push(ChatMessage::user(&turn.user));
        messages.push(ChatMessage::assistant(&turn.assistant));
    }

    messages.push(ChatMessage::user(
        QUERY_PROMPT_TEMPLATE.replace("{question}", question),
    ));

    messages
}

/// Ask the completion service for a concise search query.
///
/// The model's output is trusted as-is apart from a whitespace trim; an
/// effectively empty reply is an upstream fault, propagated to the
/// caller.
pub async fn compose_search_query(
    completion: &dyn CompletionService,
    profile: &ModelProfile,
    prior_turns: &[ConversationTurn],
    question: &str,
) -> Result<String> {
    let messages = build_query_messages(prior_turns, question);
    let messages = trim_to_budget(messages, profile.scaled_budget(), profile.counter.as_ref());

    let reply = completion.complete(&profile.deployment, &messages).await?;
    let query = reply.trim();

    if query.is_empty() {
        return Err(ProviderError::EmptyResponse(profile.deployment.clone()).into());
    }

    debug!(query = %query, "Search query composed");
    Ok(query.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedCompletion;
    use ragline_core::model::ModelKind;

    fn profile() -> ModelProfile {
        ModelProfile::new(ModelKind::Gpt35Turbo, "chat-deploy")
    }

    #[test]
    fn message_count_is_two_per_turn_plus_one() {
        for prior_len in 0..4 {
            let prior: Vec<ConversationTurn> = (0..prior_len)
                .map(|i| ConversationTurn::new(format!("q{i}"), format!("a{i}")))
                .collect();
            let messages = build_query_messages(&prior, "current question");
            assert_eq!(messages.len(), 2 * prior_len + 1);
        }
    }

    #[test]
    fn first_turn_with_no_history_builds_one_message() {
        // A greeting with no prior turns: only the templated question
        let messages = build_query_messages(&[], "こんにちは");
        assert_eq!(messages.len(), 1);
        assert!(messages[0].content.contains("こんにちは"));
        assert!(messages[0].content.contains("question:"));
    }

    #[test]
    fn prior_turns_alternate_in_order() {
        let prior = vec![
            ConversationTurn::new("first q", "first a"),
            ConversationTurn::new("second q", "second a"),
        ];
        let messages = build_query_messages(&prior, "now");

        assert_eq!(messages[0].content, "first q");
        assert_eq!(messages[1].content, "first a");
        assert_eq!(messages[2].content, "second q");
        assert_eq!(messages[3].content, "second a");
        assert!(messages[4].content.ends_with("question: now"));
    }

    #[tokio::test]
    async fn returns_model_output_trimmed() {
        let completion = ScriptedCompletion::replying(["  parental leave duration\n"]);
        let query = compose_search_query(&completion, &profile(), &[], "how long?")
            .await
            .unwrap();
        assert_eq!(query, "parental leave duration");
    }

    #[tokio::test]
    async fn whitespace_only_reply_is_an_upstream_fault() {
        let completion = ScriptedCompletion::replying(["   \n"]);
        let err = compose_search_query(&completion, &profile(), &[], "q")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ragline_core::Error::Provider(ProviderError::EmptyResponse(_))
        ));
    }

    #[tokio::test]
    async fn completion_failure_propagates() {
        let completion = ScriptedCompletion::failing();
        let err = compose_search_query(&completion, &profile(), &[], "q")
            .await
            .unwrap_err();
        assert!(matches!(err, ragline_core::Error::Provider(_)));
    }

    #[tokio::test]
    async fn sends_deployment_from_profile() {
        let completion = ScriptedCompletion::replying(["query"]);
        compose_search_query(&completion, &profile(), &[], "q")
            .await
            .unwrap();

        let requests = completion.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, "chat-deploy");
        assert_eq!(requests[0].1.len(), 1);
    }
}
