//! Grounded answer composition.
//!
//! Seeds the conversation with a pinned system instruction, replays the
//! prior turns, and hands the model the current question together with a
//! Sources section: the index's extractive answer verbatim when one
//! exists, otherwise the ranked passages concatenated as
//! `[Source<id>]: <content>` lines.

use tracing::debug;

use ragline_core::message::{ChatMessage, ConversationTurn};
use ragline_core::model::ModelProfile;
use ragline_core::retrieval::SearchOutcome;
use ragline_core::service::CompletionService;
use ragline_core::Result;

use crate::budget::trim_to_budget;

/// Pinned behavioral instructions: answer only from the Sources section,
/// keep it short, admit ignorance with the fixed sentence, never leak
/// source labels into the visible answer.
const SYSTEM_PROMPT: &str = "\
You are a chatbot that answers the user's questions.
Base your answer strictly on the content listed under \"Sources:\".
Keep your answers concise.
Do not answer with anything that is not stated in the Sources.
When several sources are given, they are labeled [Source1], [Source2], [Source3] and so on; answer based on them.
If you cannot answer the user's question properly from the content under Sources:, reply exactly with \"I'm sorry. I don't know.\"
Never include source references in your answer: do not write \"[Source1]\" or \"Sources:\" in the reply.";

/// Build the Sources block the final user message carries.
///
/// The extractive answer, when present, supersedes passage concatenation.
pub fn build_sources_block(outcome: &SearchOutcome) -> String {
    if let Some(answer) = outcome.extractive_answer() {
        return answer.text.clone();
    }

    outcome
        .passages
        .iter()
        .map(|p| format!("[Source{}]: {}", p.id, p.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the full message list: pinned system prompt, prior turns, then
/// the question-plus-sources user message.
pub fn build_answer_messages(
    prior_turns: &[ConversationTurn],
    question: &str,
    sources: &str,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(prior_turns.len() * 2 + 2);
    messages.push(ChatMessage::system(SYSTEM_PROMPT));

    for turn in prior_turns {
        messages.push(ChatMessage::user(&turn.user));
        messages.push(ChatMessage::assistant(&turn.assistant));
    }

    messages.push(ChatMessage::user(format!(
        "{question}\n\nSources:\n{sources}"
    )));

    messages
}

/// Generate the grounded answer.
pub async fn compose_answer(
    completion: &dyn CompletionService,
    profile: &ModelProfile,
    prior_turns: &[ConversationTurn],
    question: &str,
    outcome: &SearchOutcome,
) -> Result<String> {
    let sources = build_sources_block(outcome);
    let messages = build_answer_messages(prior_turns, question, &sources);
    let messages = trim_to_budget(messages, profile.scaled_budget(), profile.counter.as_ref());

    debug!(
        messages = messages.len(),
        sources_len = sources.len(),
        "Requesting grounded answer"
    );

    let answer = completion.complete(&profile.deployment, &messages).await?;
    Ok(answer)
}
