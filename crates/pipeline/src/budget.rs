//! Token budget trimming.
//!
//! Completion requests must fit the active model's capacity. When a
//! message list runs over, the oldest messages are evicted first — FIFO
//! from index 1, because index 0 is the pinned head (the system
//! instruction in the answer flow) and is never removed.
//!
//! When even aggressive eviction cannot reach the limit, trimming settles
//! for the minimal sequence (pinned head plus the most recent message)
//! and lets the request proceed: a degraded-but-available outcome, not an
//! error.

use ragline_core::message::ChatMessage;
use ragline_core::model::TokenCounter;

/// Evict oldest non-pinned messages until the total token count fits
/// `limit`.
///
/// Deterministic: the result depends only on input order and per-message
/// token counts.
pub fn trim_to_budget(
    messages: Vec<ChatMessage>,
    limit: usize,
    counter: &dyn TokenCounter,
) -> Vec<ChatMessage> {
    let mut messages = messages;
    let mut counts: Vec<usize> = messages
        .iter()
        .map(|m| counter.count(&m.content))
        .collect();
    let mut total: usize = counts.iter().sum();

    while total > limit && messages.len() > 2 {
        messages.remove(1);
        total -= counts.remove(1);
    }

    messages
}
