//! Message and conversation domain types.
//!
//! These are the value objects that flow through the answering pipeline:
//! the client sends a conversation history → the handler extracts the open
//! question → composers build fresh `ChatMessage` lists per request →
//! the completed question/answer pair is persisted as a `ChatLogRecord`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions (pinned, never trimmed)
    System,
    /// The end user
    User,
    /// The AI assistant
    Assistant,
}

/// A single role-tagged message sent to the completion service.
///
/// Built fresh per request from the conversation history plus synthesized
/// prompts; never persisted directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,
}

impl ChatMessage {
    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// One completed exchange in the conversation history sent by the client.
///
/// Histories are chronological, oldest first. The last element is the
/// "open" turn: its `user` field is the current question and its
/// `assistant` field is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// What the user asked
    pub user: String,

    /// What the assistant answered (empty on the open turn)
    #[serde(default)]
    pub assistant: String,
}

impl ConversationTurn {
    /// A closed turn with both sides filled in.
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
        }
    }

    /// An open turn carrying only the current question.
    pub fn open(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            assistant: String::new(),
        }
    }
}

/// A question/answer pair persisted after each completed request.
///
/// The store assigns the record identifier on insert; this pipeline never
/// reads records back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatLogRecord {
    /// Caller identity (fixed to "guest" for unauthenticated requests)
    pub user: String,

    /// The question as the user asked it
    pub input: String,

    /// The generated answer
    pub response: String,

    /// When the exchange completed
    pub created_at: DateTime<Utc>,
}

impl ChatLogRecord {
    pub fn new(
        user: impl Into<String>,
        input: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Self {
            user: user.into(),
            input: input.into(),
            response: response.into(),
            created_at: Utc::now(),
        }
    }
}
