//! Chat messages and back-end responses.
//!
//! These mirror the OpenAI-style chat completion shape that most gateways
//! speak: a list of role-tagged messages in, a single assistant response
//! with token usage out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions injected by the host application.
    System,
    /// The end user.
    User,
    /// A prior model turn.
    Assistant,
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message author.
    pub role: Role,
    /// The content of the message.
    pub content: String,
}

impl Message {
    /// Create a message with an explicit role.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Token usage reported by the back-end for one completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt.
    pub prompt_tokens: i64,
    /// Number of tokens in the generated completion.
    pub completion_tokens: i64,
    /// Total tokens used (prompt + completion).
    pub total_tokens: i64,
}

/// A completed response from a generative back-end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Back-end-assigned identifier for this completion.
    pub id: String,
    /// The generated text content.
    pub content: String,
    /// The model that produced the response.
    pub model: String,
    /// Token accounting for this request.
    pub usage: TokenUsage,
    /// Why generation stopped (e.g. "stop", "length").
    pub finish_reason: String,
    /// When the response was produced.
    pub created_at: DateTime<Utc>,
    /// End-to-end latency of the back-end call in milliseconds.
    pub latency_ms: f64,
}
