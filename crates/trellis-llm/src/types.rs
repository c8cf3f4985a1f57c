use serde::{Deserialize, Serialize};

/// Role of a message participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instruction
    System,
    /// User message
    User,
    /// Assistant response
    Assistant,
}

/// Message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message author
    pub role: Role,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// Convenience constructor for a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Convenience constructor for a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// Chat completion request sent to a provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model identifier
    pub model: String,
    /// Conversation so far
    pub messages: Vec<ChatMessage>,
    /// Whether the caller wants a streamed response
    #[serde(default)]
    pub stream: bool,
}

/// Token usage reported by a provider
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens in the prompt
    pub prompt_tokens: u32,
    /// Tokens in the completion
    pub completion_tokens: u32,
    /// Sum of prompt and completion tokens
    pub total_tokens: u32,
}

/// Non-streaming chat completion response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Provider-assigned response id
    pub id: String,
    /// Model that produced the response
    pub model: String,
    /// Assistant message content
    pub content: String,
    /// Why generation stopped (e.g. "stop", "length")
    pub finish_reason: String,
    /// Token usage; absent when the provider does not report it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

/// One chunk of a streaming response
///
/// The final chunk of a well-formed stream carries a finish reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChunk {
    /// Provider-assigned stream id
    pub id: String,
    /// Model that produced the chunk
    pub model: String,
    /// Incremental content delta
    pub delta: String,
    /// Set on the terminal chunk only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}
