//! Terminal chat client for locally hosted language models.
//!
//! `parley` talks to an [Ollama](https://ollama.com/) server's `/api/chat`
//! endpoint and keeps a rolling conversation. The interesting part is the
//! history policy in [`conversation`]: the full history stays in memory for
//! the life of the process, but once it grows past
//! [`SUMMARY_THRESHOLD`](conversation::SUMMARY_THRESHOLD) turns, everything
//! except the last [`RECENT_WINDOW`](conversation::RECENT_WINDOW) turns is
//! condensed into a single summary message before each request.
//!
//! # Getting started
//!
//! ```ignore
//! use parley::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ModelError> {
//!     let config = ChatConfig::default();
//!     let client = OllamaClient::new(&config.host)?;
//!     let mut conversation = Conversation::new(client, config.model, config.system_prompt);
//!
//!     let reply = conversation.chat("Tell me a joke about borrow checkers.").await?;
//!     println!("{reply}");
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`conversation`] | [`Conversation`](conversation::Conversation) history manager and summarizer |
//! | [`client`] | [`ChatModel`](client::ChatModel) trait and the [`OllamaClient`](client::OllamaClient) HTTP implementation |
//! | [`config`] | [`ChatConfig`](config::ChatConfig) defaults and the built-in system prompt |
//! | [`repl`] | Line-oriented interactive loop |
//! | [`error`] | [`ModelError`](error::ModelError), the single model-call failure type |

pub mod client;
pub mod config;
pub mod conversation;
pub mod error;
pub mod prelude;
pub mod repl;

use serde::{Deserialize, Serialize};

// ── Constants ──────────────────────────────────────────────────────

/// Default Ollama server address.
pub const DEFAULT_HOST: &str = "http://127.0.0.1:11434";

/// Default model for all chat calls.
pub const DEFAULT_MODEL: &str = "llama3.2:3b";

// ── Message types ──────────────────────────────────────────────────

/// Role of a message in the conversation.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    /// Title-cased role name, as used in transcripts (`"User"`, `"Assistant"`).
    pub fn title(self) -> &'static str {
        match self {
            MessageRole::System => "System",
            MessageRole::User => "User",
            MessageRole::Assistant => "Assistant",
        }
    }
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// One turn of the conversation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_constructors() {
        let sys = Message::system("hello");
        assert_eq!(sys.role, MessageRole::System);
        assert_eq!(sys.content, "hello");

        let user = Message::user("world");
        assert_eq!(user.role, MessageRole::User);

        let assist = Message::assistant("hi there");
        assert_eq!(assist.role, MessageRole::Assistant);
        assert_eq!(assist.content, "hi there");
    }

    #[test]
    fn message_serializes_lowercase_role() {
        let json = serde_json::to_value(Message::assistant("ok")).unwrap();
        assert_eq!(json, serde_json::json!({"role": "assistant", "content": "ok"}));
    }

    #[test]
    fn role_title_and_display() {
        assert_eq!(MessageRole::User.title(), "User");
        assert_eq!(MessageRole::Assistant.title(), "Assistant");
        assert_eq!(MessageRole::System.to_string(), "system");
    }
}
