//! Chat session configuration with sensible defaults.
//!
//! [`ChatConfig`] carries the three things a session needs: where the model
//! server lives, which model to ask, and the system prompt that is pinned to
//! the front of every request. The binary fills it from CLI flags and the
//! `OLLAMA_HOST` / `OLLAMA_MODEL` environment variables.

use crate::{DEFAULT_HOST, DEFAULT_MODEL};

/// The system prompt used when none is supplied.
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are a helpful and friendly assistant with a great sense of humor. Your goal is to provide \
accurate, thoughtful responses while keeping things light and engaging. Always:
- Be clear and concise
- Don't be afraid to be a bit witty or use casual language when appropriate
- Admit when you don't know something
- Ask clarifying questions if needed
- Maintain a respectful and approachable tone
- Help people while making the conversation enjoyable";

/// Configuration for a chat session.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Model server address. Default: `"http://127.0.0.1:11434"`.
    pub host: String,
    /// Model identifier. Default: `"llama3.2:3b"`.
    pub model: String,
    /// System prompt sent first in every request.
    pub system_prompt: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl ChatConfig {
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }
}
