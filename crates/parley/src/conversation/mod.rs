//! Conversation history and the context sent with each request.
//!
//! A [`Conversation`] owns the full, append-only history. Only the *view*
//! sent to the model is bounded:
//!
//! - **Short history** (≤ [`SUMMARY_THRESHOLD`] turns): system prompt plus
//!   every turn, verbatim.
//! - **Long history**: system prompt, one summary message covering all but
//!   the last [`RECENT_WINDOW`] turns, then those recent turns verbatim.
//!
//! The summary is requested fresh for every outbound context, so two calls
//! to [`build_context`](Conversation::build_context) with the same history
//! share the same recent slice but may carry different summary text.

pub mod summarizer;

use tracing::{info, warn};

use crate::Message;
use crate::client::ChatModel;
use crate::error::Result;

/// History length above which older turns are summarized.
pub const SUMMARY_THRESHOLD: usize = 20;

/// Number of most recent turns always sent verbatim.
pub const RECENT_WINDOW: usize = 10;

/// Split `history` into `(old, recent)` once it exceeds [`SUMMARY_THRESHOLD`].
///
/// Returns `None` while the history is short enough to send whole.
pub fn split_history(history: &[Message]) -> Option<(&[Message], &[Message])> {
    if history.len() <= SUMMARY_THRESHOLD {
        return None;
    }
    Some(history.split_at(history.len() - RECENT_WINDOW))
}

/// A single chat session against one model.
pub struct Conversation<M> {
    model: M,
    model_name: String,
    system_prompt: Message,
    history: Vec<Message>,
}

impl<M: ChatModel> Conversation<M> {
    pub fn new(model: M, model_name: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        Self {
            model,
            model_name: model_name.into(),
            system_prompt: Message::system(system_prompt),
            history: Vec::new(),
        }
    }

    pub fn add_user_turn(&mut self, text: impl Into<String>) {
        self.history.push(Message::user(text));
    }

    pub fn add_assistant_turn(&mut self, text: impl Into<String>) {
        self.history.push(Message::assistant(text));
    }

    /// Every turn so far, oldest first.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn system_prompt(&self) -> &Message {
        &self.system_prompt
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Assemble the messages for the next request.
    ///
    /// A failed or blank summary is not an error: the context then carries
    /// only the system prompt and the recent turns.
    pub async fn build_context(&self) -> Vec<Message> {
        self.context_for(&self.history).await
    }

    /// Send `text` as the next user turn and return the model's reply.
    ///
    /// History is only touched once the model answers: on error, or if the
    /// returned future is dropped before completion, it is left exactly as
    /// it was.
    pub async fn chat(&mut self, text: impl Into<String>) -> Result<String> {
        let user = Message::user(text);
        let mut turns = Vec::with_capacity(self.history.len() + 1);
        turns.extend_from_slice(&self.history);
        turns.push(user.clone());

        let context = self.context_for(&turns).await;
        let reply = self.model.chat(&self.model_name, &context).await?;

        self.history.push(user);
        self.add_assistant_turn(reply.clone());
        Ok(reply)
    }

    async fn context_for(&self, turns: &[Message]) -> Vec<Message> {
        let Some((old, recent)) = split_history(turns) else {
            let mut context = Vec::with_capacity(turns.len() + 1);
            context.push(self.system_prompt.clone());
            context.extend_from_slice(turns);
            return context;
        };

        let mut context = Vec::with_capacity(recent.len() + 2);
        context.push(self.system_prompt.clone());

        if !old.is_empty() {
            info!(
                old = old.len(),
                recent = recent.len(),
                "Summarizing earlier conversation"
            );
            match summarizer::summarize(&self.model, &self.model_name, old).await {
                Ok(summary) => context.extend(summary),
                Err(e) => warn!("Summarization failed, sending recent turns only: {e}"),
            }
        }

        context.extend_from_slice(recent);
        context
    }
}
