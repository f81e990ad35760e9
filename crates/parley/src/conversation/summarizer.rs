//! One-shot summarization of older conversation turns.
//!
//! Every summary is built from scratch out of the turns it replaces; there is
//! no running summary carried between requests. The model is asked for a
//! short prose recap, and the reply is wrapped in a system message that sits
//! right after the system prompt.

use tracing::debug;

use crate::Message;
use crate::client::ChatModel;
use crate::error::Result;

/// Instruction placed before the transcript.
const SUMMARIZATION_PROMPT: &str =
    "Summarize the following conversation concisely in 2-3 sentences, preserving key points and context:";

/// Prefix that marks a synthetic summary message.
pub const SUMMARY_PREFIX: &str = "[Earlier conversation summary]: ";

/// Build the single user prompt asking for a summary of `turns`.
///
/// Each turn becomes a `Role: content` line.
pub fn build_summary_prompt(turns: &[Message]) -> String {
    let transcript = turns
        .iter()
        .map(|m| format!("{}: {}", m.role.title(), m.content))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{SUMMARIZATION_PROMPT}\n\n{transcript}\n\nSummary:")
}

/// Wrap a model reply, unchanged, as the summary system message. Blank
/// replies yield `None`.
pub fn summary_turn(reply: &str) -> Option<Message> {
    if reply.trim().is_empty() {
        return None;
    }
    Some(Message::system(format!("{SUMMARY_PREFIX}{reply}")))
}

/// Ask `model` to summarize `turns`.
///
/// No request is made for an empty span.
pub async fn summarize<M: ChatModel + ?Sized>(
    model: &M,
    model_name: &str,
    turns: &[Message],
) -> Result<Option<Message>> {
    if turns.is_empty() {
        return Ok(None);
    }

    let request = [Message::user(build_summary_prompt(turns))];
    let reply = model.chat(model_name, &request).await?;
    debug!("Summary reply: {} chars", reply.len());
    Ok(summary_turn(&reply))
}
