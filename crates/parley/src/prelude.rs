//! Convenience re-exports for common `parley` types.
//!
//! ```ignore
//! use parley::prelude::*;
//! ```

pub use crate::client::{ChatModel, ModelFuture, OllamaClient};
pub use crate::config::{ChatConfig, DEFAULT_SYSTEM_PROMPT};
pub use crate::conversation::{Conversation, RECENT_WINDOW, SUMMARY_THRESHOLD};
pub use crate::error::ModelError;
pub use crate::repl::{ExitReason, Repl};
pub use crate::{Message, MessageRole};
