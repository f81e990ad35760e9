//! Model collaborator: the [`ChatModel`] trait and its Ollama implementation.

use std::future::Future;
use std::pin::Pin;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::Message;
use crate::error::{ModelError, Result};

/// Boxed future returned by [`ChatModel::chat`].
pub type ModelFuture<'a> = Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;

/// Anything that can turn a message list into a reply.
///
/// From the conversation's point of view a call is atomic: it either yields
/// the full reply text or a [`ModelError`].
///
/// Uses a boxed future so that the trait is dyn-compatible (object-safe).
///
/// # Example
///
/// ```ignore
/// struct Echo;
///
/// impl ChatModel for Echo {
///     fn chat<'a>(&'a self, _model: &'a str, messages: &'a [Message]) -> ModelFuture<'a> {
///         Box::pin(async move {
///             Ok(messages.last().map(|m| m.content.clone()).unwrap_or_default())
///         })
///     }
/// }
/// ```
pub trait ChatModel: Send + Sync {
    /// Send `messages` to `model` and return the reply text.
    fn chat<'a>(&'a self, model: &'a str, messages: &'a [Message]) -> ModelFuture<'a>;
}

impl<T: ChatModel + ?Sized> ChatModel for Box<T> {
    fn chat<'a>(&'a self, model: &'a str, messages: &'a [Message]) -> ModelFuture<'a> {
        (**self).chat(model, messages)
    }
}

// ── Wire types ─────────────────────────────────────────────────────

/// Request body for `POST /api/chat`.
#[derive(Serialize, Debug)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [Message],
    pub stream: bool,
}

/// Response body for a non-streaming `/api/chat` call.
#[derive(Deserialize, Debug)]
struct RawChatResponse {
    message: Option<RawResponseMessage>,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Deserialize, Debug)]
struct RawResponseMessage {
    #[serde(default)]
    content: String,
}

#[derive(Deserialize, Debug)]
struct ApiErrorResponse {
    error: String,
}

// ── Client ─────────────────────────────────────────────────────────

/// Async HTTP client for an Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
}

impl OllamaClient {
    /// Create a client for the server at `host`.
    ///
    /// `host` may omit the scheme (`127.0.0.1:11434`), the same way
    /// `OLLAMA_HOST` is commonly written.
    pub fn new(host: &str) -> Result<Self> {
        let base_url = normalize_host(host);
        let client = reqwest::Client::builder()
            .user_agent(concat!("parley/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| ModelError::Transport {
                url: base_url.clone(),
                source,
            })?;
        Ok(Self { client, base_url })
    }

    /// The normalized server address.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }

    async fn send(&self, model: &str, messages: &[Message]) -> Result<String> {
        let url = self.chat_url();
        let body = ChatRequest {
            model,
            messages,
            stream: false,
        };
        debug!("LLM request: model={model}, messages={}", messages.len());
        trace!(
            "Request payload size: {} bytes",
            serde_json::to_string(&body).map_or(0, |s| s.len())
        );

        let start = Instant::now();

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|source| ModelError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|source| ModelError::Transport {
            url: url.clone(),
            source,
        })?;

        debug!(
            "LLM response: HTTP {} in {:.1}s ({} bytes)",
            status,
            start.elapsed().as_secs_f64(),
            text.len()
        );

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorResponse>(&text)
                .map(|e| e.error)
                .unwrap_or(text);
            return Err(ModelError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: RawChatResponse = serde_json::from_str(&text)?;

        if let (Some(prompt), Some(completion)) = (parsed.prompt_eval_count, parsed.eval_count) {
            debug!("Token usage: prompt={prompt}, completion={completion}");
        }

        Ok(parsed.message.map(|m| m.content).unwrap_or_default())
    }
}

impl ChatModel for OllamaClient {
    fn chat<'a>(&'a self, model: &'a str, messages: &'a [Message]) -> ModelFuture<'a> {
        Box::pin(self.send(model, messages))
    }
}

/// Prefix `http://` when no scheme is given and drop trailing slashes.
pub fn normalize_host(host: &str) -> String {
    let host = host.trim();
    let with_scheme = if host.contains("://") {
        host.to_string()
    } else {
        format!("http://{host}")
    };
    with_scheme.trim_end_matches('/').to_string()
}
