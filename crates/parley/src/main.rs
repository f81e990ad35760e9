//! Chat with a local Ollama model from the terminal.
//!
//! Reads the server address from `OLLAMA_HOST` and the model from
//! `OLLAMA_MODEL` unless overridden by flags. Log output goes to stderr and
//! is controlled by `RUST_LOG`.
//!
//! # Examples
//!
//! ```sh
//! # Defaults: http://127.0.0.1:11434, llama3.2:3b
//! parley
//!
//! # Another server and model
//! OLLAMA_HOST=10.0.0.2:11434 parley --model qwen3:14b
//!
//! # See summarization decisions
//! RUST_LOG=parley=info parley
//! ```

use std::process;

use clap::Parser;
use parley::prelude::*;
use parley::{DEFAULT_HOST, DEFAULT_MODEL};
use tokio::io::BufReader;
use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Chat with a local Ollama model from the terminal.
#[derive(Parser)]
#[command(name = "parley", version)]
struct Cli {
    /// Ollama server address
    #[arg(long, env = "OLLAMA_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Model to chat with
    #[arg(long, env = "OLLAMA_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Replace the built-in system prompt
    #[arg(long)]
    system_prompt: Option<String>,
}

impl Cli {
    fn into_config(self) -> ChatConfig {
        let config = ChatConfig::default()
            .with_host(self.host)
            .with_model(self.model);
        match self.system_prompt {
            Some(prompt) => config.with_system_prompt(prompt),
            None => config,
        }
    }
}

/// Greet the user and run the interactive loop until it ends.
async fn chat_session(client: OllamaClient, config: ChatConfig) -> std::io::Result<ExitReason> {
    let host = client.base_url().to_string();
    let mut conversation = Conversation::new(client, config.model, config.system_prompt);
    let mut repl = Repl::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout());

    repl.banner(&host, conversation.model_name()).await?;
    repl.run(&mut conversation, tokio::signal::ctrl_c()).await
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parley=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Cli::parse().into_config();

    let client = match OllamaClient::new(&config.host) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: failed to create model client: {e}");
            process::exit(1);
        }
    };
    debug!("Using model server at {}", client.base_url());

    match chat_session(client, config).await {
        Ok(reason) => {
            debug!("Chat ended: {reason:?}");
            // The stdin reader thread may still be blocked on a read that
            // cannot be cancelled; exiting here keeps Ctrl-C from hanging.
            process::exit(0);
        }
        Err(e) => {
            eprintln!("Error: terminal I/O failed: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "parley",
            "--host",
            "10.0.0.2:11434",
            "--model",
            "qwen3:14b",
            "--system-prompt",
            "Be terse.",
        ])
        .unwrap();
        let config = cli.into_config();
        assert_eq!(config.host, "10.0.0.2:11434");
        assert_eq!(config.model, "qwen3:14b");
        assert_eq!(config.system_prompt, "Be terse.");
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
