//! Line-oriented interactive chat loop.
//!
//! Reads one line at a time, hands it to a [`Conversation`], and prints the
//! reply. A failed turn prints the error and the loop keeps going. The loop
//! ends on `quit` / `exit`, end of input, or when the shutdown future
//! resolves (the binary passes Ctrl-C), whether it is waiting for input or
//! for the model.

use std::future::Future;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::client::ChatModel;
use crate::conversation::Conversation;

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The user typed `quit` or `exit`.
    Quit,
    /// Input reached end of file.
    EndOfInput,
    /// The shutdown signal fired.
    Interrupted,
}

/// Whether `line` (already trimmed) asks to leave the chat.
pub fn is_exit_command(line: &str) -> bool {
    line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit")
}

/// Interactive loop over an async reader/writer pair.
pub struct Repl<R, W> {
    input: R,
    output: W,
}

impl<R, W> Repl<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Recover the writer, e.g. to inspect a transcript in tests.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Print the greeting shown before the first prompt.
    pub async fn banner(&mut self, host: &str, model: &str) -> std::io::Result<()> {
        self.write(&format!(
            "Chat session (connected to {host} using {model})\n\
             Type 'quit' or 'exit' to end the conversation.\n\n"
        ))
        .await
    }

    /// Run until the user leaves, input ends, or `shutdown` resolves.
    pub async fn run<M, F>(
        &mut self,
        conversation: &mut Conversation<M>,
        shutdown: F,
    ) -> std::io::Result<ExitReason>
    where
        M: ChatModel,
        F: Future,
    {
        tokio::pin!(shutdown);
        let mut line = String::new();

        loop {
            self.write("> ").await?;

            line.clear();
            let read = tokio::select! {
                read = self.input.read_line(&mut line) => read?,
                _ = &mut shutdown => {
                    self.write("\n\nGoodbye!\n").await?;
                    return Ok(ExitReason::Interrupted);
                }
            };

            if read == 0 {
                self.write("\nGoodbye!\n").await?;
                return Ok(ExitReason::EndOfInput);
            }

            let text = line.trim();
            if text.is_empty() {
                continue;
            }

            if is_exit_command(text) {
                self.write("Goodbye!\n").await?;
                return Ok(ExitReason::Quit);
            }

            let result = tokio::select! {
                result = conversation.chat(text) => result,
                _ = &mut shutdown => {
                    self.write("\n\nGoodbye!\n").await?;
                    return Ok(ExitReason::Interrupted);
                }
            };

            match result {
                Ok(reply) => {
                    self.write(&format!("\nAssistant:\n{reply}\n\n")).await?;
                }
                Err(e) => {
                    debug!("Turn failed: {e:?}");
                    self.write(&format!("Error: {e}\nPlease try again.\n\n"))
                        .await?;
                }
            }
        }
    }

    async fn write(&mut self, text: &str) -> std::io::Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Message;
    use crate::client::ModelFuture;
    use crate::client::testing::ScriptedModel;

    /// Model whose replies never arrive.
    struct Unanswered;

    impl ChatModel for Unanswered {
        fn chat<'a>(&'a self, _model: &'a str, _messages: &'a [Message]) -> ModelFuture<'a> {
            Box::pin(std::future::pending())
        }
    }

    async fn run_script(
        model: ScriptedModel,
        input: &str,
    ) -> (ExitReason, String, Conversation<ScriptedModel>) {
        let mut conv = Conversation::new(model, "test-model", "prompt");
        let mut repl = Repl::new(input.as_bytes(), Vec::new());
        let reason = repl
            .run(&mut conv, std::future::pending::<()>())
            .await
            .unwrap();
        let transcript = String::from_utf8(repl.into_output()).unwrap();
        (reason, transcript, conv)
    }

    #[test]
    fn exit_commands_are_case_insensitive() {
        assert!(is_exit_command("quit"));
        assert!(is_exit_command("EXIT"));
        assert!(is_exit_command("Quit"));
        assert!(!is_exit_command("quitter"));
        assert!(!is_exit_command(""));
    }

    #[tokio::test]
    async fn banner_names_host_and_model() {
        let mut repl = Repl::new(&b""[..], Vec::new());
        repl.banner("http://127.0.0.1:11434", "llama3.2:3b")
            .await
            .unwrap();
        let out = String::from_utf8(repl.into_output()).unwrap();
        assert!(out.contains("connected to http://127.0.0.1:11434 using llama3.2:3b"));
        assert!(out.contains("Type 'quit' or 'exit'"));
    }

    #[tokio::test]
    async fn replies_are_printed_and_quit_stops() {
        let model = ScriptedModel::new().with_reply("Why hello!");
        let (reason, out, conv) = run_script(model, "  hello  \nquit\nnever read\n").await;

        assert_eq!(reason, ExitReason::Quit);
        assert!(out.contains("\nAssistant:\nWhy hello!\n"));
        assert!(out.ends_with("Goodbye!\n"));
        assert_eq!(
            conv.history(),
            &[Message::user("hello"), Message::assistant("Why hello!")]
        );
    }

    #[tokio::test]
    async fn blank_lines_are_skipped() {
        let model = ScriptedModel::new();
        let (reason, _, conv) = run_script(model.clone(), "\n   \n\texit\n").await;
        assert_eq!(reason, ExitReason::Quit);
        assert_eq!(model.call_count(), 0);
        assert!(conv.history().is_empty());
    }

    #[tokio::test]
    async fn errors_are_reported_and_loop_continues() {
        let model = ScriptedModel::new()
            .with_error(500, "model exploded")
            .with_reply("Recovered.");
        let (reason, out, conv) = run_script(model, "first\nsecond\n").await;

        assert_eq!(reason, ExitReason::EndOfInput);
        assert!(out.contains("Error: model server HTTP 500: model exploded\nPlease try again.\n"));
        assert!(out.contains("Assistant:\nRecovered."));
        assert_eq!(
            conv.history(),
            &[Message::user("second"), Message::assistant("Recovered.")]
        );
    }

    #[tokio::test]
    async fn shutdown_interrupts_waiting_loop() {
        let mut conv = Conversation::new(ScriptedModel::new(), "test-model", "prompt");
        let (_writer, reader) = tokio::io::duplex(64);
        let mut repl = Repl::new(tokio::io::BufReader::new(reader), Vec::new());

        let reason = repl
            .run(&mut conv, std::future::ready(()))
            .await
            .unwrap();
        assert_eq!(reason, ExitReason::Interrupted);
        let out = String::from_utf8(repl.into_output()).unwrap();
        assert!(out.ends_with("Goodbye!\n"));
    }

    #[tokio::test]
    async fn shutdown_while_awaiting_reply_keeps_history_clean() {
        let mut conv = Conversation::new(Unanswered, "test-model", "prompt");
        let mut repl = Repl::new(&b"hi\n"[..], Vec::new());

        let shutdown = tokio::time::sleep(std::time::Duration::from_millis(20));
        let reason = repl.run(&mut conv, shutdown).await.unwrap();

        assert_eq!(reason, ExitReason::Interrupted);
        assert!(conv.history().is_empty());
        let out = String::from_utf8(repl.into_output()).unwrap();
        assert!(!out.contains("Assistant:"));
        assert!(out.ends_with("Goodbye!\n"));
    }
}
