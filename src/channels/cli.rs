//! CLI channel: stdin/stdout REPL for local use.

use async_trait::async_trait;
use futures::stream;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::channels::{Channel, IncomingMessage, MessageStream, OutgoingResponse};
use crate::error::ChannelError;

/// Typing this line ends the session.
pub const QUIT_COMMAND: &str = "/quit";

/// Reads one message per stdin line and prints replies to stdout.
pub struct CliChannel;

impl CliChannel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CliChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Channel for CliChannel {
    fn name(&self) -> &str {
        "cli"
    }

    async fn start(&self) -> Result<MessageStream, ChannelError> {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();

        tokio::spawn(async move {
            let stdin = tokio::io::stdin();
            let reader = BufReader::new(stdin);
            let mut lines = reader.lines();

            eprint!("> ");

            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        let line = line.trim().to_string();
                        if line.is_empty() {
                            eprint!("> ");
                            continue;
                        }
                        if line.eq_ignore_ascii_case(QUIT_COMMAND) {
                            break;
                        }
                        let msg = IncomingMessage::new(line).with_channel("cli");
                        if tx.send(msg).is_err() {
                            break;
                        }
                    }
                    Ok(None) => break, // EOF
                    Err(e) => {
                        tracing::error!("Error reading stdin: {}", e);
                        break;
                    }
                }
            }
        });

        let stream = stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|msg| (msg, rx))
        });

        Ok(Box::pin(stream))
    }

    async fn respond(
        &self,
        _msg: &IncomingMessage,
        response: OutgoingResponse,
    ) -> Result<(), ChannelError> {
        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(format!("\n{}\n\n", response.content).as_bytes())
            .await?;
        stdout.flush().await?;
        eprint!("> ");
        Ok(())
    }
}
