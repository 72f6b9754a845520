use anyhow::Context;
use futures::StreamExt;

use moltbook_skill::channels::{Channel, CliChannel, IncomingMessage, OutgoingResponse};
use moltbook_skill::config::SkillConfig;
use moltbook_skill::dispatch::SkillHandler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so replies on stdout stay clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = SkillConfig::from_env();
    tracing::info!(
        scripts_dir = %config.scripts_dir.display(),
        interpreter = %config.interpreter,
        "Moltbook skill v{}",
        env!("CARGO_PKG_VERSION")
    );

    let handler = SkillHandler::from_config(&config);

    // One-shot: the arguments are the message
    let args: Vec<String> = std::env::args().skip(1).collect();
    if !args.is_empty() {
        let message = IncomingMessage::new(args.join(" ")).with_channel("args");
        let reply = handler.handle(&message).await;
        println!("{}", reply);
        return Ok(());
    }

    eprintln!("   Type a Moltbook command and press Enter. /quit to exit.\n");

    let channel = CliChannel::new();
    let mut messages = channel.start().await.context("Failed to start CLI channel")?;

    while let Some(message) = messages.next().await {
        let reply = handler.handle(&message).await;
        channel
            .respond(&message, OutgoingResponse::text(reply.into_string()))
            .await
            .with_context(|| format!("Failed to respond on {}", channel.name()))?;
    }

    Ok(())
}
