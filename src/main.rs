use std::sync::Arc;

use anyhow::Context;

use ruby_assist::channels::{CliChannel, HttpChannel};
use ruby_assist::config::AssistantConfig;
use ruby_assist::conversation::Conversation;
use ruby_assist::gateway::{HttpResponder, Responder};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (stderr, so the chat on stdout stays clean)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = AssistantConfig::from_env().context("Invalid RUBY_* configuration")?;

    let http_responder =
        HttpResponder::new(&config.gateway).context("Failed to create assistant responder")?;

    eprintln!("💪 Ruby v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Responder: {}", http_responder.endpoint());

    let responder: Arc<dyn Responder> = Arc::new(http_responder);
    let mut conversation = Conversation::new(responder);

    match std::env::args().nth(1).as_deref() {
        Some("serve") => {
            eprintln!(
                "   API: http://0.0.0.0:{}/api/conversation\n",
                config.http_port
            );
            HttpChannel::new(config.http_port, config.reveal_delay)
                .run(conversation)
                .await?;
        }
        None | Some("cli") => {
            eprintln!("   Type a message or pick a number. /quit to exit.\n");
            CliChannel::new(config.reveal_delay)
                .run(&mut conversation)
                .await?;
        }
        Some(other) => anyhow::bail!("Unknown mode {other:?} (expected `cli` or `serve`)"),
    }

    Ok(())
}
