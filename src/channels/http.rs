//! HTTP channel: serves the conversation API on a TCP port.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::Mutex;

use crate::conversation::{ApiState, Conversation, conversation_routes};
use crate::error::{ChannelError, Result};

/// Serves one conversation over REST.
pub struct HttpChannel {
    addr: SocketAddr,
    reveal_delay: Duration,
}

impl HttpChannel {
    pub fn new(port: u16, reveal_delay: Duration) -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], port)),
            reveal_delay,
        }
    }

    /// Bind and serve until the server stops.
    pub async fn run(&self, conversation: Conversation) -> Result<()> {
        let listener = TcpListener::bind(self.addr)
            .await
            .map_err(|e| ChannelError::StartupFailed {
                name: "http".to_string(),
                reason: format!("Failed to bind {}: {e}", self.addr),
            })?;

        let state = ApiState {
            conversation: Arc::new(Mutex::new(conversation)),
            reveal_delay: self.reveal_delay,
        };

        tracing::info!(addr = %self.addr, "Conversation API listening");
        axum::serve(listener, conversation_routes(state))
            .await
            .map_err(ChannelError::from)?;
        Ok(())
    }
}
