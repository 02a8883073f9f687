//! HTTP responder: `POST /api/chat` against the assistant backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;

use super::{FALLBACK_REPLY, Responder};
use crate::config::GatewayConfig;
use crate::conversation::{Message, Sender};
use crate::error::{ConfigError, GatewayError};

const CHAT_PATH: &str = "/api/chat";

/// Request body: the conversation so far, without step metadata.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: Vec<WireMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    id: String,
    content: &'a str,
    sender: Sender,
}

impl<'a> From<&'a Message> for WireMessage<'a> {
    fn from(msg: &'a Message) -> Self {
        Self {
            id: msg.id.to_string(),
            content: &msg.content,
            sender: msg.sender,
        }
    }
}

/// Calls the assistant backend over HTTP.
pub struct HttpResponder {
    client: reqwest::Client,
    endpoint: Url,
    token: Option<SecretString>,
    timeout: Duration,
}

impl HttpResponder {
    pub fn new(config: &GatewayConfig) -> Result<Self, ConfigError> {
        let endpoint = config
            .base_url
            .join(CHAT_PATH)
            .map_err(|e| ConfigError::InvalidValue {
                key: "RUBY_GATEWAY_URL".to_string(),
                message: e.to_string(),
            })?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::InvalidValue {
                key: "RUBY_GATEWAY_TIMEOUT_SECS".to_string(),
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        tracing::info!(endpoint = %endpoint, "Using HTTP assistant responder");

        Ok(Self {
            client,
            endpoint,
            token: config.token.clone(),
            timeout: config.timeout,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Make one request and classify every way it can go wrong.
    pub async fn request(&self, history: &[Message]) -> Result<String, GatewayError> {
        let body = ChatRequest {
            messages: history.iter().map(WireMessage::from).collect(),
        };

        let mut req = self.client.post(self.endpoint.clone()).json(&body);
        if let Some(ref token) = self.token {
            req = req.bearer_auth(token.expose_secret());
        }

        let resp = req.send().await.map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let data: Value = resp
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        match data.get("message").and_then(Value::as_str) {
            Some(reply) if !reply.is_empty() => Ok(reply.to_string()),
            _ => Err(GatewayError::EmptyReply),
        }
    }

    fn transport_error(&self, e: reqwest::Error) -> GatewayError {
        if e.is_timeout() {
            GatewayError::Timeout {
                url: self.endpoint.to_string(),
                timeout: self.timeout,
            }
        } else {
            GatewayError::Transport {
                url: self.endpoint.to_string(),
                reason: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl Responder for HttpResponder {
    fn name(&self) -> &str {
        "http"
    }

    async fn respond(&self, history: &[Message]) -> String {
        match self.request(history).await {
            Ok(reply) => {
                tracing::debug!(chars = reply.len(), "Assistant responder replied");
                reply
            }
            Err(e) => {
                tracing::warn!(
                    responder = self.name(),
                    error = %e,
                    "Assistant responder failed, using fallback reply"
                );
                FALLBACK_REPLY.to_string()
            }
        }
    }
}
