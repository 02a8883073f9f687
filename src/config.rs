//! Configuration types.

use std::time::Duration;

use reqwest::Url;
use secrecy::SecretString;

use crate::error::ConfigError;

const DEFAULT_GATEWAY_URL: &str = "http://127.0.0.1:3000";
const DEFAULT_GATEWAY_TIMEOUT_SECS: u64 = 30;
const DEFAULT_REVEAL_DELAY_MS: u64 = 800;
const DEFAULT_HTTP_PORT: u16 = 8080;

/// Where the assistant responder lives and how to call it.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL; requests go to `{base_url}/api/chat`.
    pub base_url: Url,
    /// Optional bearer token sent with every request.
    pub token: Option<SecretString>,
    /// Per-request timeout. A timeout counts as a transport failure.
    pub timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_GATEWAY_URL).expect("default gateway URL is valid"),
            token: None,
            timeout: Duration::from_secs(DEFAULT_GATEWAY_TIMEOUT_SECS),
        }
    }
}

/// Assistant configuration.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub gateway: GatewayConfig,
    /// Cosmetic pause before a scripted reply is shown.
    pub reveal_delay: Duration,
    /// Port for the HTTP API (`serve` mode).
    pub http_port: u16,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig::default(),
            reveal_delay: Duration::from_millis(DEFAULT_REVEAL_DELAY_MS),
            http_port: DEFAULT_HTTP_PORT,
        }
    }
}

impl AssistantConfig {
    /// Load configuration from `RUBY_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = match lookup("RUBY_GATEWAY_URL") {
            Some(raw) => Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidValue {
                key: "RUBY_GATEWAY_URL".to_string(),
                message: e.to_string(),
            })?,
            None => GatewayConfig::default().base_url,
        };

        let token = lookup("RUBY_GATEWAY_TOKEN")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .map(SecretString::from);

        let timeout_secs = parse_or(&lookup, "RUBY_GATEWAY_TIMEOUT_SECS", DEFAULT_GATEWAY_TIMEOUT_SECS)?;
        let reveal_ms = parse_or(&lookup, "RUBY_REVEAL_DELAY_MS", DEFAULT_REVEAL_DELAY_MS)?;
        let http_port = parse_or(&lookup, "RUBY_HTTP_PORT", DEFAULT_HTTP_PORT)?;

        Ok(Self {
            gateway: GatewayConfig {
                base_url,
                token,
                timeout: Duration::from_secs(timeout_secs),
            },
            reveal_delay: Duration::from_millis(reveal_ms),
            http_port,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        }),
        None => Ok(default),
    }
}
