//! Configuration types for telegram-channel.

use crate::error::ChannelError;

/// Default Bot API host.
const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Default long-poll timeout in seconds.
const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;

/// Configuration for connecting to the Telegram Bot API.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Base URL of the Bot API (e.g., "https://api.telegram.org").
    pub api_base: String,
    /// Bot token issued by BotFather. Opaque secret.
    pub token: String,
    /// Long-poll timeout for getUpdates, in seconds.
    pub poll_timeout_secs: u64,
}

impl BotConfig {
    /// Create a configuration with the given bot token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token: token.into(),
            poll_timeout_secs: DEFAULT_POLL_TIMEOUT_SECS,
        }
    }

    /// Create a configuration with a custom API base URL (useful for
    /// local Bot API servers and tests).
    pub fn with_api_base(token: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            ..Self::new(token)
        }
    }

    /// Load configuration from the environment.
    ///
    /// Reads `TELEGRAM_BOT_TOKEN` (required) and `TELEGRAM_API_BASE`
    /// (optional).
    pub fn from_env() -> Result<Self, ChannelError> {
        let token = std::env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| ChannelError::Config("TELEGRAM_BOT_TOKEN is not set".to_string()))?;

        Ok(match std::env::var("TELEGRAM_API_BASE") {
            Ok(base) => Self::with_api_base(token, base),
            Err(_) => Self::new(token),
        })
    }

    /// Get the endpoint URL for a Bot API method.
    pub fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }
}
