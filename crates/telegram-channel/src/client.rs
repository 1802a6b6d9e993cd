//! Telegram Bot API HTTP client.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::BotConfig;
use crate::error::ChannelError;
use crate::types::{
    ApiResponse, GetUpdatesParams, Message, ReplyMarkup, SendMessageParams, TelegramUser, Update,
};

/// Extra slack on top of the long-poll timeout before the HTTP layer
/// gives up.
const HTTP_TIMEOUT_SLACK: Duration = Duration::from_secs(10);

/// Client for the Telegram Bot API.
#[derive(Debug, Clone)]
pub struct TelegramClient {
    http: Client,
    config: BotConfig,
}

impl TelegramClient {
    /// Connect to the Bot API and verify the token with getMe.
    pub async fn connect(config: BotConfig) -> Result<Self, ChannelError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.poll_timeout_secs) + HTTP_TIMEOUT_SLACK)
            .build()
            .map_err(ChannelError::Http)?;

        let client = Self { http, config };

        let me = client.get_me().await?;
        info!(
            "Connected to Telegram as {} (id {})",
            me.username.as_deref().unwrap_or("<unnamed>"),
            me.id
        );

        Ok(client)
    }

    /// Get the client configuration.
    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    /// Identify the bot account behind the token.
    pub async fn get_me(&self) -> Result<TelegramUser, ChannelError> {
        self.call("getMe", &serde_json::json!({})).await
    }

    /// Fetch pending updates, long polling until some arrive or the
    /// configured timeout elapses.
    ///
    /// Pass the last seen `update_id + 1` as the offset to acknowledge
    /// earlier updates.
    pub async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>, ChannelError> {
        let params = GetUpdatesParams {
            offset,
            timeout: self.config.poll_timeout_secs,
        };
        self.call("getUpdates", &params).await
    }

    /// Send a plain text message.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<Message, ChannelError> {
        self.call("sendMessage", &SendMessageParams::text(chat_id, text))
            .await
    }

    /// Send a text message with a keyboard or keyboard removal.
    pub async fn send_with_markup(
        &self,
        chat_id: i64,
        text: &str,
        markup: ReplyMarkup,
    ) -> Result<Message, ChannelError> {
        self.call(
            "sendMessage",
            &SendMessageParams::with_markup(chat_id, text, markup),
        )
        .await
    }

    /// Call a Bot API method and unwrap the response envelope.
    async fn call<P: Serialize, T: DeserializeOwned>(
        &self,
        method: &str,
        params: &P,
    ) -> Result<T, ChannelError> {
        let url = self.config.method_url(method);
        debug!("Calling {}", method);

        let response: ApiResponse<T> = self
            .http
            .post(&url)
            .json(params)
            .send()
            .await?
            .json()
            .await?;

        if !response.ok {
            return Err(ChannelError::Api {
                description: response
                    .description
                    .unwrap_or_else(|| format!("{} failed without description", method)),
            });
        }

        response.result.ok_or_else(|| ChannelError::Api {
            description: format!("{} returned ok without a result", method),
        })
    }
}
