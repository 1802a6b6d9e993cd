//! Telegram Bot API client library.
//!
//! This crate provides a thin client for the pieces of the Bot API
//! the attendance bot needs:
//!
//! - Sending messages, with location-request keyboards
//! - Receiving updates via long polling
//! - Token verification at connect time
//!
//! # Example
//!
//! ```no_run
//! use telegram_channel::{BotConfig, TelegramClient};
//!
//! # async fn example() -> Result<(), telegram_channel::ChannelError> {
//! let config = BotConfig::from_env()?;
//! let client = TelegramClient::connect(config).await?;
//!
//! client.send_message(99, "Hello!").await?;
//!
//! // Subscribe to incoming updates
//! use futures::StreamExt;
//! let mut updates = telegram_channel::subscribe(&client);
//! while let Some(result) = updates.next().await {
//!     match result {
//!         Ok(update) => println!("Update {}", update.update_id),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod types;
pub mod updates;

pub use client::TelegramClient;
pub use config::BotConfig;
pub use error::ChannelError;
pub use types::{
    Chat, KeyboardButton, Location, Message, ReplyKeyboardMarkup, ReplyKeyboardRemove,
    ReplyMarkup, SendMessageParams, TelegramUser, Update,
};
pub use updates::{subscribe, UpdateStream};

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
