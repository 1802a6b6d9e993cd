//! Telegram Bot API wire types.
//!
//! Only the subset the attendance bot uses: updates carrying text or
//! location messages, and sendMessage with reply keyboards.

use serde::{Deserialize, Serialize};

/// Envelope around every Bot API response.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the call succeeded.
    pub ok: bool,
    /// Payload on success.
    #[serde(default = "Option::default")]
    pub result: Option<T>,
    /// Human-readable error on failure.
    #[serde(default)]
    pub description: Option<String>,
}

/// One incoming update from getUpdates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Update {
    /// Monotonically increasing update identifier.
    pub update_id: i64,
    /// The message, if this update carries one.
    #[serde(default)]
    pub message: Option<Message>,
}

/// A message inside an update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Message identifier within the chat.
    pub message_id: i64,
    /// Sender, absent for channel posts.
    #[serde(default)]
    pub from: Option<TelegramUser>,
    /// The chat the message belongs to.
    pub chat: Chat,
    /// Text content, if any.
    #[serde(default)]
    pub text: Option<String>,
    /// Shared location, if any.
    #[serde(default)]
    pub location: Option<Location>,
}

/// A Telegram user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramUser {
    /// Stable numeric identifier.
    pub id: i64,
    /// Whether this user is a bot.
    #[serde(default)]
    pub is_bot: bool,
    /// First name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Username (without the @).
    #[serde(default)]
    pub username: Option<String>,
}

impl TelegramUser {
    /// Best available display name: username, else first name.
    pub fn display_name(&self) -> Option<String> {
        self.username
            .clone()
            .or_else(|| self.first_name.clone())
    }
}

/// A chat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    /// Stable numeric identifier.
    pub id: i64,
}

/// A shared location.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Live-location period in seconds, if this is a live location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_period: Option<i64>,
}

/// Parameters for getUpdates.
#[derive(Debug, Serialize)]
pub struct GetUpdatesParams {
    /// Identifier of the first update to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    /// Long-poll timeout in seconds.
    pub timeout: u64,
}

/// Parameters for sendMessage.
#[derive(Debug, Serialize)]
pub struct SendMessageParams {
    /// Target chat.
    pub chat_id: i64,
    /// Message text.
    pub text: String,
    /// Optional keyboard to show or remove.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<ReplyMarkup>,
}

impl SendMessageParams {
    /// Plain text message.
    pub fn text(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            reply_markup: None,
        }
    }

    /// Text message with a keyboard or keyboard removal attached.
    pub fn with_markup(chat_id: i64, text: impl Into<String>, markup: ReplyMarkup) -> Self {
        Self {
            chat_id,
            text: text.into(),
            reply_markup: Some(markup),
        }
    }
}

/// Reply markup: a custom keyboard or its removal.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ReplyMarkup {
    /// Show a one-time custom keyboard.
    Keyboard(ReplyKeyboardMarkup),
    /// Remove the custom keyboard.
    Remove(ReplyKeyboardRemove),
}

impl ReplyMarkup {
    /// A one-time keyboard with a single location-request button.
    pub fn location_request(button_text: impl Into<String>) -> Self {
        Self::Keyboard(ReplyKeyboardMarkup {
            keyboard: vec![vec![KeyboardButton {
                text: button_text.into(),
                request_location: true,
            }]],
            one_time_keyboard: true,
            resize_keyboard: true,
        })
    }

    /// Remove any previously shown keyboard.
    pub fn remove() -> Self {
        Self::Remove(ReplyKeyboardRemove {
            remove_keyboard: true,
        })
    }
}

/// A custom reply keyboard.
#[derive(Debug, Clone, Serialize)]
pub struct ReplyKeyboardMarkup {
    /// Button rows.
    pub keyboard: Vec<Vec<KeyboardButton>>,
    /// Hide the keyboard after one use.
    pub one_time_keyboard: bool,
    /// Fit the keyboard to its buttons.
    pub resize_keyboard: bool,
}

/// One keyboard button.
#[derive(Debug, Clone, Serialize)]
pub struct KeyboardButton {
    /// Button label.
    pub text: String,
    /// Ask the client to share the user's location when pressed.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub request_location: bool,
}

/// Keyboard removal marker.
#[derive(Debug, Clone, Serialize)]
pub struct ReplyKeyboardRemove {
    /// Always true.
    pub remove_keyboard: bool,
}
