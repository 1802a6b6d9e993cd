//! Rendering prompts into Telegram messages.

use checkin_core::{Affordance, Prompt};
use telegram_channel::ReplyMarkup;

/// Label on the location-request keyboard button.
const LOCATION_BUTTON: &str = "Share your location";

/// A prompt rendered for Telegram: text plus optional reply markup.
#[derive(Debug)]
pub struct RenderedPrompt {
    /// User-facing message text.
    pub text: String,
    /// Keyboard to attach, or keyboard removal, or nothing.
    pub markup: Option<ReplyMarkup>,
}

/// Render a session prompt into Telegram copy and markup.
///
/// The outside-geofence and invalid-data rejections stay distinct on
/// purpose: the remediation advice differs even though the retry
/// bookkeeping behind them is the same.
pub fn render(prompt: &Prompt) -> RenderedPrompt {
    let text = match prompt {
        Prompt::Welcome => {
            "Welcome to attendance verification.\n\
             To verify your attendance, please send /checkin."
                .to_string()
        }
        Prompt::RequestEntryCommand => {
            "Send /start to begin attendance verification.".to_string()
        }
        Prompt::PromptForLocation => {
            "Please share your *current* location using the button below \
             to verify your attendance."
                .to_string()
        }
        Prompt::ConfirmSuccess => "Your attendance has been recorded. Thank you!".to_string(),
        Prompt::RejectOutsideGeofence { remaining_attempts } => format!(
            "❌ Location verification failed!\n\n\
             Your current location is outside the allowed area. Please make \
             sure you are at the correct place and try again.\n\n\
             Attempts remaining: {}\n\
             Tap the button below to share your location again:",
            remaining_attempts
        ),
        Prompt::RejectInvalidPayload { remaining_attempts } => format!(
            "❌ Invalid location data received!\n\n\
             Please use the button below to share your location using \
             Telegram's location sharing feature.\n\n\
             Attempts remaining: {}",
            remaining_attempts
        ),
        Prompt::ExhaustedAttempts => {
            "❌ Check-in failed!\n\n\
             You have exceeded the maximum number of attempts. Please try \
             again later or contact support if you believe this is an error."
                .to_string()
        }
        Prompt::Farewell => "Bye! Hope to see you around again.".to_string(),
    };

    let markup = match prompt.affordance() {
        Affordance::RequestLocation => Some(ReplyMarkup::location_request(LOCATION_BUTTON)),
        Affordance::RemoveKeyboard => Some(ReplyMarkup::remove()),
        Affordance::None => None,
    };

    RenderedPrompt { text, markup }
}
