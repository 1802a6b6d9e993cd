//! Outbound prompts for the channel adapter to render.

use serde::{Deserialize, Serialize};

/// What interaction aid should accompany a rendered prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Affordance {
    /// Offer a "share live location" button.
    RequestLocation,
    /// Remove any previously offered buttons.
    RemoveKeyboard,
    /// Plain text, no affordance.
    None,
}

/// An outbound decision from the check-in state machine.
///
/// The session emits these; a channel adapter turns them into
/// user-facing text plus the matching [`Affordance`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Prompt {
    /// Greeting after the entry command: points the user at the
    /// check-in command.
    Welcome,
    /// Redirect: the user has no live session and should issue the
    /// entry command first.
    RequestEntryCommand,
    /// Ask the user to share their live location.
    PromptForLocation,
    /// The check-in was accepted and recorded.
    ConfirmSuccess,
    /// A valid location fell outside the allowed area; retry allowed.
    RejectOutsideGeofence { remaining_attempts: u32 },
    /// The submission carried no usable location data; retry allowed.
    RejectInvalidPayload { remaining_attempts: u32 },
    /// The failure limit was reached; the session is over.
    ExhaustedAttempts,
    /// The user cancelled; the session is over.
    Farewell,
}

impl Prompt {
    /// The affordance a renderer should attach to this prompt.
    pub fn affordance(&self) -> Affordance {
        match self {
            Self::PromptForLocation
            | Self::RejectOutsideGeofence { .. }
            | Self::RejectInvalidPayload { .. } => Affordance::RequestLocation,
            Self::ConfirmSuccess | Self::ExhaustedAttempts | Self::Farewell => {
                Affordance::RemoveKeyboard
            }
            Self::Welcome | Self::RequestEntryCommand => Affordance::None,
        }
    }

    /// Whether this prompt ends the session.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::ConfirmSuccess | Self::ExhaustedAttempts | Self::Farewell
        )
    }
}
