//! Error types for session handling.

use attendance_store::StoreError;
use thiserror::Error;

/// Errors that can occur while handling a session event.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The attendance store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A prompt could not be delivered to the channel.
    ///
    /// Session state is already updated when this is raised, so the
    /// exchange can be resumed by re-prompting.
    #[error("prompt delivery failed: {0}")]
    Delivery(String),
}
