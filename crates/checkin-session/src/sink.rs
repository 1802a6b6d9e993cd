//! Reply sink trait and implementations.

use async_trait::async_trait;
use checkin_core::Prompt;

use crate::error::SessionError;

/// Trait for delivering prompts back to a user.
///
/// Abstracted to support different transports (Telegram, tests, etc.)
#[async_trait]
pub trait ReplySink: Send + Sync {
    /// Deliver one prompt to a user.
    ///
    /// # Arguments
    /// * `user_id` - Channel identifier of the recipient
    /// * `prompt` - The prompt to render and send
    async fn send(&self, user_id: &str, prompt: &Prompt) -> Result<(), SessionError>;
}

/// A no-op sink for testing that discards all prompts.
#[derive(Debug, Clone, Default)]
pub struct NoOpSink;

#[async_trait]
impl ReplySink for NoOpSink {
    async fn send(&self, _user_id: &str, _prompt: &Prompt) -> Result<(), SessionError> {
        Ok(())
    }
}

/// A logging sink for debugging that logs every prompt.
#[derive(Debug, Clone, Default)]
pub struct LoggingSink;

#[async_trait]
impl ReplySink for LoggingSink {
    async fn send(&self, user_id: &str, prompt: &Prompt) -> Result<(), SessionError> {
        tracing::info!("Prompt for {}: {:?}", user_id, prompt);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_sink() {
        let sink = NoOpSink;
        sink.send("user-1", &Prompt::PromptForLocation).await.unwrap();
    }

    #[tokio::test]
    async fn test_logging_sink() {
        let sink = LoggingSink;
        sink.send("user-1", &Prompt::ConfirmSuccess).await.unwrap();
        sink.send("user-1", &Prompt::Farewell).await.unwrap();
    }
}
