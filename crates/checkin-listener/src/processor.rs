//! Event processor that connects telegram-channel to the session engine.

use async_trait::async_trait;
use checkin_core::Prompt;
use checkin_session::{ReplySink, SessionEngine, SessionError};
use futures::StreamExt;
use telegram_channel::{ChannelError, TelegramClient, Update};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::event_map::to_inbound_event;
use crate::render::render;

/// Errors that can occur while running the listener.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Error from the Telegram channel.
    #[error("channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Error from the session engine.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// The update stream ended unexpectedly.
    #[error("update stream ended")]
    StreamEnded,
}

/// Result of processing a single update.
#[derive(Debug)]
pub enum ProcessResult {
    /// Update was mapped to an event and handled.
    Handled { user_id: String },
    /// Update was skipped (no message, no sender, or from a bot).
    Skipped { reason: String },
    /// Error occurred during processing.
    Error(ListenerError),
}

/// Delivers session prompts over Telegram.
pub struct TelegramSink {
    client: TelegramClient,
}

impl TelegramSink {
    /// Create a sink over an existing client.
    pub fn new(client: TelegramClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ReplySink for TelegramSink {
    async fn send(&self, user_id: &str, prompt: &Prompt) -> Result<(), SessionError> {
        let chat_id: i64 = user_id
            .parse()
            .map_err(|_| SessionError::Delivery(format!("invalid chat id: {}", user_id)))?;

        let rendered = render(prompt);
        let result = match rendered.markup {
            Some(markup) => {
                self.client
                    .send_with_markup(chat_id, &rendered.text, markup)
                    .await
            }
            None => self.client.send_message(chat_id, &rendered.text).await,
        };

        result
            .map(|_| ())
            .map_err(|e| SessionError::Delivery(e.to_string()))
    }
}

/// A processor that receives Telegram updates and drives the check-in
/// engine with them.
pub struct EventProcessor<S: ReplySink> {
    client: TelegramClient,
    engine: SessionEngine<S>,
}

impl<S: ReplySink> EventProcessor<S> {
    /// Create a new event processor.
    pub fn new(client: TelegramClient, engine: SessionEngine<S>) -> Self {
        Self { client, engine }
    }

    /// Get a reference to the engine.
    pub fn engine(&self) -> &SessionEngine<S> {
        &self.engine
    }

    /// Get a reference to the client.
    pub fn client(&self) -> &TelegramClient {
        &self.client
    }

    /// Process a single update and return the result.
    pub async fn process_update(&self, update: &Update) -> ProcessResult {
        let Some(event) = to_inbound_event(update) else {
            return ProcessResult::Skipped {
                reason: "no actionable message".to_string(),
            };
        };

        let user_id = event.user_id.clone();
        debug!("Dispatching {:?} event for {}", event.kind, user_id);

        match self.engine.handle(event).await {
            Ok(()) => ProcessResult::Handled { user_id },
            Err(e) => {
                error!("Session error for {}: {}", user_id, e);
                ProcessResult::Error(ListenerError::Session(e))
            }
        }
    }

    /// Run the processor, handling updates until the stream ends.
    ///
    /// This method consumes self and runs indefinitely. Individual
    /// update errors are logged and processing continues.
    pub async fn run(self) -> Result<(), ListenerError> {
        info!("Starting check-in event processor");

        let mut stream = telegram_channel::subscribe(&self.client);

        while let Some(result) = stream.next().await {
            match result {
                Ok(update) => match self.process_update(&update).await {
                    ProcessResult::Handled { user_id } => {
                        debug!("Handled update for {}", user_id);
                    }
                    ProcessResult::Skipped { reason } => {
                        debug!("Skipped update: {}", reason);
                    }
                    ProcessResult::Error(e) => {
                        warn!("Error processing update: {}", e);
                    }
                },
                Err(e) => {
                    error!("Stream error: {}", e);
                    // Continue on poll errors - they are usually transient
                }
            }
        }

        warn!("Update stream ended");
        Err(ListenerError::StreamEnded)
    }

    /// Run the processor with graceful shutdown support.
    ///
    /// Runs until the provided shutdown signal completes, the update
    /// stream ends, or an unrecoverable error occurs.
    pub async fn run_with_shutdown<F>(self, shutdown_signal: F) -> Result<(), ListenerError>
    where
        F: std::future::Future<Output = ()> + Send,
    {
        info!("Starting check-in event processor (graceful shutdown enabled)");

        let mut stream = telegram_channel::subscribe(&self.client);

        tokio::pin!(shutdown_signal);

        loop {
            tokio::select! {
                biased;

                () = &mut shutdown_signal => {
                    info!("Shutdown signal received, stopping event processor");
                    return Ok(());
                }

                result = stream.next() => {
                    match result {
                        Some(Ok(update)) => {
                            match self.process_update(&update).await {
                                ProcessResult::Handled { user_id } => {
                                    debug!("Handled update for {}", user_id);
                                }
                                ProcessResult::Skipped { reason } => {
                                    debug!("Skipped update: {}", reason);
                                }
                                ProcessResult::Error(e) => {
                                    warn!("Error processing update: {}", e);
                                }
                            }
                        }
                        Some(Err(e)) => {
                            error!("Stream error: {}", e);
                        }
                        None => {
                            warn!("Update stream ended");
                            return Err(ListenerError::StreamEnded);
                        }
                    }
                }
            }
        }
    }

    /// Run the processor until Ctrl+C is pressed.
    pub async fn run_until_stopped(self) -> Result<(), ListenerError> {
        let shutdown = async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to listen for Ctrl+C");
        };
        self.run_with_shutdown(shutdown).await
    }
}
