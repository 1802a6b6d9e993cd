//! Long-poll update stream.

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::stream::{self, Stream};
use tracing::{debug, info, warn};

use crate::client::TelegramClient;
use crate::error::ChannelError;
use crate::types::Update;

/// Pause after a failed poll before surfacing the error, so transient
/// API failures do not turn into a hot loop.
const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(2);

struct PollState {
    client: TelegramClient,
    offset: Option<i64>,
    pending: VecDeque<Update>,
}

/// A stream of incoming Telegram updates.
///
/// Driven by long polling: each exhausted batch triggers another
/// getUpdates call with the acknowledgement offset advanced past the
/// last delivered update. The stream never ends; poll errors are
/// yielded as items and polling resumes afterwards.
pub struct UpdateStream {
    inner: Pin<Box<dyn Stream<Item = Result<Update, ChannelError>> + Send>>,
}

impl UpdateStream {
    /// Create an update stream from a TelegramClient.
    pub fn new(client: &TelegramClient) -> Self {
        info!("Starting long poll against {}", client.config().api_base);

        let state = PollState {
            client: client.clone(),
            offset: None,
            pending: VecDeque::new(),
        };

        let inner = stream::unfold(state, |mut state| async move {
            loop {
                if let Some(update) = state.pending.pop_front() {
                    return Some((Ok(update), state));
                }

                match state.client.get_updates(state.offset).await {
                    Ok(updates) => {
                        if !updates.is_empty() {
                            debug!("Received {} update(s)", updates.len());
                        }
                        for update in updates {
                            state.offset = Some(update.update_id + 1);
                            state.pending.push_back(update);
                        }
                    }
                    Err(e) => {
                        warn!("Poll failed: {}", e);
                        tokio::time::sleep(POLL_ERROR_BACKOFF).await;
                        return Some((Err(e), state));
                    }
                }
            }
        });

        Self {
            inner: Box::pin(inner),
        }
    }
}

impl Stream for UpdateStream {
    type Item = Result<Update, ChannelError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

/// Create an update stream from a TelegramClient.
pub fn subscribe(client: &TelegramClient) -> UpdateStream {
    UpdateStream::new(client)
}
