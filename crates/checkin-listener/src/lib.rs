//! Listener glue between the Telegram channel and the check-in engine.
//!
//! This crate maps incoming Telegram updates onto session events,
//! renders session prompts back into Telegram messages, and runs the
//! long-polling loop that drives everything.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use attendance_store::MemoryStore;
//! use checkin_core::{CircularGeofence, Coordinates};
//! use checkin_listener::{EventProcessor, TelegramSink};
//! use checkin_session::{SessionConfig, SessionEngine};
//! use telegram_channel::{BotConfig, TelegramClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BotConfig::from_env()?;
//! let client = TelegramClient::connect(config).await?;
//!
//! let center = Coordinates::new(19.523731621451685, -99.2536655776822)?;
//! let geofence = Arc::new(CircularGeofence::new(center, 5.0)?);
//! let store = Arc::new(MemoryStore::new());
//!
//! let engine = SessionEngine::new(
//!     geofence,
//!     store,
//!     TelegramSink::new(client.clone()),
//!     SessionConfig::default(),
//! );
//!
//! let processor = EventProcessor::new(client, engine);
//! processor.run_until_stopped().await?;
//! # Ok(())
//! # }
//! ```

pub mod event_map;
pub mod processor;
pub mod render;

pub use event_map::to_inbound_event;
pub use processor::{EventProcessor, ListenerError, ProcessResult, TelegramSink};
pub use render::{render, RenderedPrompt};

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
