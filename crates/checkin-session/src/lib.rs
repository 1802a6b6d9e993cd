//! Check-in state machine for location-verified attendance.
//!
//! This crate contains the part of the system with real decision
//! logic: the per-user conversation state, the attempt-limited retry
//! policy, and the geofence validation branch. It defines:
//!
//! - [`SessionEngine`] - the orchestrator driving one state machine per user
//! - [`Phase`] / [`judge_location`] - the explicit states and the pure transition logic
//! - [`AttemptTracker`] - per-user failure counters with a configurable limit
//! - [`ReplySink`] - the outbound seam a channel adapter implements
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use attendance_store::MemoryStore;
//! use checkin_core::{CircularGeofence, Coordinates, InboundEvent};
//! use checkin_session::{LoggingSink, SessionConfig, SessionEngine};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let center = Coordinates::new(19.523731621451685, -99.2536655776822)?;
//!     let geofence = Arc::new(CircularGeofence::new(center, 5.0)?);
//!     let store = Arc::new(MemoryStore::new());
//!
//!     let engine = SessionEngine::new(geofence, store, LoggingSink, SessionConfig::default());
//!
//!     engine.handle(InboundEvent::entry("user-1", Some("Ana".into()))).await?;
//!     engine.handle(InboundEvent::checkin("user-1")).await?;
//!     engine.handle(InboundEvent::location("user-1", 19.52, -99.25)).await?;
//!     Ok(())
//! }
//! ```

mod engine;
mod error;
mod sink;
mod state;
mod tracker;

pub use engine::{SessionConfig, SessionEngine};
pub use error::SessionError;
pub use sink::{LoggingSink, NoOpSink, ReplySink};
pub use state::{judge_location, LocationCheck, LocationVerdict, Phase};
pub use tracker::{AttemptTracker, DEFAULT_MAX_ATTEMPTS};
