//! Core types for location-verified attendance check-ins.
//!
//! This crate provides the shared, transport-free building blocks for
//! the attendance bot:
//!
//! - [`Coordinates`] / [`Geofence`] / [`CircularGeofence`] - geofence validation
//! - [`InboundEvent`] / [`EventKind`] - events arriving from a chat channel
//! - [`Prompt`] / [`Affordance`] - outbound decisions for the channel adapter to render
//!
//! # Example
//!
//! ```rust
//! use checkin_core::{CircularGeofence, Coordinates, Geofence};
//!
//! # fn main() -> Result<(), checkin_core::GeofenceError> {
//! let center = Coordinates::new(19.523731621451685, -99.2536655776822)?;
//! let fence = CircularGeofence::new(center, 5.0)?;
//!
//! let report = Coordinates::new(19.52, -99.25)?;
//! let decision = fence.check(report);
//! println!("inside: {} ({:.2} km)", decision.inside, decision.distance_km);
//! # Ok(())
//! # }
//! ```

mod event;
mod geofence;
mod prompt;

pub use event::{EventKind, InboundEvent, LocationReport};
pub use geofence::{
    haversine_km, CircularGeofence, Coordinates, Geofence, GeofenceDecision, GeofenceError,
};
pub use prompt::{Affordance, Prompt};

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
