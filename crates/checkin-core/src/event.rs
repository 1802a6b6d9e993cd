//! Inbound events delivered by a chat channel adapter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single raw location submission from a user.
///
/// Unvalidated: the coordinates may be out of range. Validation
/// happens in the session so that malformed values consume an attempt
/// instead of crashing the flow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationReport {
    /// Reported latitude in degrees.
    pub latitude: f64,
    /// Reported longitude in degrees.
    pub longitude: f64,
    /// When the report arrived.
    pub received_at: DateTime<Utc>,
}

impl LocationReport {
    /// Create a report stamped with the current time.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self::at(latitude, longitude, Utc::now())
    }

    /// Create a report with an explicit arrival time.
    pub fn at(latitude: f64, longitude: f64, received_at: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            received_at,
        }
    }
}

/// What kind of conversational step an inbound event represents.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// The entry command that registers the user and opens a session.
    Entry,
    /// The check-in command that starts location verification.
    Checkin,
    /// A live location report.
    Location(LocationReport),
    /// A submission that carried no usable location payload.
    InvalidPayload,
    /// The cancel command.
    Cancel,
}

/// An inbound event from the chat channel, attributed to a user.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent {
    /// Opaque stable user identifier from the channel.
    pub user_id: String,
    /// Display name, if the channel provided one.
    pub display_name: Option<String>,
    /// The conversational step.
    pub kind: EventKind,
}

impl InboundEvent {
    /// An entry command from a user.
    pub fn entry(user_id: impl Into<String>, display_name: Option<String>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name,
            kind: EventKind::Entry,
        }
    }

    /// A check-in command.
    pub fn checkin(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: None,
            kind: EventKind::Checkin,
        }
    }

    /// A location report.
    pub fn location(user_id: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: None,
            kind: EventKind::Location(LocationReport::new(latitude, longitude)),
        }
    }

    /// A submission with no usable location payload.
    pub fn invalid_payload(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: None,
            kind: EventKind::InvalidPayload,
        }
    }

    /// A cancel command.
    pub fn cancel(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: None,
            kind: EventKind::Cancel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_constructor() {
        let event = InboundEvent::entry("user-1", Some("Ana".to_string()));
        assert_eq!(event.user_id, "user-1");
        assert_eq!(event.display_name.as_deref(), Some("Ana"));
        assert_eq!(event.kind, EventKind::Entry);
    }

    #[test]
    fn test_location_constructor() {
        let event = InboundEvent::location("user-1", 19.52, -99.25);
        match event.kind {
            EventKind::Location(report) => {
                assert_eq!(report.latitude, 19.52);
                assert_eq!(report.longitude, -99.25);
            }
            other => panic!("expected location event, got {:?}", other),
        }
    }
}
