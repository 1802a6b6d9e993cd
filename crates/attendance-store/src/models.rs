//! Store models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user known to the channel, created on first inbound event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Opaque stable identifier from the channel.
    pub id: String,
    /// Advisory display name; may be absent.
    pub display_name: Option<String>,
    /// When the user was first seen.
    pub first_seen_at: DateTime<Utc>,
}

/// An immutable attendance fact: one successful check-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AttendanceRecord {
    /// The user who checked in.
    pub user_id: String,
    /// Display name snapshot at submission time.
    pub display_name: Option<String>,
    /// When the check-in was accepted.
    pub timestamp: DateTime<Utc>,
    /// Accepted latitude in degrees.
    pub latitude: f64,
    /// Accepted longitude in degrees.
    pub longitude: f64,
}

impl AttendanceRecord {
    /// Create a record stamped with the current time.
    pub fn new(
        user_id: impl Into<String>,
        display_name: Option<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            display_name,
            timestamp: Utc::now(),
            latitude,
            longitude,
        }
    }
}
