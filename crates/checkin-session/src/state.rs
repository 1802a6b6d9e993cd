//! Conversation phases and the pure location-verdict function.

use checkin_core::Prompt;

/// Where a user's session currently stands.
///
/// Phases only advance: `AwaitingCheckinCommand` to `AwaitingLocation`
/// to `Terminated` (with retries staying in `AwaitingLocation`). A
/// terminated session never resumes; a fresh entry command starts a
/// new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Session opened; waiting for the check-in command.
    AwaitingCheckinCommand,
    /// Check-in started; waiting for a location report.
    AwaitingLocation,
    /// Session over (success, exhaustion, or cancel).
    Terminated,
}

/// The geofence outcome of a single submission.
///
/// `Invalid` covers both missing payloads and coordinates outside the
/// valid Earth range; the two are counted identically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationCheck {
    /// Valid coordinates inside the allowed area.
    Inside { distance_km: f64 },
    /// Valid coordinates outside the allowed area.
    Outside { distance_km: f64 },
    /// No usable location data.
    Invalid,
}

/// What the state machine decided about a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationVerdict {
    /// Inside the geofence: record attendance and terminate.
    Accept,
    /// Failed, attempts remain: stay in `AwaitingLocation` and emit
    /// the carried prompt.
    Retry(Prompt),
    /// Failed and the limit is reached: terminate.
    Exhausted,
}

/// Decide the fate of a location submission.
///
/// Pure and transport-free. `remaining_attempts` is the count left
/// after this failure has been recorded; it is ignored for `Inside`
/// submissions. The two failure kinds share one threshold but carry
/// distinct prompts, because the remediation advice differs.
pub fn judge_location(check: &LocationCheck, remaining_attempts: u32) -> LocationVerdict {
    match check {
        LocationCheck::Inside { .. } => LocationVerdict::Accept,
        LocationCheck::Outside { .. } if remaining_attempts > 0 => {
            LocationVerdict::Retry(Prompt::RejectOutsideGeofence { remaining_attempts })
        }
        LocationCheck::Invalid if remaining_attempts > 0 => {
            LocationVerdict::Retry(Prompt::RejectInvalidPayload { remaining_attempts })
        }
        LocationCheck::Outside { .. } | LocationCheck::Invalid => LocationVerdict::Exhausted,
    }
}
