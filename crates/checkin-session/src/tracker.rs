//! Per-user failed-attempt counters.

use std::collections::HashMap;

use tokio::sync::RwLock;

/// Default failure limit per check-in session.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Thread-safe per-user failure counters.
///
/// Counters start at 0 whenever a session (re)starts and never exceed
/// the configured limit; hitting the limit hands back 0 remaining and
/// resets the counter so a future session starts clean. Geofence
/// rejections and malformed submissions count equally.
#[derive(Debug)]
pub struct AttemptTracker {
    max_attempts: u32,
    counts: RwLock<HashMap<String, u32>>,
}

impl Default for AttemptTracker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

impl AttemptTracker {
    /// Create a tracker with the given failure limit.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            counts: RwLock::new(HashMap::new()),
        }
    }

    /// The configured failure limit.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Record one failed submission and return the attempts remaining.
    ///
    /// When this reaches 0 the caller must terminate the session; the
    /// counter is already reset for the user's next session.
    pub async fn record_failure(&self, user_id: &str) -> u32 {
        let mut counts = self.counts.write().await;
        let count = counts.entry(user_id.to_string()).or_insert(0);
        *count = (*count + 1).min(self.max_attempts);
        let remaining = self.max_attempts - *count;
        if remaining == 0 {
            *count = 0;
        }
        remaining
    }

    /// Reset the counter after a successful check-in.
    pub async fn record_success(&self, user_id: &str) {
        self.reset(user_id).await;
    }

    /// Explicitly reset the counter, used when a new check-in command
    /// restarts the flow.
    pub async fn reset(&self, user_id: &str) {
        self.counts.write().await.insert(user_id.to_string(), 0);
    }

    /// Current failed-attempt count for a user.
    pub async fn failed_attempts(&self, user_id: &str) -> u32 {
        self.counts
            .read()
            .await
            .get(user_id)
            .copied()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_remaining_decreases_by_one() {
        let tracker = AttemptTracker::new(3);
        assert_eq!(tracker.record_failure("user-1").await, 2);
        assert_eq!(tracker.record_failure("user-1").await, 1);
        assert_eq!(tracker.record_failure("user-1").await, 0);
    }

    #[tokio::test]
    async fn test_counter_resets_after_exhaustion() {
        let tracker = AttemptTracker::new(3);
        for _ in 0..3 {
            tracker.record_failure("user-1").await;
        }
        assert_eq!(tracker.failed_attempts("user-1").await, 0);

        // A future session starts with the full allowance.
        assert_eq!(tracker.record_failure("user-1").await, 2);
    }

    #[tokio::test]
    async fn test_success_resets_counter() {
        let tracker = AttemptTracker::new(3);
        tracker.record_failure("user-1").await;
        tracker.record_failure("user-1").await;
        tracker.record_success("user-1").await;
        assert_eq!(tracker.failed_attempts("user-1").await, 0);
    }

    #[tokio::test]
    async fn test_users_are_independent() {
        let tracker = AttemptTracker::new(3);
        tracker.record_failure("user-1").await;
        assert_eq!(tracker.failed_attempts("user-1").await, 1);
        assert_eq!(tracker.failed_attempts("user-2").await, 0);
        assert_eq!(tracker.record_failure("user-2").await, 2);
    }

    #[tokio::test]
    async fn test_counter_never_exceeds_limit() {
        let tracker = AttemptTracker::new(1);
        assert_eq!(tracker.record_failure("user-1").await, 0);
        assert_eq!(tracker.record_failure("user-1").await, 0);
        assert_eq!(tracker.failed_attempts("user-1").await, 0);
    }
}
