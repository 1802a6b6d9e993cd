//! The AttendanceStore trait definition.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{AttendanceRecord, User};

/// Append-only attendance ledger plus a minimal user registry.
///
/// The core never deletes or mutates records; repeated check-ins by
/// the same user produce multiple records (deduplication is a policy
/// choice for the backing implementation). This trait is object-safe
/// and used as `Arc<dyn AttendanceStore>`.
#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Register a user on first sight, or refresh their display name.
    ///
    /// `first_seen_at` is set once and never changed.
    async fn register_user(&self, user_id: &str, display_name: Option<&str>) -> Result<()>;

    /// Look up a registered user.
    async fn get_user(&self, user_id: &str) -> Result<Option<User>>;

    /// Append one attendance record. Pure insertion, no dedup.
    async fn append(&self, record: AttendanceRecord) -> Result<()>;

    /// All attendance records in insertion order.
    async fn list_all(&self) -> Result<Vec<AttendanceRecord>>;
}
