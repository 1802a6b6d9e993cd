//! In-memory store, the reference backend.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::models::{AttendanceRecord, User};
use crate::store::AttendanceStore;

/// Transient in-memory store.
///
/// Thread-safe; many user sessions may append concurrently. State is
/// lost on process exit, which matches the reference behavior. Use
/// [`crate::SqliteStore`] when durability is needed.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, User>>,
    records: RwLock<Vec<AttendanceRecord>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AttendanceStore for MemoryStore {
    async fn register_user(&self, user_id: &str, display_name: Option<&str>) -> Result<()> {
        let mut users = self.users.write().await;
        match users.get_mut(user_id) {
            Some(user) => {
                if let Some(name) = display_name {
                    user.display_name = Some(name.to_string());
                }
            }
            None => {
                users.insert(
                    user_id.to_string(),
                    User {
                        id: user_id.to_string(),
                        display_name: display_name.map(str::to_string),
                        first_seen_at: Utc::now(),
                    },
                );
            }
        }
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        Ok(self.users.read().await.get(user_id).cloned())
    }

    async fn append(&self, record: AttendanceRecord) -> Result<()> {
        self.records.write().await.push(record);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<AttendanceRecord>> {
        Ok(self.records.read().await.clone())
    }
}
