//! Attendance ledger and user registry for the check-in bot.
//!
//! The [`AttendanceStore`] trait covers the two storage concerns of
//! the core: an append-only ledger of successful check-ins and a
//! minimal first-seen user registry. Two backends are provided:
//!
//! - [`MemoryStore`] - transient, the reference behavior
//! - [`SqliteStore`] - durable, via SQLx with SQLite
//!
//! # Example
//!
//! ```no_run
//! use attendance_store::{AttendanceRecord, AttendanceStore, SqliteStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = SqliteStore::connect("sqlite:attendance.db?mode=rwc").await?;
//!     store.migrate().await?;
//!
//!     store.register_user("user-1", Some("Ana")).await?;
//!     store
//!         .append(AttendanceRecord::new("user-1", Some("Ana".into()), 19.52, -99.25))
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod memory;
pub mod models;
pub mod sqlite;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use models::{AttendanceRecord, User};
pub use sqlite::SqliteStore;
pub use store::AttendanceStore;
