//! SQLite-backed store for durable deployments.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::{AttendanceRecord, User};
use crate::store::AttendanceStore;

/// Default pool size for store connections.
const DEFAULT_POOL_SIZE: u32 = 5;

/// SQLite-backed [`AttendanceStore`].
///
/// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
/// Use `sqlite::memory:` for tests.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect to a SQLite database.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(DEFAULT_POOL_SIZE)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!("Connected to attendance database: {}", url);

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// Should be called once after connecting.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running attendance store migrations...");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl AttendanceStore for SqliteStore {
    async fn register_user(&self, user_id: &str, display_name: Option<&str>) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, display_name, first_seen_at)
            VALUES (?, ?, ?)
            ON CONFLICT(id) DO UPDATE
            SET display_name = COALESCE(excluded.display_name, users.display_name)
            "#,
        )
        .bind(user_id)
        .bind(display_name)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, display_name, first_seen_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn append(&self, record: AttendanceRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO attendance_records (user_id, display_name, timestamp, latitude, longitude)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.user_id)
        .bind(&record.display_name)
        .bind(record.timestamp)
        .bind(record.latitude)
        .bind(record.longitude)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<AttendanceRecord>> {
        let records = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT user_id, display_name, timestamp, latitude, longitude
            FROM attendance_records
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
