//! SQLite implementations of `TargetStore` and `JobRegistry`
//!
//! One database file holds both kinds of durable state:
//!
//! - `targets`: one row per monitored target; scalar fields as typed
//!   columns, the status history as a JSON text column
//! - `monitor_jobs`: one row per actively monitored target id
//!
//! ## Features
//!
//! - **Embedded**: no separate database server required
//! - **WAL mode**: readers do not block the scheduler's writes
//! - **Migrations**: automatic schema versioning with sqlx
//! - **Atomic registry mutations**: adds/removes are single statements,
//!   so concurrent mutations never lose each other's effect
//!
//! ## Limitations
//!
//! - Single-machine only; no replication beyond file-level backups

use std::path::Path;

use async_trait::async_trait;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow, SqliteSynchronous,
};
use sqlx::{Pool, Row, Sqlite};
use tracing::{debug, info, instrument};

use super::error::{StoreError, StoreResult};
use super::store::{JobRegistry, TargetStore};
use crate::{MonitoredTarget, StatusSample};

/// SQLite-backed store, shared by the target records and the job registry.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Open (or create) the database file and run migrations.
    ///
    /// ## Example
    ///
    /// ```no_run
    /// # use sitewatch::storage::sqlite::SqliteStore;
    /// # async fn example() -> anyhow::Result<()> {
    /// let store = SqliteStore::new("./sitewatch.db").await?;
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip_all)]
    pub async fn new(db_path: impl AsRef<Path>) -> StoreResult<Self> {
        let db_path_str = db_path.as_ref().to_string_lossy().to_string();

        info!("initializing SQLite store at: {}", db_path_str);

        let options = SqliteConnectOptions::new()
            .filename(&db_path_str)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(std::time::Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        debug!("running database migrations");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::MigrationFailed(e.to_string()))?;

        info!("database ready");

        Ok(Self { pool })
    }

    fn row_to_target(row: &SqliteRow) -> StoreResult<MonitoredTarget> {
        let history_json: String = row.get("history");
        let history: Vec<StatusSample> = serde_json::from_str(&history_json)?;

        Ok(MonitoredTarget {
            id: row.get("id"),
            url: row.get("url"),
            title: row.get("title"),
            contact_email: row.get("contact_email"),
            monitoring_enabled: row.get("monitoring_enabled"),
            latest_status: row.get::<Option<i64>, _>("latest_status").map(|v| v as u16),
            history,
        })
    }
}

#[async_trait]
impl TargetStore for SqliteStore {
    #[instrument(skip(self, target), fields(id = %target.id, url = %target.url))]
    async fn create(&self, target: &MonitoredTarget) -> StoreResult<()> {
        let history_json = serde_json::to_string(&target.history)?;

        sqlx::query(
            r#"
            INSERT INTO targets (
                id, url, title, contact_email, monitoring_enabled, latest_status, history
            )
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&target.id)
        .bind(&target.url)
        .bind(&target.title)
        .bind(&target.contact_email)
        .bind(target.monitoring_enabled)
        .bind(target.latest_status.map(|v| v as i64))
        .bind(history_json)
        .execute(&self.pool)
        .await?;

        debug!("target created");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<MonitoredTarget>> {
        let row = sqlx::query(
            r#"
            SELECT id, url, title, contact_email, monitoring_enabled, latest_status, history
            FROM targets
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_target).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_url(&self, url: &str) -> StoreResult<Option<MonitoredTarget>> {
        let row = sqlx::query(
            r#"
            SELECT id, url, title, contact_email, monitoring_enabled, latest_status, history
            FROM targets
            WHERE url = ?
            "#,
        )
        .bind(url)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_target).transpose()
    }

    #[instrument(skip(self, target), fields(id = %target.id))]
    async fn save(&self, target: &MonitoredTarget) -> StoreResult<()> {
        let history_json = serde_json::to_string(&target.history)?;

        // UPDATE rather than upsert: a row deleted mid-check must not be
        // resurrected by the losing writer.
        sqlx::query(
            r#"
            UPDATE targets
            SET title = ?, contact_email = ?, monitoring_enabled = ?,
                latest_status = ?, history = ?
            WHERE id = ?
            "#,
        )
        .bind(&target.title)
        .bind(&target.contact_email)
        .bind(target.monitoring_enabled)
        .bind(target.latest_status.map(|v| v as i64))
        .bind(history_json)
        .bind(&target.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM targets WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        debug!("deleted {} row(s)", result.rows_affected());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> StoreResult<Vec<MonitoredTarget>> {
        let rows = sqlx::query(
            r#"
            SELECT id, url, title, contact_email, monitoring_enabled, latest_status, history
            FROM targets
            ORDER BY url ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_target).collect()
    }

    async fn close(&self) -> StoreResult<()> {
        info!("closing SQLite store");
        self.pool.close().await;
        Ok(())
    }
}

#[async_trait]
impl JobRegistry for SqliteStore {
    #[instrument(skip(self))]
    async fn add(&self, target_id: &str) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO monitor_jobs (target_id)
            VALUES (?)
            ON CONFLICT (target_id) DO NOTHING
            "#,
        )
        .bind(target_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove(&self, target_id: &str) -> StoreResult<()> {
        sqlx::query("DELETE FROM monitor_jobs WHERE target_id = ?")
            .bind(target_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> StoreResult<Vec<String>> {
        let rows = sqlx::query("SELECT target_id FROM monitor_jobs ORDER BY target_id ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(|row| row.get("target_id")).collect())
    }
}
