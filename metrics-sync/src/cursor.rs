//! Durable cursor
//!
//! Persists how many feed records have been processed, keyed by feed path, so a
//! restart can resume instead of re-inserting the whole feed. Only used when
//! `resume_from_cursor` is enabled.

use metrics_common::time::now;
use sqlx::SqlitePool;
use std::path::Path;

use crate::error::{SyncError, SyncResult};

#[derive(Debug, Clone)]
pub struct CursorStore {
    pool: SqlitePool,
    feed_key: String,
}

impl CursorStore {
    pub fn new(pool: SqlitePool, feed_path: &Path) -> Self {
        Self {
            pool,
            feed_key: feed_path.to_string_lossy().into_owned(),
        }
    }

    /// Stored count, or 0 when this feed has never been processed
    pub async fn load(&self) -> SyncResult<usize> {
        let count: Option<i64> =
            sqlx::query_scalar("SELECT processed_count FROM sync_cursor WHERE feed_path = ?")
                .bind(&self.feed_key)
                .fetch_optional(&self.pool)
                .await
                .map_err(SyncError::Cursor)?;

        Ok(count.map(|c| c.max(0) as usize).unwrap_or(0))
    }

    pub async fn save(&self, processed_count: usize) -> SyncResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sync_cursor (feed_path, processed_count, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(feed_path) DO UPDATE SET
                processed_count = excluded.processed_count,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&self.feed_key)
        .bind(processed_count as i64)
        .bind(now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(SyncError::Cursor)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_common::db::init_database;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_cursor_defaults_to_zero_and_persists() {
        let dir = TempDir::new().unwrap();
        let pool = init_database(&dir.path().join("metrics.db")).await.unwrap();
        let feed = PathBuf::from("/srv/feed/model_metrics.json");

        let cursor = CursorStore::new(pool.clone(), &feed);
        assert_eq!(cursor.load().await.unwrap(), 0);

        cursor.save(3).await.unwrap();
        cursor.save(7).await.unwrap();
        assert_eq!(CursorStore::new(pool.clone(), &feed).load().await.unwrap(), 7);

        let other = CursorStore::new(pool, &PathBuf::from("other.json"));
        assert_eq!(other.load().await.unwrap(), 0);
    }
}
