//! Store writer
//!
//! Owns the database pool and appends one `metrics` row per normalized record.

use async_trait::async_trait;
use metrics_common::db::{init_database, PersistedMetric, METRIC_COLUMNS};
use sqlx::SqlitePool;
use std::path::Path;
use tracing::{debug, error, info};

use crate::error::{SyncError, SyncResult};

/// Destination for normalized metrics
#[async_trait]
pub trait MetricSink: Send + Sync {
    /// Append one row. Errors carry their recovery tier.
    async fn insert(&self, metric: &PersistedMetric) -> SyncResult<()>;
}

/// SQLite-backed [`MetricSink`]
#[derive(Debug, Clone)]
pub struct SqliteMetricStore {
    pool: SqlitePool,
}

impl SqliteMetricStore {
    /// Open the database once for the life of the process
    ///
    /// Failure is fatal; the caller must stop rather than run degraded.
    pub async fn connect(db_path: &Path) -> SyncResult<Self> {
        match init_database(db_path).await {
            Ok(pool) => {
                info!(path = %db_path.display(), "Connected to metrics database");
                Ok(Self { pool })
            }
            Err(e) => {
                error!(path = %db_path.display(), error = %e, "Failed to connect to metrics database");
                Err(SyncError::Connect(e))
            }
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl MetricSink for SqliteMetricStore {
    async fn insert(&self, metric: &PersistedMetric) -> SyncResult<()> {
        let sql = format!(
            "INSERT INTO metrics ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            METRIC_COLUMNS
        );

        sqlx::query(&sql)
            .bind(metric.accuracy)
            .bind(metric.precision)
            .bind(metric.recall)
            .bind(metric.f1_score)
            .bind(metric.tn)
            .bind(metric.fp)
            .bind(metric.fn_)
            .bind(metric.tp)
            .bind(&metric.model_version)
            .bind(&metric.model_type)
            .bind(&metric.timestamp)
            .execute(&self.pool)
            .await
            .map_err(SyncError::Insert)?;

        debug!(
            timestamp = %metric.timestamp,
            model_type = %metric.model_type,
            model_version = %metric.model_version,
            "Inserted metric row"
        );
        Ok(())
    }
}

/// Newest rows first, at most `limit`
pub async fn recent_metrics(pool: &SqlitePool, limit: i64) -> Result<Vec<PersistedMetric>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM metrics ORDER BY rowid DESC LIMIT ?",
        METRIC_COLUMNS
    );
    let rows = sqlx::query(&sql).bind(limit).fetch_all(pool).await?;
    rows.iter().map(PersistedMetric::from_row).collect()
}
