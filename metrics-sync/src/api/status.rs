//! Sync status and recent rows
//!
//! Read-only views for operators: the engine's latest stats snapshot and the
//! newest rows of the `metrics` table.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use metrics_common::db::PersistedMetric;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::engine::SyncStats;
use crate::store::recent_metrics;
use crate::AppState;

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 500;

/// GET /api/sync/status
pub async fn get_sync_status(State(state): State<AppState>) -> Json<SyncStats> {
    let stats = state.stats.borrow().clone();
    Json(stats)
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

#[derive(Debug, Serialize)]
pub struct RecentMetricsResponse {
    pub count: usize,
    pub rows: Vec<PersistedMetric>,
}

/// GET /api/metrics/recent?limit=N
///
/// Newest rows first. `limit` is clamped into 1..=500.
pub async fn get_recent_metrics(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<RecentMetricsResponse>, StatusError> {
    let limit = query.limit.clamp(1, MAX_LIMIT);

    let rows = recent_metrics(&state.db, limit)
        .await
        .map_err(|e| StatusError::Database(e.to_string()))?;

    Ok(Json(RecentMetricsResponse {
        count: rows.len(),
        rows,
    }))
}

#[derive(Debug)]
pub enum StatusError {
    Database(String),
}

impl IntoResponse for StatusError {
    fn into_response(self) -> Response {
        match self {
            StatusError::Database(msg) => {
                error!("Status query failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Database error", "details": msg })),
                )
                    .into_response()
            }
        }
    }
}
