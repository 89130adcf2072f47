//! Liveness endpoint
//!
//! Answers as long as the status server task is running. It does not touch the
//! database or the feed; sync progress and the last error live under
//! `/api/sync/status`.

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// Service name reported by `/health`
pub const SERVICE_NAME: &str = "metrics-sync";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "ok"
    pub status: &'static str,
    pub module: &'static str,
    /// Crate version of the running binary
    pub version: &'static str,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        module: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
