//! metrics-sync library
//!
//! Tails an append-only JSON feed of model metrics, repairs each new record into
//! the fixed `metrics` row shape, and appends it to the database.
//!
//! Pipeline per poll: [`feed::FeedReader`] → [`engine::SyncEngine`] (diff against
//! the processed count) → [`normalizer::normalize`] → [`store::MetricSink`].

use axum::Router;
use sqlx::SqlitePool;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod confusion;
pub mod cursor;
pub mod engine;
pub mod error;
pub mod feed;
pub mod logging;
pub mod normalizer;
pub mod record;
pub mod sanitizer;
pub mod store;

pub use error::{Severity, SyncError, SyncResult};

use engine::SyncStats;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (read only from handlers)
    pub db: SqlitePool,
    /// Latest engine stats snapshot
    pub stats: watch::Receiver<SyncStats>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, stats: watch::Receiver<SyncStats>) -> Self {
        Self { db, stats }
    }
}

/// Build the status router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/api/sync/status", get(api::get_sync_status))
        .route("/api/metrics/recent", get(api::get_recent_metrics))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
