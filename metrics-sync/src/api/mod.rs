//! Read-only HTTP status surface for metrics-sync

pub mod health;
pub mod status;

pub use health::health_routes;
pub use status::{get_recent_metrics, get_sync_status};
