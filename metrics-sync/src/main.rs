//! metrics-sync - Metrics feed to database synchronizer
//!
//! Polls the model-serving layer's append-only JSON feed and appends each new
//! record to the `metrics` table. Optionally serves a read-only status API.
//!
//! Startup failures (bad config, unreachable database, unreadable cursor) exit
//! the process; everything after startup is retried or skipped per record.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use metrics_common::config::{
    default_config_path, load_toml_config, ConfigOverrides, SyncConfig, TomlConfig,
};
use tracing::{error, info, warn};
use tracing_subscriber::util::SubscriberInitExt;

use metrics_sync::cursor::CursorStore;
use metrics_sync::engine::SyncEngine;
use metrics_sync::feed::FeedReader;
use metrics_sync::logging::startup_subscriber;
use metrics_sync::store::SqliteMetricStore;
use metrics_sync::{build_router, AppState};

/// Command-line arguments for metrics-sync
#[derive(Parser, Debug)]
#[command(name = "metrics-sync")]
#[command(about = "Sync model metrics from a JSON feed into the metrics database")]
#[command(version)]
struct Args {
    /// TOML config file (defaults to the platform config dir)
    #[arg(short, long, env = "METRICS_SYNC_CONFIG")]
    config: Option<PathBuf>,

    /// JSON array feed written by the model-serving layer
    #[arg(short, long, env = "METRICS_SYNC_FEED")]
    feed: Option<PathBuf>,

    /// SQLite database file holding the metrics table
    #[arg(short, long, env = "METRICS_SYNC_DATABASE")]
    database: Option<PathBuf>,

    /// Seconds between poll cycles
    #[arg(long, env = "METRICS_SYNC_POLL_SECS")]
    poll_secs: Option<u64>,

    /// Resume from the stored cursor instead of re-reading the feed from zero
    #[arg(long, env = "METRICS_SYNC_RESUME")]
    resume: Option<bool>,

    /// Address for the status API, e.g. 127.0.0.1:5790
    #[arg(long, env = "METRICS_SYNC_STATUS_BIND")]
    status_bind: Option<String>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "METRICS_SYNC_LOG_LEVEL")]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            feed_path: self.feed.clone(),
            database_path: self.database.clone(),
            poll_interval_secs: self.poll_secs,
            resume_from_cursor: self.resume,
            status_bind: self.status_bind.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let rust_log = std::env::var("RUST_LOG").ok();
    let (subscriber, log_level) =
        startup_subscriber(rust_log.as_deref(), args.log_level.as_deref(), std::io::stdout);
    subscriber.init();

    let config_path = args.config.clone().or_else(default_config_path);
    let file_config = match &config_path {
        Some(path) => load_toml_config(path)?,
        None => TomlConfig::default(),
    };
    let config = SyncConfig::resolve(args.overrides(), file_config)?;
    log_level
        .apply(&config.log_level)
        .context("Failed to apply configured log level")?;

    info!(
        "Starting metrics-sync v{}",
        env!("CARGO_PKG_VERSION")
    );
    info!("Feed: {}", config.feed_path.display());
    info!("Database: {}", config.database_path.display());

    let store = match SqliteMetricStore::connect(&config.database_path).await {
        Ok(store) => store,
        Err(e) => {
            error!("Cannot proceed without a database connection: {}", e);
            return Err(e.into());
        }
    };

    let mut engine = SyncEngine::new(
        FeedReader::new(&config.feed_path),
        store.clone(),
        config.poll_interval,
    );

    if config.resume_from_cursor {
        engine = engine.with_cursor(CursorStore::new(store.pool().clone(), &config.feed_path));
        engine
            .resume()
            .await
            .context("Failed to load stored cursor")?;
    } else {
        warn!("Cursor persistence disabled; every record in the feed will be inserted on startup");
    }

    if let Some(addr) = config.status_bind {
        let app = build_router(AppState::new(store.pool().clone(), engine.subscribe()));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .context("Failed to bind status address")?;
        info!("Status API listening on http://{}", addr);
        info!("Health check: http://{}/health", addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                error!("Status server error: {}", e);
            }
        });
    }

    engine.run().await?;

    Ok(())
}
