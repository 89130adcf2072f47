//! Sync engine
//!
//! Polls the feed at a fixed interval, normalizes records appended since the last
//! cycle, and writes them one at a time in feed order. The engine is the only
//! writer of its cursor; status readers observe it through a watch channel.

use chrono::{DateTime, Utc};
use metrics_common::time::now;
use serde::Serialize;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::cursor::CursorStore;
use crate::error::{Severity, SyncResult};
use crate::feed::FeedReader;
use crate::normalizer::normalize;
use crate::store::MetricSink;

/// Snapshot published after every cycle
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncStats {
    /// Feed records processed so far (the cursor)
    pub last_seen_count: usize,
    pub rows_inserted: u64,
    pub rows_failed: u64,
    pub cycles: u64,
    pub last_cycle_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

/// Outcome of one poll cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub feed_len: usize,
    pub attempted: usize,
    pub inserted: usize,
    pub failed: usize,
}

pub struct SyncEngine<S> {
    feed: FeedReader,
    sink: S,
    cursor: Option<CursorStore>,
    poll_interval: Duration,
    last_seen_count: usize,
    stats: SyncStats,
    stats_tx: watch::Sender<SyncStats>,
}

impl<S: MetricSink> SyncEngine<S> {
    pub fn new(feed: FeedReader, sink: S, poll_interval: Duration) -> Self {
        let (stats_tx, _) = watch::channel(SyncStats::default());
        Self {
            feed,
            sink,
            cursor: None,
            poll_interval,
            last_seen_count: 0,
            stats: SyncStats::default(),
            stats_tx,
        }
    }

    /// Persist the processed count after each slice
    pub fn with_cursor(mut self, cursor: CursorStore) -> Self {
        self.cursor = Some(cursor);
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<SyncStats> {
        self.stats_tx.subscribe()
    }

    pub fn last_seen_count(&self) -> usize {
        self.last_seen_count
    }

    /// Start from the stored cursor instead of zero
    ///
    /// No-op without a cursor store. Returns the starting count.
    pub async fn resume(&mut self) -> SyncResult<usize> {
        if let Some(cursor) = &self.cursor {
            let stored = cursor.load().await?;
            info!(
                feed = %self.feed.path().display(),
                processed_count = stored,
                "Resuming from stored cursor"
            );
            self.last_seen_count = stored;
            self.stats.last_seen_count = stored;
            self.publish();
        }
        Ok(self.last_seen_count)
    }

    /// Run one poll cycle
    ///
    /// A feed read failure leaves the cursor untouched and is returned as a
    /// recoverable error. A recoverable insert failure skips that record only. A
    /// fatal insert failure aborts the slice without advancing the cursor.
    pub async fn run_cycle(&mut self) -> SyncResult<CycleReport> {
        self.stats.cycles += 1;
        self.stats.last_cycle_at = Some(now());

        let records = match self.feed.read().await {
            Ok(records) => records,
            Err(e) => {
                warn!(feed = %self.feed.path().display(), error = %e, "Feed read failed, retrying next cycle");
                self.stats.last_error = Some(e.to_string());
                self.publish();
                return Err(e);
            }
        };

        let mut report = CycleReport {
            feed_len: records.len(),
            ..Default::default()
        };

        if records.len() <= self.last_seen_count {
            if records.len() < self.last_seen_count {
                warn!(
                    feed_len = records.len(),
                    last_seen_count = self.last_seen_count,
                    "Feed shorter than processed count, waiting for it to grow"
                );
            } else {
                info!("No new metrics");
            }
            self.publish();
            return Ok(report);
        }

        let start = self.last_seen_count;
        let new_records = &records[start..];
        info!(count = new_records.len(), "Inserting new metrics");

        for (offset, record) in new_records.iter().enumerate() {
            let index = start + offset;
            let metric = normalize(record);
            report.attempted += 1;

            match self.sink.insert(&metric).await {
                Ok(()) => {
                    report.inserted += 1;
                    self.stats.rows_inserted += 1;
                    info!(
                        index,
                        timestamp = %metric.timestamp,
                        model_type = %metric.model_type,
                        model_version = %metric.model_version,
                        "Metric inserted, matrix [[{}, {}], [{}, {}]]",
                        metric.tn,
                        metric.fp,
                        metric.fn_,
                        metric.tp
                    );
                }
                Err(e) => match e.severity() {
                    Severity::Recoverable => {
                        report.failed += 1;
                        self.stats.rows_failed += 1;
                        warn!(index, error = %e, "Failed to insert metric, skipping record");
                        self.stats.last_error = Some(e.to_string());
                    }
                    Severity::Fatal => {
                        error!(index, error = %e, "Store unavailable, aborting slice");
                        self.stats.last_error = Some(e.to_string());
                        self.publish();
                        return Err(e);
                    }
                },
            }
        }

        self.last_seen_count = records.len();
        self.stats.last_seen_count = self.last_seen_count;

        if let Some(cursor) = &self.cursor {
            if let Err(e) = cursor.save(self.last_seen_count).await {
                warn!(error = %e, "Failed to persist cursor");
                self.stats.last_error = Some(e.to_string());
            }
        }

        self.publish();
        Ok(report)
    }

    /// Poll forever at the fixed interval
    ///
    /// Returns only when a cycle reports a fatal error.
    pub async fn run(mut self) -> SyncResult<()> {
        info!(
            feed = %self.feed.path().display(),
            poll_interval_secs = self.poll_interval.as_secs_f64(),
            "Sync engine started"
        );

        loop {
            if let Err(e) = self.run_cycle().await {
                if e.is_fatal() {
                    error!(error = %e, "Sync engine stopping");
                    return Err(e);
                }
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    fn publish(&self) {
        self.stats_tx.send_replace(self.stats.clone());
    }
}
