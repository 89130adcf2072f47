//! Error types for metrics-sync
//!
//! Every failure is classified into one of two recovery tiers. Together with
//! `Ok` this gives the engine a three-way dispatch per operation:
//! - `Ok`: proceed
//! - [`Severity::Recoverable`]: log, skip the record or cycle, keep looping
//! - [`Severity::Fatal`]: stop the engine

use thiserror::Error;

/// Result type for sync operations
pub type SyncResult<T> = std::result::Result<T, SyncError>;

/// Recovery tier of a [`SyncError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Recoverable,
    Fatal,
}

/// Sync error type
#[derive(Debug, Error)]
pub enum SyncError {
    /// Feed content is not a JSON array; usually a producer mid-write
    #[error("Feed parse error: {0}")]
    FeedParse(#[from] serde_json::Error),

    /// Any other failure while reading the feed
    #[error("Feed read error: {0}")]
    FeedIo(#[from] std::io::Error),

    /// Row insert rejected or interrupted
    #[error("Insert failed: {0}")]
    Insert(#[source] sqlx::Error),

    /// Reading or writing the durable cursor failed
    #[error("Cursor error: {0}")]
    Cursor(#[source] sqlx::Error),

    /// Database could not be opened at startup
    #[error("Database connect failed: {0}")]
    Connect(#[source] metrics_common::Error),
}

impl SyncError {
    pub fn severity(&self) -> Severity {
        match self {
            SyncError::Connect(_) => Severity::Fatal,
            // A closed pool never reopens; no reconnect logic exists
            SyncError::Insert(sqlx::Error::PoolClosed) => Severity::Fatal,
            _ => Severity::Recoverable,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}
