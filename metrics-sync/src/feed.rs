//! Feed reader
//!
//! The feed is a JSON array rewritten in place by an external producer. Every
//! poll re-reads the whole file; there is no streaming cursor over the bytes.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::SyncResult;
use crate::record::MetricRecord;

/// Reads the append-only metrics feed
#[derive(Debug, Clone)]
pub struct FeedReader {
    path: PathBuf,
}

impl FeedReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record currently in the feed, in file order
    ///
    /// A missing file means no records yet and returns an empty list. Content
    /// that does not parse as a JSON array (typically a producer mid-write) and
    /// other I/O failures are returned as recoverable errors; the caller retries
    /// the whole file on its next poll. Invalid UTF-8 is replaced, never fatal.
    pub async fn read(&self) -> SyncResult<Vec<MetricRecord>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "Feed file not found, treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let text = String::from_utf8_lossy(&bytes);
        let records: Vec<MetricRecord> = serde_json::from_str(&text)?;

        debug!(path = %self.path.display(), count = records.len(), "Read feed");
        Ok(records)
    }
}
