use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use super::{FeedLookup, FeedRecord};
use crate::util::write_atomic;

/// Errors from the file-backed feed store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("feed {0:?} not found")]
    NotFound(String),

    /// Feed ids become file names, so path separators are rejected.
    #[error("invalid feed id {0:?}")]
    InvalidId(String),

    #[error("failed to access feed record: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt feed record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("feed lookup cancelled")]
    Cancelled,
}

/// Feed metadata stored as one `<id>.json` file per feed.
#[derive(Debug, Clone)]
pub struct JsonFeedStore {
    dir: PathBuf,
}

impl JsonFeedStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn record_path(&self, feed_id: &str) -> Result<PathBuf, StoreError> {
        if feed_id.is_empty()
            || feed_id.contains(['/', '\\'])
            || feed_id == "."
            || feed_id == ".."
        {
            return Err(StoreError::InvalidId(feed_id.to_owned()));
        }
        Ok(self.dir.join(format!("{feed_id}.json")))
    }

    /// Reads the record for `feed_id`.
    pub async fn load(&self, feed_id: &str) -> Result<FeedRecord, StoreError> {
        let path = self.record_path(feed_id)?;
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(feed_id.to_owned()));
            }
            Err(e) => return Err(StoreError::Io(e)),
        };
        Ok(serde_json::from_str(&content)?)
    }

    /// Writes (or replaces) the record, creating the store directory if needed.
    pub async fn put(&self, record: &FeedRecord) -> Result<(), StoreError> {
        let path = self.record_path(&record.id)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        let json = serde_json::to_vec_pretty(record)?;
        write_atomic(&path, &json).await?;
        tracing::debug!(feed_id = %record.id, path = %path.display(), "Stored feed record");
        Ok(())
    }
}

#[async_trait]
impl FeedLookup for JsonFeedStore {
    async fn get_feed(
        &self,
        cancel: &CancellationToken,
        feed_id: &str,
    ) -> anyhow::Result<FeedRecord> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(StoreError::Cancelled.into()),
            record = self.load(feed_id) => Ok(record?),
        }
    }
}
