//! Feed export: OPML rendering of configured feeds and the collaborators it needs.
//!
//! The exporter never owns feed data. It reads records through a
//! [`FeedLookup`] and asks a [`UrlBuilder`] where each feed is served:
//!
//! - `opml` - [`export_outline`] document generation and atomic [`export_to_file`]
//! - `store` - [`JsonFeedStore`], a file-backed [`FeedLookup`]
//! - `links` - [`HostnameUrlBuilder`], a [`UrlBuilder`] for the configured server
//!
//! # Example
//!
//! ```ignore
//! use tubecast::feed::{export_outline, HostnameUrlBuilder, JsonFeedStore};
//!
//! let store = JsonFeedStore::new(&config.storage.data_dir);
//! let urls = HostnameUrlBuilder::new(&config.server.base_url())?;
//! let opml = export_outline(&cancel, &config.feeds, &store, &urls).await?;
//! ```

mod links;
mod opml;
mod store;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

pub use links::HostnameUrlBuilder;
pub use opml::{export_outline, export_to_file, ExportError, OPML_TITLE};
pub use store::{JsonFeedStore, StoreError};

/// Feed metadata persisted by whatever keeps feeds up to date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Looks up stored feed metadata by feed id.
#[async_trait]
pub trait FeedLookup: Send + Sync {
    /// Fetch the record for `feed_id`. Implementations should give up
    /// promptly once `cancel` fires.
    async fn get_feed(&self, cancel: &CancellationToken, feed_id: &str)
        -> anyhow::Result<FeedRecord>;
}

/// Builds the public URL a generated file is downloadable from.
#[async_trait]
pub trait UrlBuilder: Send + Sync {
    /// URL for `filename` inside `namespace` (empty namespace means the root).
    async fn download_url(
        &self,
        cancel: &CancellationToken,
        namespace: &str,
        filename: &str,
    ) -> anyhow::Result<String>;
}
