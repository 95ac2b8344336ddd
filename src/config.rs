//! Configuration file parser for ~/.config/tubecast/config.toml.
//!
//! The config file is optional: a missing file yields `Config::default()`.
//! Unknown keys are silently ignored by serde (with `deny_unknown_fields` off),
//! though we log a warning when the file contains potential typos.
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::source::{classify, ClassifyError, ResolvedSource};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {size} bytes (max {max} bytes)")]
    TooLarge { size: u64, max: u64 },

    #[error("Feed with empty id in config file")]
    EmptyFeedId,

    #[error("Duplicate feed id {0:?} in config file")]
    DuplicateFeed(String),

    #[error("Feed {id:?} has an unsupported url")]
    InvalidFeedUrl {
        id: String,
        #[source]
        source: ClassifyError,
    },
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
/// Missing keys fall back to `Default::default()`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    /// Configured feeds, in file order. Export keeps this order.
    pub feeds: Vec<FeedConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Public base URL feeds are served from. Empty = `http://localhost:<port>`.
    pub hostname: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            hostname: String::new(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// Base URL download links are built from.
    pub fn base_url(&self) -> String {
        if self.hostname.is_empty() {
            format!("http://localhost:{}", self.port)
        } else {
            self.hostname.clone()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding one `<feed id>.json` metadata record per feed.
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let data_dir = std::env::var("HOME")
            .map(|home| PathBuf::from(home).join(".local").join("share"))
            .unwrap_or_else(|_| std::env::temp_dir())
            .join("tubecast");
        Self { data_dir }
    }
}

/// A single `[[feeds]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedConfig {
    /// Feed id; also the stem of the generated `<id>.xml`.
    pub id: String,
    /// Link the feed was registered from, e.g. `youtube.com/channel/UC...`.
    pub url: String,
    /// Whether the feed is listed in the OPML export.
    #[serde(default)]
    pub opml: bool,
}

impl Config {
    /// Config files larger than this are rejected unread.
    const MAX_FILE_SIZE: u64 = 1024 * 1024;

    /// Load configuration from a TOML file.
    ///
    /// - Missing, empty or whitespace-only file → `Ok(Config::default())`
    /// - File over 1 MiB → `Err(ConfigError::TooLarge)`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown top-level keys → accepted, logged as a warning
    ///
    /// Feeds are not checked here; see [`Config::validate`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let Some(content) = read_bounded(path, Self::MAX_FILE_SIZE)? else {
            tracing::debug!(path = %path.display(), "No config file found, using defaults");
            return Ok(Self::default());
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(&content)?;
        if let Ok(raw) = content.parse::<toml::Table>() {
            raw.keys()
                .filter(|key| !["server", "storage", "feeds"].contains(&key.as_str()))
                .for_each(|key| tracing::warn!(key = %key, "Unknown key in config file, ignoring"));
        }
        tracing::info!(path = %path.display(), feeds = config.feeds.len(), "Loaded configuration");
        Ok(config)
    }

    /// Checks that feed ids are non-empty and unique and that every feed url
    /// classifies.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.resolve_feeds().map(|_| ())
    }

    /// Classifies every configured feed url, in config order.
    ///
    /// # Errors
    ///
    /// Stops at the first empty or duplicate id, or the first url that does
    /// not classify.
    pub fn resolve_feeds(&self) -> Result<Vec<(&FeedConfig, ResolvedSource)>, ConfigError> {
        let mut seen = HashSet::new();
        let mut resolved = Vec::with_capacity(self.feeds.len());

        for feed in &self.feeds {
            if feed.id.is_empty() {
                return Err(ConfigError::EmptyFeedId);
            }
            if !seen.insert(feed.id.as_str()) {
                return Err(ConfigError::DuplicateFeed(feed.id.clone()));
            }
            let source = classify(&feed.url).map_err(|source| ConfigError::InvalidFeedUrl {
                id: feed.id.clone(),
                source,
            })?;
            resolved.push((feed, source));
        }

        Ok(resolved)
    }
}

/// Reads `path` as UTF-8, refusing anything over `max` bytes.
///
/// Returns `Ok(None)` when the file does not exist. The size is taken from
/// the open handle and the read itself is capped, so a file that grows after
/// the check is still rejected.
fn read_bounded(path: &Path, max: u64) -> Result<Option<String>, ConfigError> {
    let file = match std::fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ConfigError::Io(e)),
    };

    let size = file.metadata()?.len();
    if size > max {
        return Err(ConfigError::TooLarge { size, max });
    }

    let mut content = String::new();
    file.take(max + 1).read_to_string(&mut content)?;
    let read = content.len() as u64;
    if read > max {
        return Err(ConfigError::TooLarge { size: read, max });
    }
    Ok(Some(content))
}

// ============================================================================
// Tests
// ============================================================================
