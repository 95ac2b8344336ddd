//! Utility functions for common operations.
//!
//! This module provides the address helpers shared by the per-provider
//! link parsers, plus the file helper used by export and storage:
//!
//! - **Scheme normalization**: turn `youtube.com/...` into `https://youtube.com/...`
//! - **Path segments**: take the segment at a given index of the `/`-split
//!   escaped path, treating an empty segment the same as a missing one
//! - **Atomic writes**: replace a file without exposing a partial write
//!
//! # Examples
//!
//! ```
//! use tubecast::util::{normalize_scheme, path_segment};
//!
//! let address = normalize_scheme("vimeo.com/groups/test");
//! let url = url::Url::parse(&address).unwrap();
//! assert_eq!(path_segment(url.path(), 2), Some("test"));
//! ```

mod fs;
mod url_path;

pub use fs::write_atomic;
pub use url_path::{normalize_scheme, path_segment, segment_count};
