//! Feed source resolution and OPML export for video-hosting feeds.
//!
//! - [`source`] - classify a pasted YouTube/Vimeo link into a [`source::ResolvedSource`]
//! - [`feed`] - export configured feeds as an OPML subscription list
//! - [`config`] - `config.toml` loading and feed validation
//! - [`util`] - address helpers shared by the link parsers

pub mod config;
pub mod feed;
pub mod source;
pub mod util;
