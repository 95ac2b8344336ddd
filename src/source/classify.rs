use thiserror::Error;
use url::Url;

use super::{LinkType, Provider, ResolvedSource};
use crate::util::{normalize_scheme, path_segment, segment_count};

const YOUTUBE_HOST_SUFFIX: &str = "youtube.com";
const VIMEO_HOST_SUFFIX: &str = "vimeo.com";

/// Errors that can occur while classifying a link.
///
/// Every variant carries the scheme-normalized address so the message can be
/// shown to the user as is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    /// The address could not be parsed as a URL.
    #[error("failed to parse url {address}: {source}")]
    MalformedUrl {
        address: String,
        #[source]
        source: url::ParseError,
    },

    /// The host is neither YouTube nor Vimeo.
    #[error("unsupported URL host {host:?} in {address}")]
    UnsupportedHost { address: String, host: String },

    /// Known host, but the path matches no known link category.
    #[error("unsupported link format: {0}")]
    UnsupportedLinkFormat(String),

    #[error("invalid playlist link: {0}")]
    InvalidPlaylistLink(String),

    #[error("invalid channel link: {0}")]
    InvalidChannelLink(String),

    #[error("invalid user link: {0}")]
    InvalidUserLink(String),

    #[error("invalid id in link: {0}")]
    InvalidId(String),

    #[error("invalid link path: {0}")]
    InvalidPath(String),
}

/// Classifies a user-supplied address into a [`ResolvedSource`].
///
/// Addresses without a leading `http` token get `https://` prepended before
/// parsing, so `youtube.com/user/x` and `https://youtube.com/user/x`
/// classify identically.
///
/// # Errors
///
/// Returns the most specific [`ClassifyError`] available: a malformed URL,
/// an unsupported host, an unknown path shape, or a recognized link whose
/// identifier is missing or empty. A partially filled result is never
/// returned.
///
/// # Examples
///
/// ```
/// use tubecast::source::{classify, LinkType, Provider};
///
/// let source = classify("youtube.com/channel/UC5XPnUk8Vvv_pWslhwom6Og").unwrap();
/// assert_eq!(source.provider, Provider::YouTube);
/// assert_eq!(source.link_type, LinkType::Channel);
/// assert_eq!(source.item_id, "UC5XPnUk8Vvv_pWslhwom6Og");
///
/// assert!(classify("https://example.com/foo").is_err());
/// ```
pub fn classify(address: &str) -> Result<ResolvedSource, ClassifyError> {
    let address = normalize_scheme(address);

    let url = Url::parse(&address).map_err(|source| ClassifyError::MalformedUrl {
        address: address.clone(),
        source,
    })?;

    let host = url.host_str().unwrap_or_default();

    let (provider, (link_type, item_id)) = if host.ends_with(YOUTUBE_HOST_SUFFIX) {
        (Provider::YouTube, parse_youtube(&url, &address)?)
    } else if host.ends_with(VIMEO_HOST_SUFFIX) {
        (Provider::Vimeo, parse_vimeo(&url, &address)?)
    } else {
        return Err(ClassifyError::UnsupportedHost {
            host: host.to_owned(),
            address,
        });
    };

    tracing::debug!(%address, %provider, %link_type, %item_id, "Classified link");

    Ok(ResolvedSource {
        provider,
        link_type,
        item_id,
    })
}

/// Link parser for youtube.com hosts.
///
/// - `/playlist?list=PLCB9F975ECF01953C`
/// - `/watch?v=rbCbho7aLYw&list=PLMpEfaKcGjpWEgNtdnsvLX6LzQL0UC0EM`
/// - `/channel/UC5XPnUk8Vvv_pWslhwom6Og` (trailing `/videos` etc. allowed)
/// - `/user/fxigr1`
fn parse_youtube(url: &Url, address: &str) -> Result<(LinkType, String), ClassifyError> {
    let path = url.path();

    if path.starts_with("/playlist") || path.starts_with("/watch") {
        let list = url
            .query_pairs()
            .find(|(key, _)| key == "list")
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty());

        return match list {
            Some(id) => Ok((LinkType::Playlist, id)),
            None => Err(ClassifyError::InvalidPlaylistLink(address.to_owned())),
        };
    }

    if path.starts_with("/channel") {
        return path_segment(path, 2)
            .map(|id| (LinkType::Channel, id.to_owned()))
            .ok_or_else(|| ClassifyError::InvalidChannelLink(address.to_owned()));
    }

    if path.starts_with("/user") {
        return path_segment(path, 2)
            .map(|id| (LinkType::User, id.to_owned()))
            .ok_or_else(|| ClassifyError::InvalidUserLink(address.to_owned()));
    }

    Err(ClassifyError::UnsupportedLinkFormat(address.to_owned()))
}

/// Link parser for vimeo.com hosts.
///
/// - `/groups/<name>`
/// - `/channels/<name>`
/// - `/<user>` (no `users/` prefix)
fn parse_vimeo(url: &Url, address: &str) -> Result<(LinkType, String), ClassifyError> {
    let path = url.path();

    if segment_count(path) < 2 {
        return Err(ClassifyError::InvalidPath(address.to_owned()));
    }

    let link_type = match path_segment(path, 1) {
        Some("groups") => LinkType::Group,
        Some("channels") => LinkType::Channel,
        _ => LinkType::User,
    };

    let id = match link_type {
        LinkType::Group | LinkType::Channel => path_segment(path, 2)
            .ok_or_else(|| ClassifyError::InvalidChannelLink(address.to_owned()))?,
        _ => path_segment(path, 1).ok_or_else(|| ClassifyError::InvalidId(address.to_owned()))?,
    };

    Ok((link_type, id.to_owned()))
}
