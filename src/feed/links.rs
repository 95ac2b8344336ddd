use anyhow::{anyhow, Context};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use url::Url;

use super::UrlBuilder;

/// Builds download URLs under the server's public hostname.
///
/// `https://podcasts.example.com` + namespace `""` + `tech.xml` gives
/// `https://podcasts.example.com/tech.xml`. Segments are percent-encoded by
/// the `url` crate, so a filename can never escape its namespace.
#[derive(Debug, Clone)]
pub struct HostnameUrlBuilder {
    base: Url,
}

impl HostnameUrlBuilder {
    /// # Errors
    ///
    /// Fails if `hostname` is not an absolute URL that can carry a path
    /// (e.g. `mailto:` or `data:` URLs).
    pub fn new(hostname: &str) -> anyhow::Result<Self> {
        let base = Url::parse(hostname)
            .with_context(|| format!("Invalid server hostname: {hostname}"))?;
        if base.cannot_be_a_base() {
            return Err(anyhow!("Server hostname cannot be a base URL: {hostname}"));
        }
        Ok(Self { base })
    }

    fn build(&self, namespace: &str, filename: &str) -> anyhow::Result<String> {
        if filename.is_empty() {
            return Err(anyhow!("Empty filename"));
        }

        let mut url = self.base.clone();
        url.set_query(None);
        url.set_fragment(None);
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| anyhow!("Server hostname cannot be a base URL"))?;
            segments.pop_if_empty();
            if !namespace.is_empty() {
                segments.push(namespace);
            }
            segments.push(filename);
        }
        Ok(url.to_string())
    }
}

#[async_trait]
impl UrlBuilder for HostnameUrlBuilder {
    async fn download_url(
        &self,
        _cancel: &CancellationToken,
        namespace: &str,
        filename: &str,
    ) -> anyhow::Result<String> {
        self.build(namespace, filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_namespace() {
        let builder = HostnameUrlBuilder::new("https://podcasts.example.com").unwrap();
        assert_eq!(
            builder.build("", "tech.xml").unwrap(),
            "https://podcasts.example.com/tech.xml"
        );
    }

    #[test]
    fn test_hostname_with_path_and_trailing_slash() {
        let builder = HostnameUrlBuilder::new("http://example.com:8080/feeds/").unwrap();
        assert_eq!(
            builder.build("", "tech.xml").unwrap(),
            "http://example.com:8080/feeds/tech.xml"
        );
    }

    #[test]
    fn test_namespace_segment() {
        let builder = HostnameUrlBuilder::new("https://example.com").unwrap();
        assert_eq!(
            builder.build("tech", "episode.mp4").unwrap(),
            "https://example.com/tech/episode.mp4"
        );
    }

    #[test]
    fn test_filename_is_percent_encoded() {
        let builder = HostnameUrlBuilder::new("https://example.com").unwrap();
        assert_eq!(
            builder.build("", "a/b c.xml").unwrap(),
            "https://example.com/a%2Fb%20c.xml"
        );
    }

    #[test]
    fn test_invalid_hostnames() {
        assert!(HostnameUrlBuilder::new("not a url").is_err());
        assert!(HostnameUrlBuilder::new("mailto:me@example.com").is_err());
    }

    #[test]
    fn test_empty_filename_rejected() {
        let builder = HostnameUrlBuilder::new("https://example.com").unwrap();
        assert!(builder.build("", "").is_err());
    }
}
