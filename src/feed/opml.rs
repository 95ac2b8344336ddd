use anyhow::{Context, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use super::{FeedLookup, UrlBuilder};
use crate::config::FeedConfig;
use crate::util::write_atomic;

/// Title written into the `<head>` of every exported document.
pub const OPML_TITLE: &str = "tubecast feeds";

/// Namespace passed to the URL builder; feed XML lives at the server root.
const FEED_NAMESPACE: &str = "";

/// Errors that abort an OPML export. No partial document is ever returned.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The feed lookup collaborator failed for this entry.
    #[error("failed to look up feed {feed_id:?}")]
    FeedLookupFailed {
        feed_id: String,
        #[source]
        source: anyhow::Error,
    },

    /// The download URL for this entry could not be built.
    #[error("failed to get feed URL for {feed_id:?}")]
    UrlBuildFailed {
        feed_id: String,
        #[source]
        source: anyhow::Error,
    },

    /// Writing the XML document failed.
    #[error("failed to marshal OPML")]
    SerializationFailed(#[source] anyhow::Error),

    /// The cancellation token fired, either between entries or while a
    /// collaborator call was in flight.
    #[error("OPML export cancelled")]
    Cancelled,
}

/// One `<outline>` node of the exported document.
#[derive(Debug, Clone)]
struct Outline {
    title: String,
    text: String,
    xml_url: String,
}

/// Exports the configured feeds as an OPML document.
///
/// Entries are visited in the given order. Each entry's record is looked up
/// first; entries whose `opml` flag is off are then skipped, the rest get a
/// download URL for `<id>.xml` and become one flat `<outline type="rss">`.
/// Collaborator calls are made one at a time, never concurrently.
///
/// # Errors
///
/// The first failure aborts the export, before any further collaborator
/// call is made:
///
/// - [`ExportError::Cancelled`] if `cancel` fired before an entry was started,
///   or a collaborator failed after it fired
/// - [`ExportError::FeedLookupFailed`] if a record cannot be loaded
/// - [`ExportError::UrlBuildFailed`] if a download URL cannot be built
/// - [`ExportError::SerializationFailed`] if the XML cannot be written
pub async fn export_outline<L, B>(
    cancel: &CancellationToken,
    entries: &[FeedConfig],
    lookup: &L,
    urls: &B,
) -> Result<String, ExportError>
where
    L: FeedLookup + ?Sized,
    B: UrlBuilder + ?Sized,
{
    let mut outlines = Vec::new();

    for entry in entries {
        if cancel.is_cancelled() {
            return Err(ExportError::Cancelled);
        }

        let record = lookup
            .get_feed(cancel, &entry.id)
            .await
            .map_err(|source| {
                if cancel.is_cancelled() {
                    ExportError::Cancelled
                } else {
                    ExportError::FeedLookupFailed {
                        feed_id: entry.id.clone(),
                        source,
                    }
                }
            })?;

        if !entry.opml {
            tracing::debug!(feed_id = %entry.id, "Feed not flagged for OPML, skipping");
            continue;
        }

        let filename = format!("{}.xml", entry.id);
        let xml_url = urls
            .download_url(cancel, FEED_NAMESPACE, &filename)
            .await
            .map_err(|source| {
                if cancel.is_cancelled() {
                    ExportError::Cancelled
                } else {
                    ExportError::UrlBuildFailed {
                        feed_id: entry.id.clone(),
                        source,
                    }
                }
            })?;

        outlines.push(Outline {
            title: record.title,
            text: record.description,
            xml_url,
        });
    }

    let document = write_document(&outlines).map_err(ExportError::SerializationFailed)?;

    tracing::info!(
        entries = entries.len(),
        outlines = outlines.len(),
        "Exported OPML"
    );

    Ok(document)
}

/// Serializes the outlines as an OPML 1.0 document.
fn write_document(outlines: &[Outline]) -> Result<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .context("Failed to write XML declaration")?;

    let mut opml = BytesStart::new("opml");
    opml.push_attribute(("version", "1.0"));
    writer
        .write_event(Event::Start(opml))
        .context("Failed to write opml element")?;

    writer
        .write_event(Event::Start(BytesStart::new("head")))
        .context("Failed to write head element")?;
    writer
        .write_event(Event::Start(BytesStart::new("title")))
        .context("Failed to write title element")?;
    writer
        .write_event(Event::Text(BytesText::new(OPML_TITLE)))
        .context("Failed to write title text")?;
    writer
        .write_event(Event::End(BytesEnd::new("title")))
        .context("Failed to write title end")?;
    writer
        .write_event(Event::End(BytesEnd::new("head")))
        .context("Failed to write head end")?;

    writer
        .write_event(Event::Start(BytesStart::new("body")))
        .context("Failed to write body element")?;

    for outline in outlines {
        let mut node = BytesStart::new("outline");
        node.push_attribute(("text", outline.text.as_str()));
        node.push_attribute(("title", outline.title.as_str()));
        node.push_attribute(("type", "rss"));
        node.push_attribute(("xmlUrl", outline.xml_url.as_str()));
        writer
            .write_event(Event::Empty(node))
            .context("Failed to write outline element")?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("body")))
        .context("Failed to write body end")?;
    writer
        .write_event(Event::End(BytesEnd::new("opml")))
        .context("Failed to write opml end")?;

    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).context("Generated OPML contains invalid UTF-8")
}

/// Writes an exported OPML document to `path`.
///
/// The file is replaced atomically: a reader sees either the previous
/// export or this one.
pub async fn export_to_file(content: &str, path: &Path) -> Result<()> {
    write_atomic(path, content.as_bytes())
        .await
        .with_context(|| format!("Failed to write OPML to '{}'", path.display()))?;

    tracing::info!(path = %path.display(), bytes = content.len(), "Wrote OPML export");
    Ok(())
}
