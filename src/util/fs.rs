use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::io::AsyncWriteExt;

/// Replaces `path` with `bytes` so readers see either the old or the new
/// content, never a partial write.
///
/// The data lands in a sibling temp file (created with `create_new`, so an
/// existing file or symlink at that name is never followed), is synced, and
/// is then renamed over `path`. The temp file is removed on any failure.
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let temp_path = temp_sibling(path);

    let result = write_synced(&temp_path, bytes).await;
    let result = match result {
        Ok(()) => tokio::fs::rename(&temp_path, path).await,
        Err(e) => Err(e),
    };

    if let Err(e) = &result {
        tracing::debug!(path = %temp_path.display(), error = %e, "Atomic write failed, removing temp file");
        let _ = tokio::fs::remove_file(&temp_path).await;
    }
    result
}

async fn write_synced(temp_path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(temp_path)
        .await?;
    file.write_all(bytes).await?;
    file.sync_all().await
}

/// `<path>.<pid>-<nanos>.tmp` in the same directory as `path`, so the final
/// rename never crosses a filesystem.
fn temp_sibling(path: &Path) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".{}-{:x}.tmp", std::process::id(), nanos));
    path.with_file_name(name)
}
