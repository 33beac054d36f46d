//! First-run download of the directory database.

use bizdir_error::{BootstrapError, BootstrapErrorKind};
use futures_util::StreamExt;
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{info, instrument, warn};

/// What [`ensure_database`] found or did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// The file already existed
    Present,
    /// The file was downloaded
    Downloaded {
        /// Bytes written
        bytes: u64,
    },
}

/// Path the download is streamed to before it is renamed into place.
pub fn partial_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    path.with_file_name(name)
}

/// Downloads the database to `path` unless it already exists.
///
/// # Errors
///
/// Returns [`BootstrapErrorKind::MissingUrl`] when the file is absent and no
/// URL is configured, or the download error otherwise.
#[instrument(skip(progress), fields(path = %path.display()))]
pub async fn ensure_database(
    path: &Path,
    url: Option<&str>,
    timeout: Duration,
    progress: &ProgressBar,
) -> Result<BootstrapOutcome, BootstrapError> {
    if tokio::fs::try_exists(path).await.unwrap_or(false) {
        return Ok(BootstrapOutcome::Present);
    }
    let url = url.ok_or_else(|| BootstrapError::new(BootstrapErrorKind::MissingUrl))?;
    info!("Database file missing, downloading");
    let bytes = download_database(path, url, timeout, progress).await?;
    Ok(BootstrapOutcome::Downloaded { bytes })
}

/// Streams `url` into `path`, replacing any existing file only on success.
///
/// `timeout` bounds connecting and each read separately, so a slow but
/// steady transfer is never cut off.
///
/// # Errors
///
/// Returns a [`BootstrapError`] if the request fails, the server answers
/// with a non-success status, or the file cannot be written.
#[instrument(skip(progress), fields(path = %path.display()))]
pub async fn download_database(
    path: &Path,
    url: &str,
    timeout: Duration,
    progress: &ProgressBar,
) -> Result<u64, BootstrapError> {
    let partial = partial_path(path);
    let result = stream_to_file(&partial, url, timeout, progress).await;

    match result {
        Ok(bytes) => {
            tokio::fs::rename(&partial, path).await.map_err(|e| {
                BootstrapError::new(BootstrapErrorKind::Io(format!(
                    "Failed to move download into place: {}",
                    e
                )))
            })?;
            progress.finish_with_message("Database downloaded");
            info!(bytes, "Database downloaded");
            Ok(bytes)
        }
        Err(e) => {
            progress.abandon_with_message("Download failed");
            match tokio::fs::remove_file(&partial).await {
                Err(remove) if remove.kind() != std::io::ErrorKind::NotFound => {
                    warn!(error = %remove, "Failed to remove partial download");
                }
                _ => {}
            }
            Err(e)
        }
    }
}

async fn stream_to_file(
    partial: &Path,
    url: &str,
    timeout: Duration,
    progress: &ProgressBar,
) -> Result<u64, BootstrapError> {
    let request_error =
        |e: reqwest::Error| BootstrapError::new(BootstrapErrorKind::Request(e.to_string()));
    let io_error = |e: std::io::Error| BootstrapError::new(BootstrapErrorKind::Io(e.to_string()));

    // Bounds stalls, not the whole transfer.
    let client = reqwest::Client::builder()
        .connect_timeout(timeout)
        .read_timeout(timeout)
        .build()
        .map_err(request_error)?;
    let response = client.get(url).send().await.map_err(request_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(BootstrapError::new(BootstrapErrorKind::Status(status.as_u16())));
    }

    let total = response.content_length();
    if let Some(total) = total {
        progress.set_length(total);
    }

    let mut file = tokio::fs::File::create(partial).await.map_err(io_error)?;
    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;
    let mut logged_decile = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(request_error)?;
        file.write_all(&chunk).await.map_err(io_error)?;
        written += chunk.len() as u64;
        progress.set_position(written);

        if let Some(total) = total.filter(|t| *t > 0) {
            let decile = written.saturating_mul(10) / total;
            if decile > logged_decile {
                logged_decile = decile;
                info!(written, total, percent = decile * 10, "Download progress");
            }
        }
    }

    file.flush().await.map_err(io_error)?;
    file.sync_all().await.map_err(io_error)?;
    Ok(written)
}
