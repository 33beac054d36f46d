//! Database download command handler.

use bizdir_error::{BizdirResult, BootstrapError, BootstrapErrorKind};
use bizdir_server::{BootstrapOutcome, DirectoryConfig, download_database, ensure_database};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

fn progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.enable_steady_tick(Duration::from_millis(200));
    match ProgressStyle::with_template(
        ":: Download: [{bar:40}] {bytes}/{total_bytes} :: {bytes_per_sec} :: [{elapsed_precise}] {msg}",
    ) {
        Ok(style) => pb.set_style(style.progress_chars("#>-")),
        Err(e) => tracing::debug!(error = %e, "Falling back to default progress style"),
    }
    pb
}

/// Handle the `fetch` command.
///
/// Without `force` an existing file is kept; with it the file is downloaded
/// again and replaced once the download completes.
#[tracing::instrument(skip_all, fields(force = force))]
pub async fn handle_fetch_command(config_path: Option<PathBuf>, force: bool) -> BizdirResult<()> {
    let config = DirectoryConfig::load(config_path.as_deref())?;
    let path = config.db_path();
    let timeout = *config.download_timeout();
    let pb = progress_bar();

    let outcome = if force {
        let url = config
            .db_url()
            .as_deref()
            .ok_or_else(|| BootstrapError::new(BootstrapErrorKind::MissingUrl))?;
        let bytes = download_database(path, url, timeout, &pb).await?;
        BootstrapOutcome::Downloaded { bytes }
    } else {
        ensure_database(path, config.db_url().as_deref(), timeout, &pb).await?
    };

    match outcome {
        BootstrapOutcome::Present => {
            pb.finish_and_clear();
            println!("{} already exists; use --force to download again", path.display());
        }
        BootstrapOutcome::Downloaded { bytes } => {
            println!("Downloaded {} bytes to {}", bytes, path.display());
        }
    }
    Ok(())
}
