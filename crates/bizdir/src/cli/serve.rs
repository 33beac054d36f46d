//! Web server command handler.

use bizdir_error::BizdirResult;
use bizdir_server::DirectoryConfig;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Handle the `serve` command.
#[tracing::instrument(skip_all)]
pub async fn handle_serve_command(
    config_path: Option<PathBuf>,
    bind: Option<SocketAddr>,
) -> BizdirResult<()> {
    let mut config = DirectoryConfig::load(config_path.as_deref())?;
    if let Some(bind) = bind {
        config.set_bind_addr(bind);
    }

    tracing::info!(
        bind_addr = %config.bind_addr(),
        db_path = %config.db_path().display(),
        "Starting directory server"
    );
    bizdir_server::serve(config).await?;
    Ok(())
}
