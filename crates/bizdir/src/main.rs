//! bizdir - password-gated browser for a SQLite business directory.

mod cli;

use clap::Parser;
use cli::{Cli, Commands, handle_fetch_command, handle_inspect_command, handle_serve_command};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config, bind } => handle_serve_command(config, bind).await?,
        Commands::Fetch { config, force } => handle_fetch_command(config, force).await?,
        Commands::Inspect { config } => {
            tokio::task::spawn_blocking(move || handle_inspect_command(config)).await??
        }
    }

    Ok(())
}
