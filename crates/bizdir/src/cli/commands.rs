//! Command-line argument definitions.

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Password-gated browser for a SQLite business directory.
#[derive(Parser, Debug)]
#[command(name = "bizdir")]
#[command(about = "Browse, filter and export a SQLite business directory")]
#[command(version)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the web server
    Serve {
        /// Configuration file (defaults to bizdir.toml when present)
        #[arg(short, long, env = "BIZDIR_CONFIG")]
        config: Option<PathBuf>,

        /// Address to listen on, overriding the configuration
        #[arg(short, long)]
        bind: Option<SocketAddr>,
    },

    /// Download the database file from the configured URL
    Fetch {
        /// Configuration file (defaults to bizdir.toml when present)
        #[arg(short, long, env = "BIZDIR_CONFIG")]
        config: Option<PathBuf>,

        /// Download even if the file already exists
        #[arg(long)]
        force: bool,
    },

    /// Print the working table and the columns chosen for each field
    Inspect {
        /// Configuration file (defaults to bizdir.toml when present)
        #[arg(short, long, env = "BIZDIR_CONFIG")]
        config: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_arguments() {
        let cli = Cli::try_parse_from(["bizdir", "serve", "--bind", "0.0.0.0:9000"]).unwrap();
        match cli.command {
            Commands::Serve { bind, .. } => assert_eq!(bind.map(|b| b.port()), Some(9000)),
            other => panic!("Unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_fetch_force_flag() {
        let cli = Cli::try_parse_from(["bizdir", "fetch", "--force", "-c", "alt.toml"]).unwrap();
        match cli.command {
            Commands::Fetch { force, config } => {
                assert!(force);
                assert_eq!(config, Some(PathBuf::from("alt.toml")));
            }
            other => panic!("Unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_bind_address_is_rejected() {
        assert!(Cli::try_parse_from(["bizdir", "serve", "--bind", "nowhere"]).is_err());
    }
}
