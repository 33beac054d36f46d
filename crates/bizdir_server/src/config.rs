//! Layered configuration for the directory server.
//!
//! Sources, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. a TOML file (`bizdir.toml` unless another path is given)
//! 3. `BIZDIR_*` environment variables, e.g. `BIZDIR_BIND_ADDR`
//! 4. `APP_PASSWORD` and `DB_URL`

use crate::PasswordGate;
use bizdir_core::PageState;
use bizdir_error::{ConfigError, ConfigErrorKind};
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File, FileFormat};
use derive_getters::Getters;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Config file read when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "bizdir.toml";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "BIZDIR";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8501";
const DEFAULT_DB_PATH: &str = "data.db";

/// Values as they come out of the layered sources.
#[derive(Debug, Deserialize)]
struct RawConfig {
    bind_addr: String,
    db_path: PathBuf,
    db_url: Option<String>,
    password: String,
    default_page_size: u32,
    download_timeout_secs: u64,
    session_idle_minutes: u64,
    pool_size: u32,
}

/// Server configuration with the secret already reduced to a digest.
#[derive(Debug, Clone, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct DirectoryConfig {
    /// Socket address to listen on
    #[builder(default = "SocketAddr::from(([127, 0, 0, 1], 8501))")]
    bind_addr: SocketAddr,
    /// Local path of the SQLite file
    #[builder(default = "PathBuf::from(DEFAULT_DB_PATH)")]
    db_path: PathBuf,
    /// Where to download the file from when it is missing
    #[builder(default, setter(strip_option))]
    db_url: Option<String>,
    /// Access gate built from the configured secret
    #[builder(default = "PasswordGate::new(\"\")")]
    gate: PasswordGate,
    /// Rows per page for new sessions, clamped to the allowed range
    #[builder(default = "bizdir_core::DEFAULT_PAGE_SIZE")]
    default_page_size: u32,
    /// Connect timeout and per-read timeout of the bootstrap download
    #[builder(default = "Duration::from_secs(120)")]
    download_timeout: Duration,
    /// Idle time after which a session is forgotten
    #[builder(default = "Duration::from_secs(120 * 60)")]
    session_idle: Duration,
    /// Maximum pooled SQLite connections
    #[builder(default = "4")]
    pool_size: u32,
}

fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
    builder
        .set_default("bind_addr", DEFAULT_BIND_ADDR)?
        .set_default("db_path", DEFAULT_DB_PATH)?
        .set_default("password", "")?
        .set_default("default_page_size", i64::from(bizdir_core::DEFAULT_PAGE_SIZE))?
        .set_default("download_timeout_secs", 120_i64)?
        .set_default("session_idle_minutes", 120_i64)?
        .set_default("pool_size", 4_i64)
}

fn load_error(err: config::ConfigError) -> ConfigError {
    ConfigError::new(ConfigErrorKind::Load(err.to_string()))
}

impl DirectoryConfig {
    /// Loads configuration from every layer.
    ///
    /// A missing file is only an error when `path` was given explicitly.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a source cannot be read or a value
    /// fails validation.
    #[instrument(name = "config.load")]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        let required = path.is_some();

        let raw = with_defaults(config::Config::builder())
            .and_then(|builder| {
                builder
                    .add_source(File::from(file).required(required))
                    .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
                    .set_override_option("password", std::env::var("APP_PASSWORD").ok())?
                    .set_override_option("db_url", std::env::var("DB_URL").ok())?
                    .build()
            })
            .and_then(|settings| settings.try_deserialize::<RawConfig>())
            .map_err(load_error)?;

        Self::from_raw(raw)
    }

    /// Builds configuration from defaults plus a TOML document, ignoring the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the document is invalid.
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let raw = with_defaults(config::Config::builder())
            .and_then(|builder| builder.add_source(File::from_str(toml, FileFormat::Toml)).build())
            .and_then(|settings| settings.try_deserialize::<RawConfig>())
            .map_err(load_error)?;

        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let bind_addr: SocketAddr = raw.bind_addr.parse().map_err(|e: std::net::AddrParseError| {
            ConfigError::new(ConfigErrorKind::InvalidBindAddr {
                addr: raw.bind_addr.clone(),
                reason: e.to_string(),
            })
        })?;
        if raw.pool_size == 0 {
            return Err(ConfigError::new(ConfigErrorKind::PoolSize));
        }
        if raw.password.is_empty() {
            warn!("No password configured; an empty password unlocks the directory");
        }

        let gate = PasswordGate::new(&raw.password);
        let db_url = raw.db_url.filter(|url| !url.trim().is_empty());
        let default_page_size = PageState::new(raw.default_page_size).page_size();
        debug!(%bind_addr, db_path = %raw.db_path.display(), has_url = db_url.is_some(), "Configuration resolved");

        Ok(Self {
            bind_addr,
            db_path: raw.db_path,
            db_url,
            gate,
            default_page_size,
            download_timeout: Duration::from_secs(raw.download_timeout_secs),
            session_idle: Duration::from_secs(raw.session_idle_minutes.saturating_mul(60)),
            pool_size: raw.pool_size,
        })
    }

    /// Replaces the listening address.
    pub fn set_bind_addr(&mut self, bind_addr: SocketAddr) {
        self.bind_addr = bind_addr;
    }
}
