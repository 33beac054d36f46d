//! Web surface for the bizdir directory browser.
//!
//! The server is a small axum application: a password gate in front of a
//! single browsing page, with per-browser sessions holding the filter values
//! and page position. Every database read runs on a blocking thread against
//! a query-only connection pool. When the database file is missing it is
//! downloaded once from the configured URL before the first page is served.

mod api;
mod auth;
mod bootstrap;
mod config;
mod render;
mod session;

pub use api::{AppState, create_router, serve};
pub use auth::PasswordGate;
pub use bootstrap::{BootstrapOutcome, download_database, ensure_database, partial_path};
pub use config::{DEFAULT_CONFIG_FILE, DirectoryConfig, DirectoryConfigBuilder, ENV_PREFIX};
pub use render::{ResultsPanel, directory_page, error_page, escape_html, group_thousands, login_page, pager_text};
pub use session::{
    SESSION_COOKIE, Session, SessionHandle, SessionStore, expired_cookie, session_cookie, session_id,
};
