//! Error types for the bizdir directory browser.
//!
//! Every error carries the file and line where it was raised. The three
//! failure classes a user can observe are:
//!
//! - [`SchemaError`]: the database has no usable working table or columns (fatal)
//! - [`QueryError`]: a single read failed (shown inline, the session continues)
//! - [`BootstrapError`]: the first-run download failed (fatal for that page load)

#![forbid(unsafe_code)]

mod bootstrap;
mod config;
mod query;
mod schema;
mod server;

pub use bootstrap::{BootstrapError, BootstrapErrorKind};
pub use config::{ConfigError, ConfigErrorKind};
pub use query::{QueryError, QueryErrorKind};
pub use schema::{SchemaError, SchemaErrorKind};
pub use server::{ServerError, ServerErrorKind};

/// Crate-level error variants.
#[derive(Debug, derive_more::From)]
pub enum BizdirErrorKind {
    /// Schema inspection error
    Schema(SchemaError),
    /// Query execution error
    Query(QueryError),
    /// First-run download error
    Bootstrap(BootstrapError),
    /// Configuration error
    Config(ConfigError),
    /// HTTP server error
    Server(ServerError),
}

impl std::fmt::Display for BizdirErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BizdirErrorKind::Schema(e) => write!(f, "{}", e),
            BizdirErrorKind::Query(e) => write!(f, "{}", e),
            BizdirErrorKind::Bootstrap(e) => write!(f, "{}", e),
            BizdirErrorKind::Config(e) => write!(f, "{}", e),
            BizdirErrorKind::Server(e) => write!(f, "{}", e),
        }
    }
}

/// Bizdir error with kind discrimination.
#[derive(Debug)]
pub struct BizdirError(Box<BizdirErrorKind>);

impl BizdirError {
    /// Create a new error from a kind.
    pub fn new(kind: BizdirErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &BizdirErrorKind {
        &self.0
    }

    /// Whether the error prevents any further browsing in this page load.
    pub fn is_fatal(&self) -> bool {
        matches!(
            *self.0,
            BizdirErrorKind::Schema(_) | BizdirErrorKind::Bootstrap(_)
        )
    }
}

impl std::fmt::Display for BizdirError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Bizdir Error: {}", self.0)
    }
}

impl std::error::Error for BizdirError {}

// Generic From implementation for any type that converts to BizdirErrorKind
impl<T> From<T> for BizdirError
where
    T: Into<BizdirErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for bizdir operations.
pub type BizdirResult<T> = std::result::Result<T, BizdirError>;

/// Result type for read queries.
pub type QueryResult<T> = std::result::Result<T, QueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_and_bootstrap_errors_are_fatal() {
        let schema: BizdirError =
            SchemaError::new(SchemaErrorKind::NoSelectableColumns("records".into())).into();
        let bootstrap: BizdirError = BootstrapError::new(BootstrapErrorKind::MissingUrl).into();
        let query: BizdirError =
            QueryError::new(QueryErrorKind::Execution("syntax error".into())).into();

        assert!(schema.is_fatal());
        assert!(bootstrap.is_fatal());
        assert!(!query.is_fatal());
    }

    #[test]
    fn test_no_working_table_lists_candidates() {
        let err = SchemaError::new(SchemaErrorKind::NoWorkingTable {
            candidates: vec!["records_norm".into(), "records".into()],
        });
        let msg = err.to_string();
        assert!(msg.contains("records_norm or records"));
        assert!(msg.contains("lib.rs"));
    }

    #[test]
    fn test_config_error_names_the_bad_value() {
        let err: BizdirError = ConfigError::new(ConfigErrorKind::InvalidBindAddr {
            addr: "nowhere".into(),
            reason: "invalid socket address syntax".into(),
        })
        .into();
        assert!(err.to_string().contains("Invalid bind address 'nowhere'"));
        assert!(!err.is_fatal());
    }
}
