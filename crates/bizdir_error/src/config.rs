//! Configuration error types.

/// Ways the server configuration can be unusable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ConfigErrorKind {
    /// A source could not be read or did not deserialize
    #[display("Failed to load configuration: {}", _0)]
    Load(String),
    /// `bind_addr` is not a socket address
    #[display("Invalid bind address '{}': {}", addr, reason)]
    InvalidBindAddr {
        /// The rejected value
        addr: String,
        /// Why it was rejected
        reason: String,
    },
    /// `pool_size` is zero
    #[display("pool_size must be at least 1")]
    PoolSize,
}

/// Configuration error with location tracking.
///
/// # Examples
///
/// ```
/// use bizdir_error::{ConfigError, ConfigErrorKind};
///
/// let err = ConfigError::new(ConfigErrorKind::PoolSize);
/// assert!(err.to_string().contains("pool_size"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", kind, line, file)]
pub struct ConfigError {
    /// The kind of error that occurred
    pub kind: ConfigErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new configuration error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ConfigErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
