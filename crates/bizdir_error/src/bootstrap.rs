//! Bootstrap (first-run download) error types.

/// Kinds of bootstrap failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum BootstrapErrorKind {
    /// The database file is missing and no download URL is configured
    #[display("Database file is missing and no download URL is configured")]
    MissingUrl,
    /// The HTTP request could not be sent or the body could not be read
    #[display("Download request failed: {}", _0)]
    Request(String),
    /// The server answered with a non-success status
    #[display("Download failed with HTTP status {}", _0)]
    Status(u16),
    /// Writing the downloaded file failed
    #[display("I/O error while saving database: {}", _0)]
    Io(String),
}

/// Bootstrap error with location tracking.
///
/// # Examples
///
/// ```
/// use bizdir_error::{BootstrapError, BootstrapErrorKind};
///
/// let err = BootstrapError::new(BootstrapErrorKind::Status(404));
/// assert!(format!("{}", err).contains("404"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Bootstrap Error: {} at line {} in {}", kind, line, file)]
pub struct BootstrapError {
    /// The kind of error that occurred
    pub kind: BootstrapErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl BootstrapError {
    /// Create a new bootstrap error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: BootstrapErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
