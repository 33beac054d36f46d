//! Query error types.

/// Query error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryErrorKind {
    /// Opening the database file failed
    Connection(String),
    /// Checking a connection out of the pool failed
    Pool(String),
    /// Statement preparation or execution failed
    Execution(String),
    /// The blocking worker running the query did not complete
    Worker(String),
}

impl std::fmt::Display for QueryErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryErrorKind::Connection(msg) => write!(f, "Database connection error: {}", msg),
            QueryErrorKind::Pool(msg) => write!(f, "Connection pool error: {}", msg),
            QueryErrorKind::Execution(msg) => write!(f, "Database query error: {}", msg),
            QueryErrorKind::Worker(msg) => write!(f, "Query worker error: {}", msg),
        }
    }
}

/// Query error with source location tracking.
///
/// # Examples
///
/// ```
/// use bizdir_error::{QueryError, QueryErrorKind};
///
/// let err = QueryError::new(QueryErrorKind::Execution("no such column: city".into()));
/// assert!(format!("{}", err).contains("no such column"));
/// ```
#[derive(Debug, Clone)]
pub struct QueryError {
    /// The kind of error that occurred
    pub kind: QueryErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl QueryError {
    /// Create a new QueryError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: QueryErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Query Error: {} at line {} in {}",
            self.kind, self.line, self.file
        )
    }
}

impl std::error::Error for QueryError {}

// Diesel error conversions (only available with database feature)
#[cfg(feature = "database")]
impl From<diesel::result::Error> for QueryError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        QueryError::new(QueryErrorKind::Execution(err.to_string()))
    }
}

#[cfg(feature = "database")]
impl From<diesel::ConnectionError> for QueryError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        QueryError::new(QueryErrorKind::Connection(err.to_string()))
    }
}

#[cfg(feature = "database")]
impl From<diesel::r2d2::PoolError> for QueryError {
    #[track_caller]
    fn from(err: diesel::r2d2::PoolError) -> Self {
        QueryError::new(QueryErrorKind::Pool(err.to_string()))
    }
}
