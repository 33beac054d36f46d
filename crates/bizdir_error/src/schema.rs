//! Schema error types.

/// Reasons the database cannot be browsed at all.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum SchemaErrorKind {
    /// None of the candidate working tables exist
    #[display("No {} table found in the database", candidates.join(" or "))]
    NoWorkingTable {
        /// Table names that were looked for, in preference order
        candidates: Vec<String>,
    },
    /// The working table has none of the expected columns
    #[display("No expected columns found in table '{}'", _0)]
    NoSelectableColumns(String),
    /// Reading the catalog itself failed
    #[display("Schema inspection failed: {}", _0)]
    Inspection(String),
}

/// Schema error with location tracking.
///
/// # Examples
///
/// ```
/// use bizdir_error::{SchemaError, SchemaErrorKind};
///
/// let err = SchemaError::new(SchemaErrorKind::NoSelectableColumns("records".into()));
/// assert!(format!("{}", err).contains("No expected columns"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Schema Error: {} at line {} in {}", kind, line, file)]
pub struct SchemaError {
    /// The kind of error that occurred
    pub kind: SchemaErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl SchemaError {
    /// Create a new schema error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SchemaErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
