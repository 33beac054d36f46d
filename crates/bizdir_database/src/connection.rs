//! Database connection utilities.

use bizdir_error::{QueryError, QueryErrorKind, QueryResult};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use std::path::Path;
use std::time::Duration;
use tracing::instrument;

/// Pool of read-only SQLite connections to the directory file.
pub type DirectoryPool = Pool<ConnectionManager<SqliteConnection>>;

/// Pragmas applied to every pooled connection.
const CONNECTION_PRAGMAS: &str = "PRAGMA query_only = ON; PRAGMA busy_timeout = 5000;";

/// Marks every connection handed out by the pool as query-only.
#[derive(Debug, Clone, Copy)]
struct QueryOnly;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for QueryOnly {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(CONNECTION_PRAGMAS)
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

fn database_url(path: &Path) -> QueryResult<String> {
    if !path.is_file() {
        tracing::error!(path = %path.display(), "Database file not found");
        return Err(QueryError::new(QueryErrorKind::Connection(format!(
            "database file not found: {}",
            path.display()
        ))));
    }
    Ok(path.to_string_lossy().into_owned())
}

/// Open a single query-only connection to the database file.
///
/// # Errors
///
/// Returns an error if:
/// - the file does not exist (SQLite would otherwise create it)
/// - SQLite cannot open the file
#[instrument(name = "database.establish_connection", fields(path = %path.display()))]
pub fn establish_connection(path: &Path) -> QueryResult<SqliteConnection> {
    let url = database_url(path)?;
    tracing::debug!("Opening SQLite database");
    let mut conn = SqliteConnection::establish(&url).map_err(|e| {
        tracing::error!(error = %e, "Failed to open database");
        QueryError::from(e)
    })?;
    conn.batch_execute(CONNECTION_PRAGMAS)?;
    Ok(conn)
}

/// Create a connection pool for the database file.
///
/// # Errors
///
/// Returns an error if:
/// - the file does not exist
/// - pool creation fails
#[instrument(name = "database.create_pool", fields(path = %path.display()))]
pub fn create_pool(path: &Path, max_size: u32) -> QueryResult<DirectoryPool> {
    let url = database_url(path)?;

    tracing::debug!(max_size, "Creating SQLite connection pool");
    let manager = ConnectionManager::<SqliteConnection>::new(url);

    Pool::builder()
        .max_size(max_size.max(1))
        .connection_timeout(Duration::from_secs(5))
        .connection_customizer(Box::new(QueryOnly))
        .build(manager)
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to create connection pool");
            QueryError::new(QueryErrorKind::Pool(e.to_string()))
        })
}
