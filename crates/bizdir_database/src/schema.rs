//! Schema inspection of the directory database.

use crate::models::{NameRow, RowidRow};
use crate::quote_ident;
use bizdir_core::{SchemaDescriptor, choose_working_table};
use bizdir_error::{SchemaError, SchemaErrorKind};
use diesel::prelude::*;
use diesel::sql_types::Text;
use tracing::{debug, info, instrument};

fn inspection_error(e: diesel::result::Error) -> SchemaError {
    tracing::error!(error = %e, "Catalog query failed");
    SchemaError::new(SchemaErrorKind::Inspection(e.to_string()))
}

/// Names of all ordinary tables in the database.
#[instrument(name = "database.list_tables", skip(conn))]
pub fn list_tables(conn: &mut SqliteConnection) -> Result<Vec<String>, SchemaError> {
    let rows: Vec<NameRow> =
        diesel::sql_query("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .load(conn)
            .map_err(inspection_error)?;
    Ok(rows.into_iter().map(|r| r.name).collect())
}

/// Column names of `table`.
#[instrument(name = "database.table_columns", skip(conn))]
pub fn table_columns(conn: &mut SqliteConnection, table: &str) -> Result<Vec<String>, SchemaError> {
    let rows: Vec<NameRow> = diesel::sql_query("SELECT name FROM pragma_table_info(?)")
        .bind::<Text, _>(table)
        .load(conn)
        .map_err(inspection_error)?;
    Ok(rows.into_iter().map(|r| r.name).collect())
}

/// Whether `table` exposes an implicit `rowid` (false for WITHOUT ROWID tables).
fn has_rowid(conn: &mut SqliteConnection, table: &str) -> bool {
    let check = format!("SELECT rowid FROM {} LIMIT 0", quote_ident(table));
    diesel::sql_query(check).load::<RowidRow>(conn).is_ok()
}

/// Inspect the database and build the schema descriptor for the working table.
///
/// # Errors
///
/// Returns a [`SchemaError`] if neither `records_norm` nor `records` exists,
/// if the working table has none of the expected columns, or if the catalog
/// cannot be read.
#[instrument(name = "database.inspect_schema", skip(conn))]
pub fn inspect_schema(conn: &mut SqliteConnection) -> Result<SchemaDescriptor, SchemaError> {
    let tables = list_tables(conn)?;
    debug!(table_count = tables.len(), "Listed tables");

    let table = choose_working_table(&tables)?;
    let columns = table_columns(conn, table)?;
    let rowid = has_rowid(conn, table);

    let schema = SchemaDescriptor::new(table, columns, rowid)?;
    info!(
        table = schema.table(),
        fields = ?schema.selected().collect::<Vec<_>>(),
        has_rowid = rowid,
        "Resolved directory schema"
    );
    Ok(schema)
}
