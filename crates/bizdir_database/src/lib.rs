//! Read-only SQLite access for the bizdir directory browser.
//!
//! The pieces compose bottom-up: a query-only connection pool, schema
//! inspection, the filter builder, the record query view, the executor and
//! finally [`Directory`], which the web layer calls once per interaction.
//! CSV export formatting lives here as well.

mod connection;
mod directory;
mod executor;
mod export;
mod filter;
mod models;
mod query_view;
mod schema;

pub use connection::{DirectoryPool, create_pool, establish_connection};
pub use directory::{Directory, DirectoryPage, FilterOptions, Kpis};
pub use executor::TableQueryExecutor;
pub use export::{FULL_EXPORT_FILENAME, format_as_csv, page_csv, page_export_filename, records_csv};
pub use filter::{FilterClause, build_filter, quote_ident};
pub use query_view::{RecordQuery, RecordQueryBuilder, order_expression};
pub use schema::{inspect_schema, list_tables, table_columns};
