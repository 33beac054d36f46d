//! Core data types for the bizdir directory browser.
//!
//! This crate holds everything that can be reasoned about without a database:
//! the logical field preference table, the schema descriptor, filter values,
//! pagination state, records and their display formatting.

mod display;
mod field;
mod filter;
mod page;
mod record;
mod schema;

pub use display::{DisplayCell, DisplayTable, link_target};
pub use field::{KEYWORD_FIELDS, LogicalField};
pub use filter::{ANY_OPTION, FilterSet};
pub use page::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, MIN_PAGE_SIZE, PageState, PageWindow};
pub use record::Record;
pub use schema::{SchemaDescriptor, WORKING_TABLE_CANDIDATES, choose_working_table};
