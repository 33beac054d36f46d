//! Row shapes loaded by raw SQL queries.

use bizdir_core::{LogicalField, Record};
use diesel::QueryableByName;
use diesel::sql_types::{BigInt, Nullable, Text};

/// A directory row. Every logical field is selected under its alias, with
/// `NULL` standing in for fields the schema does not have.
#[derive(Debug, QueryableByName)]
pub(crate) struct RecordRow {
    #[diesel(sql_type = Nullable<Text>)]
    name: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    phone: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    address: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    city: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    state: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    postal_code: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    country: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    map_link: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    website: Option<String>,
}

impl From<RecordRow> for Record {
    fn from(row: RecordRow) -> Self {
        let mut record = Record::default();
        record.set(LogicalField::Name, row.name);
        record.set(LogicalField::Phone, row.phone);
        record.set(LogicalField::Address, row.address);
        record.set(LogicalField::City, row.city);
        record.set(LogicalField::State, row.state);
        record.set(LogicalField::PostalCode, row.postal_code);
        record.set(LogicalField::Country, row.country);
        record.set(LogicalField::MapLink, row.map_link);
        record.set(LogicalField::Website, row.website);
        record
    }
}

#[derive(Debug, QueryableByName)]
pub(crate) struct CountRow {
    #[diesel(sql_type = BigInt)]
    pub count: i64,
}

#[derive(Debug, QueryableByName)]
pub(crate) struct NameRow {
    #[diesel(sql_type = Text)]
    pub name: String,
}

#[derive(Debug, QueryableByName)]
pub(crate) struct ValueRow {
    #[diesel(sql_type = Text)]
    pub value: String,
}

#[derive(Debug, QueryableByName)]
pub(crate) struct RowidRow {
    #[diesel(sql_type = BigInt)]
    #[allow(dead_code)]
    pub rowid: i64,
}
