//! Typed description of the working table.

use crate::LogicalField;
use bizdir_error::{SchemaError, SchemaErrorKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Candidate working tables, most preferred first.
pub const WORKING_TABLE_CANDIDATES: [&str; 2] = ["records_norm", "records"];

/// Picks the working table from the tables present in a database.
///
/// # Errors
///
/// Returns [`SchemaErrorKind::NoWorkingTable`] when none of
/// [`WORKING_TABLE_CANDIDATES`] is present.
pub fn choose_working_table<S: AsRef<str>>(tables: &[S]) -> Result<&'static str, SchemaError> {
    WORKING_TABLE_CANDIDATES
        .into_iter()
        .find(|candidate| tables.iter().any(|t| t.as_ref() == *candidate))
        .ok_or_else(|| {
            SchemaError::new(SchemaErrorKind::NoWorkingTable {
                candidates: WORKING_TABLE_CANDIDATES
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            })
        })
}

/// Column set of the working table together with the physical column chosen
/// for every logical field.
///
/// Built once from the live database file and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    table: String,
    columns: BTreeSet<String>,
    resolved: BTreeMap<LogicalField, String>,
    has_rowid: bool,
}

impl SchemaDescriptor {
    /// Resolves every logical field against `columns`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaErrorKind::NoSelectableColumns`] if no logical field
    /// resolves, since there would be nothing to display.
    pub fn new<I, S>(table: impl Into<String>, columns: I, has_rowid: bool) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let table = table.into();
        let columns: BTreeSet<String> = columns.into_iter().map(Into::into).collect();

        let resolved: BTreeMap<LogicalField, String> = LogicalField::all()
            .filter_map(|field| {
                field
                    .candidates()
                    .iter()
                    .find(|c| columns.contains(**c))
                    .map(|c| (field, c.to_string()))
            })
            .collect();

        if resolved.is_empty() {
            return Err(SchemaError::new(SchemaErrorKind::NoSelectableColumns(
                table,
            )));
        }

        Ok(Self {
            table,
            columns,
            resolved,
            has_rowid,
        })
    }

    /// Name of the working table.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Whether the working table has an implicit `rowid`.
    pub fn has_rowid(&self) -> bool {
        self.has_rowid
    }

    /// Whether `name` is a physical column of the working table.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains(name)
    }

    /// Physical column backing `field`, if any candidate exists.
    pub fn resolve(&self, field: LogicalField) -> Option<&str> {
        self.resolved.get(&field).map(String::as_str)
    }

    /// Physical columns present, in name order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    /// Resolved fields in display order with their physical columns.
    pub fn selected(&self) -> impl Iterator<Item = (LogicalField, &str)> {
        self.resolved.iter().map(|(f, c)| (*f, c.as_str()))
    }

    /// Resolved fields in display order.
    pub fn selected_fields(&self) -> Vec<LogicalField> {
        self.resolved.keys().copied().collect()
    }

    /// Present name columns, normalized first, for ordering.
    pub fn name_columns(&self) -> Vec<&str> {
        LogicalField::Name
            .candidates()
            .iter()
            .copied()
            .filter(|c| self.has_column(c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_records_norm() {
        assert_eq!(
            choose_working_table(&["records", "records_norm", "other"]).unwrap(),
            "records_norm"
        );
        assert_eq!(choose_working_table(&["records"]).unwrap(), "records");
    }

    #[test]
    fn test_missing_working_table() {
        let err = choose_working_table(&["businesses"]).unwrap_err();
        assert!(matches!(err.kind, SchemaErrorKind::NoWorkingTable { .. }));
    }

    #[test]
    fn test_normalized_column_wins() {
        let schema =
            SchemaDescriptor::new("records", ["name", "name_std", "state", "postal_code"], true)
                .unwrap();
        assert_eq!(schema.resolve(LogicalField::Name), Some("name_std"));
        assert_eq!(schema.resolve(LogicalField::State), Some("state"));
        assert_eq!(schema.resolve(LogicalField::PostalCode), Some("postal_code"));
        assert_eq!(schema.resolve(LogicalField::City), None);
        assert_eq!(schema.name_columns(), vec!["name_std", "name"]);
    }

    #[test]
    fn test_selected_follows_display_order() {
        let schema = SchemaDescriptor::new("records", ["site", "city", "name"], false).unwrap();
        assert_eq!(
            schema.selected_fields(),
            vec![LogicalField::Name, LogicalField::City, LogicalField::Website]
        );
        assert!(!schema.has_rowid());
    }

    #[test]
    fn test_no_selectable_columns() {
        let err = SchemaDescriptor::new("records", ["id", "lat", "lng"], true).unwrap_err();
        assert_eq!(
            err.kind,
            SchemaErrorKind::NoSelectableColumns("records".into())
        );
    }
}
