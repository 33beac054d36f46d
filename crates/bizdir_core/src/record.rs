//! Directory records.

use crate::LogicalField;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One business-directory entry. Only non-null values are stored.
///
/// # Examples
///
/// ```
/// use bizdir_core::{LogicalField, Record};
///
/// let record = Record::default()
///     .with(LogicalField::Name, "Blue Bottle")
///     .with(LogicalField::City, "Oakland");
/// assert_eq!(record.get(LogicalField::City), Some("Oakland"));
/// assert_eq!(record.get(LogicalField::Phone), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    values: BTreeMap<LogicalField, String>,
}

impl Record {
    /// Sets a value, consuming and returning the record.
    pub fn with(mut self, field: LogicalField, value: impl Into<String>) -> Self {
        self.values.insert(field, value.into());
        self
    }

    /// Sets or clears a value.
    pub fn set(&mut self, field: LogicalField, value: Option<String>) {
        match value {
            Some(v) => {
                self.values.insert(field, v);
            }
            None => {
                self.values.remove(&field);
            }
        }
    }

    /// Value of `field`, or `None` when null or not selected.
    pub fn get(&self, field: LogicalField) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }
}
