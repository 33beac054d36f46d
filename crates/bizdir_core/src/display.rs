//! Display formatting of fetched records.
//!
//! Pure transformation: the records themselves are never modified.

use crate::{LogicalField, Record, SchemaDescriptor};
use serde::Serialize;
use std::borrow::Cow;

/// Returns the value when it is an `http://` or `https://` URL.
///
/// # Examples
///
/// ```
/// use bizdir_core::link_target;
///
/// assert_eq!(link_target(Some("https://x.com")), Some("https://x.com"));
/// assert_eq!(link_target(Some("ftp://x.com")), None);
/// assert_eq!(link_target(None), None);
/// ```
pub fn link_target(value: Option<&str>) -> Option<&str> {
    value.filter(|v| v.starts_with("http://") || v.starts_with("https://"))
}

/// A single formatted table cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum DisplayCell {
    /// Plain value
    Text(String),
    /// Actionable link to the contained URL, labelled [`DisplayCell::LINK_LABEL`]
    Link(String),
    /// Null value, or a URL field whose value is not an http(s) URL
    Empty,
}

impl DisplayCell {
    /// Label shown for link cells.
    pub const LINK_LABEL: &'static str = "Open";

    /// Formats one field value.
    pub fn format(field: LogicalField, value: Option<&str>) -> Self {
        if field.is_link() {
            return link_target(value)
                .map(|url| DisplayCell::Link(url.to_string()))
                .unwrap_or(DisplayCell::Empty);
        }
        value
            .map(|v| DisplayCell::Text(v.to_string()))
            .unwrap_or(DisplayCell::Empty)
    }

    /// Cell text as written to a page export: link cells keep their markup.
    pub fn export_text(&self) -> Cow<'_, str> {
        match self {
            DisplayCell::Text(text) => Cow::Borrowed(text),
            DisplayCell::Link(url) => Cow::Owned(format!(
                r#"<a href="{}" target="_blank">{}</a>"#,
                url,
                Self::LINK_LABEL
            )),
            DisplayCell::Empty => Cow::Borrowed(""),
        }
    }
}

/// A fetched page formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayTable {
    fields: Vec<LogicalField>,
    rows: Vec<Vec<DisplayCell>>,
}

impl DisplayTable {
    /// Formats `records` using the fields the schema selects.
    pub fn new(schema: &SchemaDescriptor, records: &[Record]) -> Self {
        let fields = schema.selected_fields();
        let rows = records
            .iter()
            .map(|record| {
                fields
                    .iter()
                    .map(|field| DisplayCell::format(*field, record.get(*field)))
                    .collect()
            })
            .collect();
        Self { fields, rows }
    }

    /// Displayed fields in column order.
    pub fn fields(&self) -> &[LogicalField] {
        &self.fields
    }

    /// Column headers.
    pub fn headers(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.label()).collect()
    }

    /// Formatted rows.
    pub fn rows(&self) -> &[Vec<DisplayCell>] {
        &self.rows
    }

    /// Whether there are no rows to show.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> SchemaDescriptor {
        SchemaDescriptor::new("records", ["name", "city", "location_link", "site"], true).unwrap()
    }

    #[test]
    fn test_only_http_schemes_become_links() {
        assert_eq!(
            DisplayCell::format(LogicalField::Website, Some("ftp://x.com")),
            DisplayCell::Empty
        );
        assert_eq!(
            DisplayCell::format(LogicalField::Website, Some("www.x.com")),
            DisplayCell::Empty
        );
        assert_eq!(
            DisplayCell::format(LogicalField::MapLink, Some("http://maps.example/1")),
            DisplayCell::Link("http://maps.example/1".into())
        );
        assert_eq!(
            DisplayCell::format(LogicalField::MapLink, None),
            DisplayCell::Empty
        );
    }

    #[test]
    fn test_plain_fields_pass_through() {
        assert_eq!(
            DisplayCell::format(LogicalField::City, Some("https://not-a-link-field")),
            DisplayCell::Text("https://not-a-link-field".into())
        );
        assert_eq!(DisplayCell::format(LogicalField::City, None), DisplayCell::Empty);
    }

    #[test]
    fn test_table_uses_selected_columns() {
        let records = vec![
            Record::default()
                .with(LogicalField::Name, "Acme")
                .with(LogicalField::City, "Reno")
                .with(LogicalField::Website, "https://acme.test")
                .with(LogicalField::Phone, "555-0100"),
        ];
        let table = DisplayTable::new(&schema(), &records);
        assert_eq!(table.headers(), vec!["Name", "City", "Map", "Website"]);
        assert_eq!(
            table.rows()[0],
            vec![
                DisplayCell::Text("Acme".into()),
                DisplayCell::Text("Reno".into()),
                DisplayCell::Empty,
                DisplayCell::Link("https://acme.test".into()),
            ]
        );
    }

    #[test]
    fn test_export_text_keeps_link_markup() {
        let cell = DisplayCell::Link("https://acme.test".into());
        assert_eq!(
            cell.export_text(),
            r#"<a href="https://acme.test" target="_blank">Open</a>"#
        );
        assert_eq!(DisplayCell::Empty.export_text(), "");
    }
}
