//! CSV formatting for page and full exports.

use bizdir_core::{DisplayTable, Record, SchemaDescriptor};
use std::borrow::Cow;

/// File name offered for a page export.
pub fn page_export_filename(page: u32) -> String {
    format!("results_page_{}.csv", page)
}

/// File name offered for a full export.
pub const FULL_EXPORT_FILENAME: &str = "results_filtered.csv";

fn escape_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// Format a header row and data rows as CSV.
///
/// Fields containing commas, quotes or line breaks are quoted with inner
/// quotes doubled. Rows end with `\n`.
pub fn format_as_csv<R, C, S>(headers: &[&str], rows: R) -> String
where
    R: IntoIterator<Item = C>,
    C: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut output = headers
        .iter()
        .map(|h| escape_field(h))
        .collect::<Vec<_>>()
        .join(",");
    output.push('\n');

    for row in rows {
        let line = row
            .into_iter()
            .map(|cell| escape_field(cell.as_ref()).into_owned())
            .collect::<Vec<_>>()
            .join(",");
        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// CSV of the displayed page, with the same columns and link formatting as
/// the on-screen table.
pub fn page_csv(table: &DisplayTable) -> String {
    let rows = table
        .rows()
        .iter()
        .map(|row| row.iter().map(|cell| cell.export_text()));
    format_as_csv(&table.headers(), rows)
}

/// CSV of raw record values for the fields the schema selects.
pub fn records_csv(schema: &SchemaDescriptor, records: &[Record]) -> String {
    let fields = schema.selected_fields();
    let headers: Vec<&str> = fields.iter().map(|f| f.label()).collect();
    let rows = records
        .iter()
        .map(|record| fields.iter().map(move |f| record.get(*f).unwrap_or("")));
    format_as_csv(&headers, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizdir_core::LogicalField;

    #[test]
    fn test_quoting_rules() {
        let csv = format_as_csv(
            &["Name", "Address"],
            vec![vec!["Joe's, Inc.", "1 \"Main\" St"], vec!["Plain", "Line\nBreak"]],
        );
        assert_eq!(
            csv,
            "Name,Address\n\"Joe's, Inc.\",\"1 \"\"Main\"\" St\"\nPlain,\"Line\nBreak\"\n"
        );
    }

    #[test]
    fn test_header_only_when_no_rows() {
        let rows: Vec<Vec<&str>> = Vec::new();
        assert_eq!(format_as_csv(&["Name"], rows), "Name\n");
    }

    #[test]
    fn test_page_csv_keeps_link_markup_and_full_csv_keeps_raw_urls() {
        let schema = SchemaDescriptor::new("records", ["name", "site"], true).unwrap();
        let records = vec![
            Record::default()
                .with(LogicalField::Name, "Acme")
                .with(LogicalField::Website, "https://acme.test"),
            Record::default()
                .with(LogicalField::Name, "Beta")
                .with(LogicalField::Website, "ftp://beta.test"),
        ];

        let page = page_csv(&DisplayTable::new(&schema, &records));
        assert_eq!(
            page,
            "Name,Website\nAcme,\"<a href=\"\"https://acme.test\"\" target=\"\"_blank\"\">Open</a>\"\nBeta,\n"
        );

        let full = records_csv(&schema, &records);
        assert_eq!(full, "Name,Website\nAcme,https://acme.test\nBeta,ftp://beta.test\n");
    }

    #[test]
    fn test_filenames() {
        assert_eq!(page_export_filename(3), "results_page_3.csv");
        assert_eq!(FULL_EXPORT_FILENAME, "results_filtered.csv");
    }
}
