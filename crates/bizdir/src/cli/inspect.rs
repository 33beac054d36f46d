//! Schema inspection command handler.

use bizdir_core::{LogicalField, SchemaDescriptor};
use bizdir_database::{Directory, create_pool};
use bizdir_error::BizdirResult;
use bizdir_server::DirectoryConfig;
use std::fmt::Write;
use std::path::PathBuf;

/// Human-readable summary of how the schema was resolved.
pub fn inspection_report(schema: &SchemaDescriptor, cities: usize, states: usize) -> String {
    let mut report = String::new();
    let _ = writeln!(report, "Working table: {}", schema.table());
    let _ = writeln!(
        report,
        "Row order tiebreaker: {}",
        if schema.has_rowid() { "rowid" } else { "all selected columns" }
    );
    let _ = writeln!(report, "Fields:");
    for field in LogicalField::all() {
        let column = schema.resolve(field).unwrap_or("-");
        let _ = writeln!(report, "  {:<8} {}", field.label(), column);
    }
    let _ = writeln!(report, "City options: {}", cities);
    let _ = write!(report, "State options: {}", states);
    report
}

/// Handle the `inspect` command.
#[tracing::instrument(skip_all)]
pub fn handle_inspect_command(config_path: Option<PathBuf>) -> BizdirResult<()> {
    let config = DirectoryConfig::load(config_path.as_deref())?;
    let pool = create_pool(config.db_path(), 1)?;
    let directory = Directory::open(pool)?;

    println!(
        "{}",
        inspection_report(
            directory.schema(),
            directory.options().cities().len(),
            directory.options().states().len()
        )
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_lists_resolved_and_missing_fields() {
        let schema =
            SchemaDescriptor::new("records_norm", ["name", "name_std", "state", "site"], false)
                .unwrap();
        let report = inspection_report(&schema, 0, 4);

        assert!(report.starts_with("Working table: records_norm\n"));
        assert!(report.contains("Row order tiebreaker: all selected columns"));
        assert!(report.contains("  Name     name_std\n"));
        assert!(report.contains("  State    state\n"));
        assert!(report.contains("  Phone    -\n"));
        assert!(report.ends_with("State options: 4"));
    }
}
