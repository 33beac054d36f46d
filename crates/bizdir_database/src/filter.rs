//! Translation of a [`FilterSet`] into a parameterized WHERE clause.

use bizdir_core::{FilterSet, KEYWORD_FIELDS, LogicalField, SchemaDescriptor};
use serde::Serialize;
use tracing::debug;

/// Quotes an SQL identifier taken from the schema descriptor.
///
/// # Examples
///
/// ```
/// use bizdir_database::quote_ident;
///
/// assert_eq!(quote_ident("name_std"), "\"name_std\"");
/// assert_eq!(quote_ident("odd\"name"), "\"odd\"\"name\"");
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// WHERE clause and the values bound to its placeholders, in order.
///
/// Only identifiers from the schema descriptor appear in the SQL text;
/// every user-supplied value is a bound parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterClause {
    predicates: Vec<String>,
    params: Vec<String>,
}

impl FilterClause {
    /// `WHERE a AND b ...`, or an empty string when nothing is constrained.
    pub fn where_sql(&self) -> String {
        if self.predicates.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.predicates.join(" AND "))
        }
    }

    /// Values to bind, in placeholder order.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Whether no predicate was produced.
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    fn push(&mut self, predicate: String, params: impl IntoIterator<Item = String>) {
        self.predicates.push(predicate);
        self.params.extend(params);
    }
}

/// Builds the WHERE clause for `filters` against `schema`.
///
/// Filters whose column is absent from the schema are dropped silently.
pub fn build_filter(filters: &FilterSet, schema: &SchemaDescriptor) -> FilterClause {
    let mut clause = FilterClause::default();

    if let Some(keyword) = filters.keyword_value() {
        let columns: Vec<&str> = KEYWORD_FIELDS
            .iter()
            .filter_map(|f| schema.resolve(*f))
            .collect();
        if columns.is_empty() {
            debug!("Keyword filter dropped: no searchable columns");
        } else {
            let group = columns
                .iter()
                .map(|c| format!("{} LIKE ?", quote_ident(c)))
                .collect::<Vec<_>>()
                .join(" OR ");
            let pattern = format!("%{}%", keyword);
            clause.push(
                format!("({})", group),
                std::iter::repeat_n(pattern, columns.len()),
            );
        }
    }

    if let Some(city) = filters.city_value() {
        match schema.resolve(LogicalField::City) {
            Some(column) => clause.push(
                format!("{} = ?", quote_ident(column)),
                [city.to_string()],
            ),
            None => debug!("City filter dropped: column absent"),
        }
    }

    if let Some(state) = filters.state_value() {
        match schema.resolve(LogicalField::State) {
            Some(column) => clause.push(
                format!("{} = ?", quote_ident(column)),
                [state.to_string()],
            ),
            None => debug!("State filter dropped: column absent"),
        }
    }

    if let Some(prefix) = filters.zip_prefix_value() {
        match schema.resolve(LogicalField::PostalCode) {
            Some(column) => clause.push(
                format!("{} LIKE ?", quote_ident(column)),
                [format!("{}%", prefix)],
            ),
            None => debug!("ZIP filter dropped: column absent"),
        }
    }

    clause
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_schema() -> SchemaDescriptor {
        SchemaDescriptor::new(
            "records_norm",
            [
                "name",
                "name_std",
                "full_address",
                "site",
                "city",
                "state_std",
                "postal_code_std",
            ],
            true,
        )
        .unwrap()
    }

    #[test]
    fn test_empty_filters_match_everything() {
        let clause = build_filter(&FilterSet::default(), &full_schema());
        assert!(clause.is_empty());
        assert_eq!(clause.where_sql(), "");
        assert!(clause.params().is_empty());
    }

    #[test]
    fn test_keyword_searches_resolved_columns() {
        let filters = FilterSet::default().with_keyword("pizza");
        let clause = build_filter(&filters, &full_schema());
        assert_eq!(
            clause.where_sql(),
            r#"WHERE ("name_std" LIKE ? OR "full_address" LIKE ? OR "site" LIKE ?)"#
        );
        assert_eq!(clause.params(), &["%pizza%", "%pizza%", "%pizza%"]);
    }

    #[test]
    fn test_keyword_without_searchable_columns_is_noop() {
        let schema = SchemaDescriptor::new("records", ["city", "phone"], true).unwrap();
        let filters = FilterSet::default().with_keyword("pizza");
        assert_eq!(build_filter(&filters, &schema), FilterClause::default());
    }

    #[test]
    fn test_all_filters_combine_with_and() {
        let filters = FilterSet::default()
            .with_keyword("cafe")
            .with_city("Oakland")
            .with_state("CA")
            .with_zip_prefix(" 946 ");
        let clause = build_filter(&filters, &full_schema());
        assert_eq!(
            clause.where_sql(),
            "WHERE (\"name_std\" LIKE ? OR \"full_address\" LIKE ? OR \"site\" LIKE ?) \
             AND \"city\" = ? AND \"state_std\" = ? AND \"postal_code_std\" LIKE ?"
        );
        assert_eq!(
            clause.params(),
            &["%cafe%", "%cafe%", "%cafe%", "Oakland", "CA", "946%"]
        );
    }

    #[test]
    fn test_values_are_never_interpolated() {
        let hostile = "x' OR '1'='1";
        let filters = FilterSet::default().with_city(hostile).with_keyword(hostile);
        let clause = build_filter(&filters, &full_schema());
        assert!(!clause.where_sql().contains(hostile));
        assert!(clause.params().iter().any(|p| p == hostile));
    }

    #[test]
    fn test_raw_state_column_is_used_when_normalized_missing() {
        let schema = SchemaDescriptor::new("records", ["name", "state"], true).unwrap();
        let filters = FilterSet::default().with_state("NV");
        let clause = build_filter(&filters, &schema);
        assert_eq!(clause.where_sql(), "WHERE \"state\" = ?");
    }

    #[test]
    fn test_filters_on_absent_columns_are_dropped() {
        let schema = SchemaDescriptor::new("records", ["name"], true).unwrap();
        let filters = FilterSet::default()
            .with_city("Reno")
            .with_state("NV")
            .with_zip_prefix("89");
        assert!(build_filter(&filters, &schema).is_empty());
    }
}
