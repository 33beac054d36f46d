//! View structs for record query construction.

use crate::{FilterClause, build_filter, quote_ident};
use bizdir_core::{FilterSet, LogicalField, SchemaDescriptor};
use derive_builder::Builder;

/// Ordering for stable pagination.
///
/// Primary key is the canonical name (`COALESCE` of the present name
/// columns, normalized first), falling back to the first selected column.
/// A tiebreaker follows so equal names never swap places between pages.
pub fn order_expression(schema: &SchemaDescriptor) -> String {
    let names: Vec<String> = schema
        .name_columns()
        .into_iter()
        .map(quote_ident)
        .collect();

    let primary = match names.as_slice() {
        [] => schema
            .selected()
            .next()
            .map(|(_, column)| quote_ident(column))
            .unwrap_or_else(|| "1".to_string()),
        [only] => only.clone(),
        many => format!("COALESCE({})", many.join(", ")),
    };

    let tiebreak = if schema.has_rowid() {
        "rowid ASC".to_string()
    } else {
        schema
            .selected()
            .map(|(_, column)| format!("{} ASC", quote_ident(column)))
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!("{} ASC, {}", primary, tiebreak)
}

/// View for querying directory records with filtering and ordering.
///
/// Pagination is applied by the executor, so the same view serves both the
/// page query and the unbounded export query.
#[derive(Debug, Clone, Builder, derive_getters::Getters)]
#[builder(setter(into))]
pub struct RecordQuery {
    /// Table name to query
    table_name: String,

    /// Selected logical fields with their physical columns
    columns: Vec<(LogicalField, String)>,

    /// Parameterized WHERE clause
    #[builder(default)]
    filter: FilterClause,

    /// ORDER BY expression
    order_by: String,
}

impl RecordQuery {
    /// Query for all fields the schema selects, filtered by `filters`.
    pub fn for_schema(schema: &SchemaDescriptor, filters: &FilterSet) -> Self {
        Self {
            table_name: schema.table().to_string(),
            columns: schema
                .selected()
                .map(|(field, column)| (field, column.to_string()))
                .collect(),
            filter: build_filter(filters, schema),
            order_by: order_expression(schema),
        }
    }

    /// Select list naming every logical field by its alias; fields without
    /// a physical column are selected as `NULL`.
    pub fn select_list(&self) -> String {
        LogicalField::all()
            .map(|field| {
                let alias = quote_ident(field.alias());
                match self.columns.iter().find(|(f, _)| *f == field) {
                    Some((_, column)) => {
                        format!("CAST({} AS TEXT) AS {}", quote_ident(column), alias)
                    }
                    None => format!("NULL AS {}", alias),
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// SQL text; `paginated` appends `LIMIT ? OFFSET ?` placeholders bound
    /// after the filter parameters.
    pub fn to_sql(&self, paginated: bool) -> String {
        let mut sql = format!(
            "SELECT {} FROM {}",
            self.select_list(),
            quote_ident(&self.table_name)
        );
        let where_sql = self.filter.where_sql();
        if !where_sql.is_empty() {
            sql.push(' ');
            sql.push_str(&where_sql);
        }
        sql.push_str(" ORDER BY ");
        sql.push_str(&self.order_by);
        if paginated {
            sql.push_str(" LIMIT ? OFFSET ?");
        }
        sql
    }
}
