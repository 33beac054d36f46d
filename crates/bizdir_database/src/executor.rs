//! Read-only query execution against the working table.

use crate::models::{CountRow, RecordRow, ValueRow};
use crate::{DirectoryPool, FilterClause, RecordQuery, quote_ident};
use bizdir_core::{Record, SchemaDescriptor};
use bizdir_error::QueryResult;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Text};
use diesel::sqlite::Sqlite;
use tracing::{debug, instrument};

fn as_count(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

fn as_bind(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Executes counts and record queries. Every operation is a plain read.
#[derive(Clone)]
pub struct TableQueryExecutor {
    pool: DirectoryPool,
}

impl std::fmt::Debug for TableQueryExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableQueryExecutor")
            .field("pool", &self.pool.state())
            .finish()
    }
}

impl TableQueryExecutor {
    /// Creates an executor over a connection pool.
    pub fn new(pool: DirectoryPool) -> Self {
        Self { pool }
    }

    /// Connection pool used by this executor.
    pub fn pool(&self) -> &DirectoryPool {
        &self.pool
    }

    /// Total row count, unfiltered.
    #[instrument(skip(self))]
    pub fn count_all(&self, table: &str) -> QueryResult<u64> {
        self.count_filtered(table, &FilterClause::default())
    }

    /// Row count under a filter clause.
    #[instrument(skip(self, filter), fields(params = filter.params().len()))]
    pub fn count_filtered(&self, table: &str, filter: &FilterClause) -> QueryResult<u64> {
        let sql = format!(
            "SELECT COUNT(*) AS count FROM {} {}",
            quote_ident(table),
            filter.where_sql()
        );
        debug!(sql = %sql, "Counting rows");

        let mut query = diesel::sql_query(sql).into_boxed::<Sqlite>();
        for param in filter.params() {
            query = query.bind::<Text, _>(param.clone());
        }

        let mut conn = self.pool.get()?;
        let row: CountRow = query.get_result(&mut conn)?;
        Ok(as_count(row.count))
    }

    /// Count of distinct non-null values in `column`; 0 when the column is
    /// not part of the schema.
    #[instrument(skip(self, schema), fields(table = schema.table()))]
    pub fn distinct_count(&self, schema: &SchemaDescriptor, column: &str) -> QueryResult<u64> {
        if !schema.has_column(column) {
            debug!("Column absent, distinct count is 0");
            return Ok(0);
        }
        let column = quote_ident(column);
        let sql = format!(
            "SELECT COUNT(DISTINCT {col}) AS count FROM {table} WHERE {col} IS NOT NULL",
            col = column,
            table = quote_ident(schema.table())
        );
        debug!(sql = %sql, "Counting distinct values");

        let mut conn = self.pool.get()?;
        let row: CountRow = diesel::sql_query(sql).get_result(&mut conn)?;
        Ok(as_count(row.count))
    }

    /// Sorted distinct non-null values of `column`; empty when the column is
    /// not part of the schema.
    #[instrument(skip(self, schema), fields(table = schema.table()))]
    pub fn value_list(&self, schema: &SchemaDescriptor, column: &str) -> QueryResult<Vec<String>> {
        if !schema.has_column(column) {
            return Ok(Vec::new());
        }
        let column = quote_ident(column);
        let sql = format!(
            "SELECT DISTINCT CAST({col} AS TEXT) AS value FROM {table} \
             WHERE {col} IS NOT NULL ORDER BY 1",
            col = column,
            table = quote_ident(schema.table())
        );
        debug!(sql = %sql, "Listing values");

        let mut conn = self.pool.get()?;
        let rows: Vec<ValueRow> = diesel::sql_query(sql).load(&mut conn)?;
        Ok(rows.into_iter().map(|r| r.value).collect())
    }

    /// One page of records: `limit` rows starting after `offset` rows.
    #[instrument(
        skip(self, query),
        fields(table = %query.table_name(), columns = query.columns().len())
    )]
    pub fn fetch_page(&self, query: &RecordQuery, limit: u64, offset: u64) -> QueryResult<Vec<Record>> {
        self.load_records(query, Some((limit, offset)))
    }

    /// Every record matching the query's filter, in the same order as pages.
    #[instrument(
        skip(self, query),
        fields(table = %query.table_name(), columns = query.columns().len())
    )]
    pub fn fetch_all(&self, query: &RecordQuery) -> QueryResult<Vec<Record>> {
        self.load_records(query, None)
    }

    fn load_records(
        &self,
        view: &RecordQuery,
        window: Option<(u64, u64)>,
    ) -> QueryResult<Vec<Record>> {
        let sql = view.to_sql(window.is_some());
        debug!(sql = %sql, "Loading records");

        let mut query = diesel::sql_query(sql).into_boxed::<Sqlite>();
        for param in view.filter().params() {
            query = query.bind::<Text, _>(param.clone());
        }
        if let Some((limit, offset)) = window {
            query = query
                .bind::<BigInt, _>(as_bind(limit))
                .bind::<BigInt, _>(as_bind(offset));
        }

        let mut conn = self.pool.get()?;
        let rows: Vec<RecordRow> = query.load(&mut conn)?;
        debug!(row_count = rows.len(), "Records loaded");
        Ok(rows.into_iter().map(Record::from).collect())
    }
}
