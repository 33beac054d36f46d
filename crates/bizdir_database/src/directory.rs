//! The directory as the UI uses it: schema, option lists and queries
//! composed per interaction.

use crate::{DirectoryPool, RecordQuery, TableQueryExecutor, build_filter, inspect_schema};
use bizdir_core::{FilterSet, LogicalField, PageState, PageWindow, Record, SchemaDescriptor};
use bizdir_error::{BizdirResult, QueryResult};
use serde::Serialize;
use tracing::{debug, info, instrument};

/// Values offered by the city and state selectors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, derive_getters::Getters)]
pub struct FilterOptions {
    /// Distinct cities, sorted
    cities: Vec<String>,
    /// Distinct states, sorted
    states: Vec<String>,
}

impl FilterOptions {
    /// Options from already-sorted value lists.
    pub fn new(cities: Vec<String>, states: Vec<String>) -> Self {
        Self { cities, states }
    }
}

/// Headline counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Kpis {
    /// Rows in the working table
    pub total_rows: u64,
    /// Rows matching the current filters
    pub filtered_rows: u64,
    /// Distinct cities in the whole table
    pub distinct_cities: u64,
    /// Distinct postal codes in the whole table
    pub distinct_zips: u64,
}

/// Everything needed to render one page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryPage {
    /// Headline counters
    pub kpis: Kpis,
    /// Clamped page position
    pub window: PageWindow,
    /// Records on the page, in display order
    pub records: Vec<Record>,
}

/// A directory database opened for browsing.
///
/// The schema and selector options are computed once on open and never
/// re-read; the file is treated as immutable.
#[derive(Debug, Clone)]
pub struct Directory {
    schema: SchemaDescriptor,
    options: FilterOptions,
    executor: TableQueryExecutor,
}

impl Directory {
    /// Inspects the database behind `pool` and loads selector options.
    ///
    /// # Errors
    ///
    /// Returns a schema error if there is no usable working table, or a
    /// query error if the catalog or option lists cannot be read.
    #[instrument(name = "directory.open", skip(pool))]
    pub fn open(pool: DirectoryPool) -> BizdirResult<Self> {
        let schema = {
            let mut conn = pool.get().map_err(bizdir_error::QueryError::from)?;
            inspect_schema(&mut conn)?
        };
        let executor = TableQueryExecutor::new(pool);

        let list = |field: LogicalField| match schema.resolve(field) {
            Some(column) => executor.value_list(&schema, column),
            None => Ok(Vec::new()),
        };
        let options = FilterOptions::new(list(LogicalField::City)?, list(LogicalField::State)?);
        info!(
            table = schema.table(),
            cities = options.cities.len(),
            states = options.states.len(),
            "Directory opened"
        );

        Ok(Self {
            schema,
            options,
            executor,
        })
    }

    /// Schema of the working table.
    pub fn schema(&self) -> &SchemaDescriptor {
        &self.schema
    }

    /// Selector options.
    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    /// Underlying executor.
    pub fn executor(&self) -> &TableQueryExecutor {
        &self.executor
    }

    /// Record query for `filters`.
    pub fn record_query(&self, filters: &FilterSet) -> RecordQuery {
        RecordQuery::for_schema(&self.schema, filters)
    }

    /// Rows matching `filters`.
    pub fn count_filtered(&self, filters: &FilterSet) -> QueryResult<u64> {
        let clause = build_filter(filters, &self.schema);
        self.executor.count_filtered(self.schema.table(), &clause)
    }

    fn distinct_field(&self, field: LogicalField) -> QueryResult<u64> {
        match self.schema.resolve(field) {
            Some(column) => self.executor.distinct_count(&self.schema, column),
            None => Ok(0),
        }
    }

    /// Headline counters for `filters`.
    #[instrument(skip(self))]
    pub fn kpis(&self, filters: &FilterSet) -> QueryResult<Kpis> {
        Ok(Kpis {
            total_rows: self.executor.count_all(self.schema.table())?,
            filtered_rows: self.count_filtered(filters)?,
            distinct_cities: self.distinct_field(LogicalField::City)?,
            distinct_zips: self.distinct_field(LogicalField::PostalCode)?,
        })
    }

    /// Counts, clamps `page` to the filtered result and fetches that page.
    #[instrument(skip(self, page), fields(requested_page = page.page(), page_size = page.page_size()))]
    pub fn page(&self, filters: &FilterSet, page: &mut PageState) -> QueryResult<DirectoryPage> {
        let kpis = self.kpis(filters)?;
        let window = page.window(kpis.filtered_rows);
        debug!(page = window.page, max_page = window.max_page, "Page clamped");

        let records = if kpis.filtered_rows == 0 {
            Vec::new()
        } else {
            let query = self.record_query(filters);
            self.executor.fetch_page(
                &query,
                u64::from(page.page_size()),
                page.offset(),
            )?
        };

        Ok(DirectoryPage {
            kpis,
            window,
            records,
        })
    }

    /// Moves `page` forward one page under `filters`.
    pub fn next_page(&self, filters: &FilterSet, page: &mut PageState) -> QueryResult<bool> {
        let filtered = self.count_filtered(filters)?;
        Ok(page.next(filtered))
    }

    /// Every record matching `filters`, for full export.
    #[instrument(skip(self))]
    pub fn export_all(&self, filters: &FilterSet) -> QueryResult<Vec<Record>> {
        let query = self.record_query(filters);
        self.executor.fetch_all(&query)
    }
}
