//! Running datasets against a data store.

use std::time::{Duration, Instant};

use futures::future::BoxFuture;
use tracing::{debug, warn};

use super::dataset::{Dataset, Identity};
use super::sql::Statement;
use super::value::{Row, SqlValue};
use crate::error::QueryResult;

/// The seam to a real database driver.
pub trait QueryEngine: Send + Sync {
    /// Run a statement and return its rows.
    fn fetch<'a>(&'a self, statement: &'a Statement) -> BoxFuture<'a, QueryResult<Vec<Row>>>;
}

/// Data store interaction counters for one [`Query`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryStatistics {
    /// Number of statements sent.
    pub datastore_interactions: u64,
    /// Total time spent waiting on the data store.
    pub datastore_interaction_time: Duration,
}

/// A dataset bound to an engine, optionally overridden by raw SQL.
pub struct Query<'e, E: QueryEngine + ?Sized> {
    engine: &'e E,
    dataset: Dataset,
    raw: Option<String>,
    statistics: QueryStatistics,
}

impl<'e, E: QueryEngine + ?Sized> Query<'e, E> {
    /// Create a query over a dataset.
    pub fn new(engine: &'e E, dataset: Dataset) -> Self {
        Self {
            engine,
            dataset,
            raw: None,
            statistics: QueryStatistics::default(),
        }
    }

    /// Replace the generated SQL with verbatim text.
    ///
    /// The text is sent as-is with no parameters.
    pub fn raw(mut self, sql: impl Into<String>) -> Self {
        self.raw = Some(sql.into());
        self
    }

    /// The dataset this query was built from.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Interaction counters so far.
    pub fn statistics(&self) -> QueryStatistics {
        self.statistics
    }

    /// The SQL that [`execute`](Self::execute) would send.
    pub fn sql(&self) -> String {
        match &self.raw {
            Some(raw) => raw.clone(),
            None => self.dataset.sql(),
        }
    }

    /// Describe a dataset, or this query when none is given.
    pub fn describe(&self, dataset: Option<&Dataset>) -> String {
        match dataset {
            Some(dataset) => dataset.sql(),
            None => self.sql(),
        }
    }

    /// Run the query.
    pub async fn execute(&mut self) -> QueryResult<Vec<Row>> {
        self.execute_dataset(None).await
    }

    /// Run a specific dataset instead of the query's own.
    ///
    /// A raw query always wins; the dataset is then ignored with a warning.
    pub async fn execute_dataset(&mut self, dataset: Option<&Dataset>) -> QueryResult<Vec<Row>> {
        let statement = match &self.raw {
            Some(raw) => {
                if dataset.is_some() {
                    warn!(
                        table = %self.dataset.table(),
                        "Ignoring passed dataset due to previously-specified raw SQL"
                    );
                }
                Statement::raw(raw.clone())
            }
            None => dataset.unwrap_or(&self.dataset).to_statement(),
        };

        debug!(sql = %statement.sql, params = statement.params.len(), "Executing query");
        self.statistics.datastore_interactions += 1;
        let started = Instant::now();

        let result = self.engine.fetch(&statement).await;

        self.statistics.datastore_interaction_time += started.elapsed();
        let rows = result.map_err(|e| e.with_sql(statement.sql.clone()))?;
        debug!(rows = rows.len(), "Query returned");
        Ok(rows)
    }

    /// Fetch the rows whose identity is one of `values`.
    pub async fn multi_get(
        &mut self,
        identity: &Identity,
        values: impl IntoIterator<Item = SqlValue>,
    ) -> QueryResult<Vec<Row>> {
        let dataset = self.dataset.clone().multi_get(identity, values)?;
        self.execute_dataset(Some(&dataset)).await
    }
}
