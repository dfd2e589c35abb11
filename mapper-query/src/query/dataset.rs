//! Datasets: one table, a projection, filters and a limit.

use mapper_schema::Resource;
use smol_str::SmolStr;
use tracing::trace;

use super::sql::{Dialect, SqlBuilder, Statement};
use super::value::SqlValue;
use crate::error::{QueryError, QueryResult};
use crate::selector::{Projection, SelectorPlan};

/// The key used to fetch a batch of rows by identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// A single key column.
    Simple(SmolStr),
    /// Several key columns matched together.
    Composite(Vec<SmolStr>),
}

impl Identity {
    /// Build an identity from key columns.
    pub fn from_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        let mut columns: Vec<SmolStr> = columns.into_iter().map(Into::into).collect();
        if columns.len() == 1 {
            Self::Simple(columns.remove(0))
        } else {
            Self::Composite(columns)
        }
    }

    /// The primary key of a resource.
    pub fn primary_key(resource: &Resource) -> Self {
        Self::from_columns(resource.primary_key.iter().cloned())
    }

    /// Key columns in order.
    pub fn columns(&self) -> &[SmolStr] {
        match self {
            Self::Simple(column) => std::slice::from_ref(column),
            Self::Composite(columns) => columns,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Condition {
    Eq(SmolStr, SqlValue),
    In(SmolStr, Vec<SqlValue>),
    TupleIn(Vec<SmolStr>, Vec<Vec<SqlValue>>),
}

/// A single-table fetch description.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    table: SmolStr,
    projection: Projection,
    conditions: Vec<Condition>,
    limit: Option<u64>,
    dialect: Dialect,
}

impl Dataset {
    /// Select every column of a table.
    pub fn new(table: impl Into<SmolStr>) -> Self {
        Self {
            table: table.into(),
            projection: Projection::All,
            conditions: Vec::new(),
            limit: None,
            dialect: Dialect::default(),
        }
    }

    /// Build the dataset a plan asks for on a resource.
    ///
    /// Models absent from the plan, or with no recorded columns, select
    /// every column.
    pub fn for_resource(resource: &Resource, plan: &SelectorPlan) -> Self {
        let projection = plan
            .get(resource.name())
            .map(|entry| entry.projection.clone())
            .unwrap_or(Projection::All);

        Self::new(resource.table.clone()).with_projection(projection)
    }

    /// Replace the projection.
    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    /// Set the SQL dialect.
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Add a column to the projection.
    pub fn select(mut self, column: impl Into<SmolStr>) -> Self {
        self.projection.insert(column);
        self
    }

    /// Select every column.
    pub fn select_all(mut self) -> Self {
        self.projection.select_all();
        self
    }

    /// Require a column to equal a value.
    pub fn filter(mut self, column: impl Into<SmolStr>, value: impl Into<SqlValue>) -> Self {
        self.conditions.push(Condition::Eq(column.into(), value.into()));
        self
    }

    /// Limit the number of rows.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Restrict the dataset to rows whose identity is one of `values`.
    ///
    /// For a composite identity every value must be a [`SqlValue::List`]
    /// with one item per key column.
    pub fn multi_get(
        mut self,
        identity: &Identity,
        values: impl IntoIterator<Item = SqlValue>,
    ) -> QueryResult<Self> {
        let condition = match identity {
            Identity::Simple(column) => Condition::In(column.clone(), values.into_iter().collect()),
            Identity::Composite(columns) => {
                let rows = values
                    .into_iter()
                    .map(|value| match value {
                        SqlValue::List(items) if items.len() == columns.len() => Ok(items),
                        SqlValue::List(items) => {
                            Err(QueryError::invalid_identity(columns.len(), items.len()))
                        }
                        _ => Err(QueryError::invalid_identity(columns.len(), 1)),
                    })
                    .collect::<QueryResult<Vec<_>>>()?;
                Condition::TupleIn(columns.clone(), rows)
            }
        };

        trace!(table = %self.table, identity = ?identity.columns(), "Restricting dataset by identity");
        self.conditions.push(condition);
        Ok(self)
    }

    /// The table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// The projection.
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// The row limit.
    pub fn row_limit(&self) -> Option<u64> {
        self.limit
    }

    /// Render the dataset as a statement.
    pub fn to_statement(&self) -> Statement {
        let mut builder = SqlBuilder::new(self.dialect);
        builder.push("SELECT ");

        match self.projection.columns() {
            Some(columns) if !columns.is_empty() => {
                for (i, column) in columns.iter().enumerate() {
                    if i > 0 {
                        builder.push(", ");
                    }
                    builder.push_identifier(column);
                }
            }
            _ => {
                builder.push("*");
            }
        }

        builder.push(" FROM ").push_identifier(&self.table);

        for (i, condition) in self.conditions.iter().enumerate() {
            builder.push(if i == 0 { " WHERE " } else { " AND " });
            push_condition(&mut builder, condition);
        }

        if let Some(limit) = self.limit {
            builder.push(&format!(" LIMIT {}", limit));
        }

        builder.build()
    }

    /// Render the dataset as SQL text.
    pub fn sql(&self) -> String {
        self.to_statement().sql
    }
}

fn push_condition(builder: &mut SqlBuilder, condition: &Condition) {
    match condition {
        Condition::Eq(column, SqlValue::Null) => {
            builder.push_identifier(column).push(" IS NULL");
        }
        Condition::Eq(column, value) => {
            builder.push_identifier(column).push(" = ").push_param(value.clone());
        }
        Condition::In(_, values) if values.is_empty() => {
            builder.push("1 = 0");
        }
        Condition::In(column, values) => {
            builder
                .push_identifier(column)
                .push(" IN ")
                .push_param_list(values.iter().cloned());
        }
        Condition::TupleIn(_, rows) if rows.is_empty() => {
            builder.push("1 = 0");
        }
        Condition::TupleIn(columns, rows) => {
            builder.push("(");
            for (i, column) in columns.iter().enumerate() {
                if i > 0 {
                    builder.push(", ");
                }
                builder.push_identifier(column);
            }
            builder.push(") IN (");
            for (i, row) in rows.iter().enumerate() {
                if i > 0 {
                    builder.push(", ");
                }
                builder.push_param_list(row.iter().cloned());
            }
            builder.push(")");
        }
    }
}
