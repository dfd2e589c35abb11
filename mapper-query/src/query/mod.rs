//! The boundary to the data store.
//!
//! A [`Dataset`] turns one model's selector entry into SQL; a [`Query`]
//! sends it through a [`QueryEngine`] and keeps interaction statistics.
//! No planning happens here.
//!
//! ```rust
//! use mapper_query::query::{Dataset, Identity, SqlValue};
//!
//! let sql = Dataset::new("posts")
//!     .select_all()
//!     .multi_get(&Identity::Simple("user_id".into()), [SqlValue::Int(1), SqlValue::Int(2)])
//!     .unwrap()
//!     .sql();
//! assert_eq!(sql, "SELECT * FROM posts WHERE user_id IN ($1, $2)");
//! ```

mod dataset;
mod executor;
mod sql;
mod value;

pub use dataset::{Dataset, Identity};
pub use executor::{Query, QueryEngine, QueryStatistics};
pub use sql::{needs_quoting, Dialect, SqlBuilder, Statement};
pub use value::{Row, SqlValue};
