//! # mapper-query
//!
//! Field-selection planning for the Prax mapper.
//!
//! This crate provides:
//! - Requested field trees (`{name: true, posts: {title: true}}`)
//! - The [`SelectorGenerator`], which expands a field tree over a resource
//!   graph into a per-model [`SelectorPlan`]
//! - Error codes for configuration and request defects
//! - A thin query boundary that renders plan entries as SQL and runs them
//!   through a pluggable [`QueryEngine`](query::QueryEngine)
//!
//! ## Planning
//!
//! ```rust
//! use mapper_query::{fields, plan};
//! use mapper_schema::{Association, Resource, ResourceGraph};
//!
//! let graph = ResourceGraph::builder()
//!     .resource(
//!         Resource::new("User")
//!             .with_property("display_name", ["profile_picture"])
//!             .with_association("posts", Association::to_many("Post", "user_id")),
//!     )
//!     .resource(Resource::new("Post"))
//!     .build()
//!     .unwrap();
//!
//! let selectors = plan(&graph, "User", &fields! { display_name, posts }).unwrap();
//!
//! let user = selectors.get("User").unwrap();
//! assert!(user.projection.includes("profile_picture"));
//! assert!(user.is_tracked("posts"));
//! assert!(selectors.get("Post").unwrap().projection.includes("user_id"));
//! ```
//!
//! ## Errors
//!
//! Every failure aborts the planning call:
//!
//! ```rust
//! use mapper_query::{fields, plan, ErrorCode};
//! use mapper_schema::{Resource, ResourceGraph};
//!
//! let graph = ResourceGraph::builder()
//!     .resource(Resource::new("User").with_property("bio", ["profile.text"]))
//!     .build()
//!     .unwrap();
//!
//! let err = plan(&graph, "User", &fields! { bio }).unwrap_err();
//! assert_eq!(err.code, ErrorCode::UnknownAssociation);
//! ```

#[macro_use]
pub mod logging;

pub mod error;
pub mod fields;
pub mod query;
pub mod selector;

pub use error::{ErrorCode, ErrorContext, QueryError, QueryResult};
pub use fields::{FieldRequest, FieldTree, WILDCARD};
pub use selector::{plan, Projection, SelectorEntry, SelectorGenerator, SelectorPlan};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{QueryError, QueryResult};
    pub use crate::fields;
    pub use crate::fields::{FieldRequest, FieldTree};
    pub use crate::query::{Dataset, Identity, Query, QueryEngine, Row, SqlValue};
    pub use crate::selector::{plan, Projection, SelectorEntry, SelectorGenerator, SelectorPlan};
}
