//! # Prax Mapper
//!
//! Field-selection planning for resource graphs.
//!
//! Given a graph of models (declared properties with dependencies, and
//! to-one, to-many and many-to-many associations) and a tree of requested
//! fields, the planner computes for every model reached which columns to
//! select and which associations to load eagerly.
//!
//! ## Quick Start
//!
//! ```rust
//! use prax_mapper::prelude::*;
//!
//! let config = MapperConfig::from_str(r#"
//!     [models.User]
//!     table = "users"
//!     properties = { display_name = ["profile_picture"] }
//!
//!     [models.User.associations.posts]
//!     kind = "one_to_many"
//!     model = "Post"
//!     key = "user_id"
//!
//!     [models.Post]
//!     table = "posts"
//! "#).unwrap();
//!
//! let graph = config.resource_graph().unwrap();
//! let plan = plan(&graph, "User", &fields! { display_name, posts: { title } }).unwrap();
//!
//! let post = Dataset::for_resource(graph.get("Post").unwrap(), &plan);
//! assert_eq!(post.sql(), "SELECT user_id, title FROM posts");
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Resource graph declarations and configuration.
pub mod schema {
    pub use mapper_schema::*;
}

/// Planning, field trees and the query boundary.
pub mod query {
    pub use mapper_query::*;
}

pub use mapper_query::fields;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::fields;
    pub use mapper_query::prelude::*;
    pub use mapper_schema::{
        Association, Dependency, MapperConfig, ModelId, ModelRegistry, Resource, ResourceGraph,
    };
}

// Re-export key types at the crate root
pub use mapper_query::{
    plan, ErrorCode, FieldRequest, FieldTree, Projection, QueryError, QueryResult,
    SelectorEntry, SelectorGenerator, SelectorPlan,
};
pub use mapper_schema::{MapperConfig, ResourceGraph, SchemaError};
