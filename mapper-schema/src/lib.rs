//! # mapper-schema
//!
//! Resource graph declarations for the Prax field-selection mapper.
//!
//! This crate provides:
//! - Model, property and association types describing a resource graph
//! - The [`ModelRegistry`] seam the planner resolves association targets through
//! - A validating [`ResourceGraph`] builder
//! - Configuration parsing for `mapper.toml` files
//!
//! ## Example
//!
//! ```rust
//! use mapper_schema::{Association, ResourceGraph, Resource};
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
//! assert_eq!(graph.len(), 2);
//! ```

pub mod ast;
pub mod config;
pub mod error;
pub mod graph;
pub mod validator;

pub use ast::*;
pub use config::MapperConfig;
pub use error::{SchemaError, SchemaResult};
pub use graph::{ModelRegistry, ResourceGraph, ResourceGraphBuilder};
pub use validator::Validator;
