//! Types describing a resource graph.
//!
//! A resource graph is a set of [`Resource`]s keyed by [`ModelId`]. Each
//! resource declares derived properties (with optional [`Dependency`] lists)
//! and [`Association`]s to other models.

mod association;
mod model;
mod property;

pub use association::*;
pub use model::*;
pub use property::*;
