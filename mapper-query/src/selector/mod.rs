//! Field-selection planning.
//!
//! [`SelectorGenerator`] turns a requested field tree into a
//! [`SelectorPlan`]: for every model reached, the columns to select and the
//! associations to load eagerly.

mod entry;
mod generator;

pub use entry::{Projection, SelectorEntry, SelectorPlan};
pub use generator::{plan, SelectorGenerator, DEFAULT_MAX_DEPTH};
