//! Prax Mapper CLI - command-line interface for the field-selection mapper.
//!
//! Validates resource graphs declared in `mapper.toml`, plans field
//! requests against them and prints the SQL the plans translate to.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;
