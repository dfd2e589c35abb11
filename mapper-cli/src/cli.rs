//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use mapper_query::query::Dialect;
use std::path::PathBuf;

/// Prax Mapper - field-selection planning for resource graphs
#[derive(Parser, Debug)]
#[command(name = "prax-mapper")]
#[command(author = "Pegasus Heavy Industries LLC")]
#[command(version)]
#[command(about = "Prax Mapper - plan the columns and associations a field request needs", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate the resource graph declared in a config file
    Validate(ValidateArgs),

    /// Plan the selectors for a field request
    Plan(PlanArgs),

    /// Print the SQL a field request would issue
    Sql(SqlArgs),

    /// Display version information
    Version,
}

/// Where the resource graph comes from
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Path to the mapper config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Environment whose overrides to apply
    #[arg(short, long, env = "MAPPER_ENV")]
    pub env: Option<String>,
}

// =============================================================================
// Validate Command
// =============================================================================

/// Arguments for the `validate` command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

// =============================================================================
// Plan Command
// =============================================================================

/// Arguments for the `plan` command
#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Model to plan for
    #[arg(short, long)]
    pub model: String,

    /// Requested fields as JSON, e.g. '{"name": true, "posts": {"title": true}}'
    #[arg(short, long)]
    pub fields: String,

    /// Output format
    #[arg(long, default_value = "pretty")]
    pub format: OutputFormat,
}

/// Plan output formats
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable summary
    #[default]
    Pretty,
    /// JSON document
    Json,
}

// =============================================================================
// Sql Command
// =============================================================================

/// Arguments for the `sql` command
#[derive(Args, Debug)]
pub struct SqlArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Model to plan for
    #[arg(short, long)]
    pub model: String,

    /// Requested fields as JSON
    #[arg(short, long)]
    pub fields: String,

    /// Limit applied to the root model's query
    #[arg(short, long)]
    pub limit: Option<u64>,

    /// SQL dialect
    #[arg(short, long, default_value = "postgresql")]
    pub dialect: DialectArg,
}

/// Supported SQL dialects
#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum DialectArg {
    #[default]
    Postgresql,
    Mysql,
    Sqlite,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Postgresql => Dialect::Postgres,
            DialectArg::Mysql => Dialect::MySql,
            DialectArg::Sqlite => Dialect::Sqlite,
        }
    }
}

impl std::fmt::Display for DialectArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DialectArg::Postgresql => write!(f, "postgresql"),
            DialectArg::Mysql => write!(f, "mysql"),
            DialectArg::Sqlite => write!(f, "sqlite"),
        }
    }
}
