//! CLI error types and result alias.

use mapper_query::QueryError;
use mapper_schema::SchemaError;
use miette::Diagnostic;
use thiserror::Error;

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// IO error
    #[error("IO error: {0}")]
    #[diagnostic(code(mapper::io))]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    #[diagnostic(code(mapper::config))]
    Config(String),

    /// Resource graph error
    #[error(transparent)]
    #[diagnostic(transparent)]
    Schema(#[from] SchemaError),

    /// Validation error
    #[error("Validation error: {0}")]
    #[diagnostic(code(mapper::validation))]
    Validation(String),

    /// Planning error
    #[error("Planning error: {0}")]
    #[diagnostic(code(mapper::plan))]
    Plan(#[from] QueryError),

    /// Output error
    #[error("Output error: {0}")]
    #[diagnostic(code(mapper::output))]
    Output(String),
}

impl CliError {
    /// Render the error with every piece of context it carries.
    pub fn report(&self) -> String {
        match self {
            CliError::Plan(err) => err.display_full(),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Output(format!("Failed to serialize JSON: {}", err))
    }
}
