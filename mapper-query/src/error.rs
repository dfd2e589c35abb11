//! Error types for planning and query execution with actionable messages.
//!
//! Error codes follow a pattern: P{category}{number}
//! - 1xxx: Request errors (malformed field request, bad identity values)
//! - 5xxx: Execution errors (data store failures)
//! - 7xxx: Configuration errors (resource graph defects found while planning)
//! - 9xxx: Internal errors
//!
//! ```rust
//! use mapper_query::{ErrorCode, QueryError};
//!
//! let err = QueryError::unknown_association("User", "friends");
//! assert_eq!(err.code, ErrorCode::UnknownAssociation);
//! assert!(err.is_configuration_error());
//! assert!(err.to_string().contains("P7101"));
//! ```

use std::fmt;

use mapper_schema::SchemaError;
use thiserror::Error;

/// Result type for planning and query operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Request errors (1xxx)
    /// Field request is not a valid tree (P1004).
    InvalidFieldRequest = 1004,
    /// Identity values do not match the key shape (P1005).
    InvalidIdentity = 1005,

    // Execution errors (5xxx)
    /// General data store error (P5005).
    DatabaseError = 5005,

    // Configuration errors (7xxx)
    /// Invalid configuration (P7001).
    InvalidConfiguration = 7001,
    /// Association not declared on the model (P7101).
    UnknownAssociation = 7101,
    /// Model not present in the registry (P7102).
    UnknownModel = 7102,
    /// Many-to-many association without a through path (P7103).
    MissingThroughPath = 7103,
    /// Association kind outside the supported set (P7104).
    UnsupportedAssociationKind = 7104,
    /// Dotted dependency not of the form `association.property` (P7105).
    MalformedDependencyPath = 7105,
    /// Dependencies or through paths refer back to themselves (P7106).
    DependencyCycle = 7106,
    /// Expansion nested deeper than the configured limit (P7107).
    DepthExceeded = 7107,

    // Internal errors (9xxx)
    /// Internal error (P9001).
    Internal = 9001,
}

impl ErrorCode {
    /// Get the error code string (e.g., "P7101").
    pub fn code(&self) -> String {
        format!("P{}", *self as u16)
    }

    /// Get a short description of the error code.
    pub fn description(&self) -> &'static str {
        match self {
            Self::InvalidFieldRequest => "Invalid field request",
            Self::InvalidIdentity => "Invalid identity values",
            Self::DatabaseError => "Database error",
            Self::InvalidConfiguration => "Invalid configuration",
            Self::UnknownAssociation => "Unknown association",
            Self::UnknownModel => "Unknown model",
            Self::MissingThroughPath => "Missing through path",
            Self::UnsupportedAssociationKind => "Unsupported association kind",
            Self::MalformedDependencyPath => "Malformed dependency path",
            Self::DependencyCycle => "Dependency cycle",
            Self::DepthExceeded => "Expansion depth exceeded",
            Self::Internal => "Internal error",
        }
    }

    /// Check if the code is in the configuration category.
    pub fn is_configuration(&self) -> bool {
        (7000..8000).contains(&(*self as u16))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Additional context for an error.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation that was being performed.
    pub operation: Option<String>,
    /// The model involved.
    pub model: Option<String>,
    /// The field, association or dependency involved.
    pub field: Option<String>,
    /// The SQL query (if available).
    pub sql: Option<String>,
    /// Suggestions for fixing the error.
    pub suggestions: Vec<String>,
    /// Help text.
    pub help: Option<String>,
}

/// Errors that can occur while planning or executing queries.
#[derive(Error, Debug)]
pub struct QueryError {
    /// The error code.
    pub code: ErrorCode,
    /// The error message.
    pub message: String,
    /// Additional context.
    pub context: ErrorContext,
    /// The source error (if any).
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)
    }
}

impl QueryError {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Add context about the operation.
    pub fn with_context(mut self, operation: impl Into<String>) -> Self {
        self.context.operation = Some(operation.into());
        self
    }

    /// Add a suggestion for fixing the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.context.suggestions.push(suggestion.into());
        self
    }

    /// Add help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.context.help = Some(help.into());
        self
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.context.model = Some(model.into());
        self
    }

    /// Set the field.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.context.field = Some(field.into());
        self
    }

    /// Set the SQL query.
    pub fn with_sql(mut self, sql: impl Into<String>) -> Self {
        self.context.sql = Some(sql.into());
        self
    }

    /// Set the source error.
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // ============== Constructor Functions ==============

    /// An association was requested that the model does not declare.
    pub fn unknown_association(model: impl Into<String>, name: impl Into<String>) -> Self {
        let model = model.into();
        let name = name.into();
        Self::new(
            ErrorCode::UnknownAssociation,
            format!("missing association for {} with name {}", model, name),
        )
        .with_model(&model)
        .with_field(&name)
        .with_suggestion(format!("Declare `{}` as an association of `{}`", name, model))
        .with_suggestion("Check the head of dotted dependencies and the steps of through paths")
    }

    /// An association points at a model the registry does not know.
    pub fn unknown_model(model: impl Into<String>) -> Self {
        let model = model.into();
        Self::new(
            ErrorCode::UnknownModel,
            format!("model `{}` is not registered", model),
        )
        .with_model(&model)
        .with_suggestion("Register the target model before planning")
    }

    /// A many-to-many association has no through path.
    pub fn missing_through(model: impl Into<String>, name: impl Into<String>) -> Self {
        let model = model.into();
        let name = name.into();
        Self::new(
            ErrorCode::MissingThroughPath,
            format!("Association {} on {} must specify the `through` option", name, model),
        )
        .with_model(&model)
        .with_field(&name)
    }

    /// An association kind the planner cannot handle.
    pub fn unsupported_kind(
        model: impl Into<String>,
        name: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        let model = model.into();
        let name = name.into();
        Self::new(
            ErrorCode::UnsupportedAssociationKind,
            format!("no select applicable for {}", kind.into()),
        )
        .with_model(&model)
        .with_field(&name)
        .with_help("Supported kinds are many_to_one, one_to_many and many_to_many")
    }

    /// A dotted dependency that does not split into exactly two segments.
    pub fn malformed_dependency(model: impl Into<String>, dependency: impl Into<String>) -> Self {
        let model = model.into();
        let dependency = dependency.into();
        Self::new(
            ErrorCode::MalformedDependencyPath,
            format!(
                "dependency path `{}` on {} cannot be a single segment",
                dependency, model
            ),
        )
        .with_model(&model)
        .with_field(&dependency)
        .with_suggestion("Write path dependencies as `association.property`")
    }

    /// Expansion revisited a property or association already being expanded.
    pub fn dependency_cycle(path: &[String]) -> Self {
        Self::new(
            ErrorCode::DependencyCycle,
            format!("dependency cycle detected: {}", path.join(" -> ")),
        )
        .with_suggestion("Remove one of the dependencies or through steps that close the loop")
    }

    /// Expansion nested deeper than allowed.
    pub fn depth_exceeded(max_depth: usize) -> Self {
        Self::new(
            ErrorCode::DepthExceeded,
            format!("expansion exceeded the maximum depth of {}", max_depth),
        )
        .with_suggestion("Increase `planner.max_depth` if the nesting is intended")
    }

    /// A field request that is not a valid tree.
    pub fn invalid_field_request(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(
            ErrorCode::InvalidFieldRequest,
            format!("Invalid field request: {}", message),
        )
        .with_help("Field requests map names to `true` or to a nested request object")
    }

    /// Identity values that do not fit a composite key.
    pub fn invalid_identity(columns: usize, found: usize) -> Self {
        Self::new(
            ErrorCode::InvalidIdentity,
            format!(
                "composite key has {} columns but an identity value has {}",
                columns, found
            ),
        )
        .with_help("Pass one list per row, with a value for every key column")
    }

    /// Create a general database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
            .with_suggestion("Check the database logs for more details")
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(ErrorCode::Internal, format!("Internal error: {}", message))
    }

    // ============== Error Checks ==============

    /// Check if this error is a resource-graph configuration defect.
    pub fn is_configuration_error(&self) -> bool {
        self.code.is_configuration()
    }

    /// Display the full error with all context and suggestions.
    pub fn display_full(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Error [{}]: {}\n", self.code.code(), self.message));

        if let Some(ref op) = self.context.operation {
            output.push_str(&format!("  → While: {}\n", op));
        }
        if let Some(ref model) = self.context.model {
            output.push_str(&format!("  → Model: {}\n", model));
        }
        if let Some(ref field) = self.context.field {
            output.push_str(&format!("  → Field: {}\n", field));
        }
        if let Some(ref sql) = self.context.sql {
            output.push_str(&format!("  → SQL: {}\n", sql));
        }

        if !self.context.suggestions.is_empty() {
            output.push_str("\nSuggestions:\n");
            for (i, suggestion) in self.context.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion));
            }
        }

        if let Some(ref help) = self.context.help {
            output.push_str(&format!("\nHelp: {}\n", help));
        }

        output
    }
}

impl From<SchemaError> for QueryError {
    fn from(err: SchemaError) -> Self {
        let code = match &err {
            SchemaError::MissingThroughPath { .. } => ErrorCode::MissingThroughPath,
            SchemaError::UnsupportedAssociationKind { .. } => ErrorCode::UnsupportedAssociationKind,
            SchemaError::UnknownModel { .. } => ErrorCode::UnknownModel,
            _ => ErrorCode::InvalidConfiguration,
        };
        Self::new(code, err.to_string()).with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_format() {
        assert_eq!(ErrorCode::UnknownAssociation.code(), "P7101");
        assert_eq!(ErrorCode::InvalidFieldRequest.code(), "P1004");
        assert_eq!(ErrorCode::Internal.to_string(), "P9001");
    }

    #[test]
    fn test_configuration_classification() {
        assert!(QueryError::unknown_association("User", "friends").is_configuration_error());
        assert!(QueryError::malformed_dependency("User", "author").is_configuration_error());
        assert!(QueryError::dependency_cycle(&["User.a".into()]).is_configuration_error());
        assert!(!QueryError::invalid_field_request("bad").is_configuration_error());
        assert!(!QueryError::database("down").is_configuration_error());
    }

    #[test]
    fn test_unknown_association_context() {
        let err = QueryError::unknown_association("User", "friends");
        assert_eq!(err.context.model.as_deref(), Some("User"));
        assert_eq!(err.context.field.as_deref(), Some("friends"));
        assert!(err.message.contains("friends"));
    }

    #[test]
    fn test_malformed_dependency_message() {
        let err = QueryError::malformed_dependency("User", "author");
        assert!(err.to_string().contains("cannot be a single segment"));
    }

    #[test]
    fn test_dependency_cycle_message() {
        let err = QueryError::dependency_cycle(&["User.a".into(), "User.b".into(), "User.a".into()]);
        assert!(err.message.contains("User.a -> User.b -> User.a"));
    }

    #[test]
    fn test_from_schema_error() {
        let err: QueryError = SchemaError::missing_through("Post", "tags").into();
        assert_eq!(err.code, ErrorCode::MissingThroughPath);
        assert!(err.source.is_some());

        let err: QueryError = SchemaError::duplicate("model", "User").into();
        assert_eq!(err.code, ErrorCode::InvalidConfiguration);
    }

    #[test]
    fn test_display_full() {
        let err = QueryError::unknown_association("User", "friends").with_context("Planning User");
        let output = err.display_full();
        assert!(output.contains("P7101"));
        assert!(output.contains("While: Planning User"));
        assert!(output.contains("Suggestions"));
    }
}
