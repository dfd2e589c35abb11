//! Error types for resource graph construction and configuration.

// These warnings are false positives - the fields are used by derive macros
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur while declaring or loading a resource graph.
#[derive(Error, Debug, Diagnostic)]
pub enum SchemaError {
    /// Error reading a file.
    #[error("failed to read file: {path}")]
    #[diagnostic(code(prax::mapper::io_error))]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid association definition.
    #[error("invalid association `{model}.{association}`: {message}")]
    #[diagnostic(code(prax::mapper::invalid_association))]
    InvalidAssociation {
        model: String,
        association: String,
        message: String,
    },

    /// Many-to-many association declared without its intermediate path.
    #[error("association `{model}.{association}` must specify a `through` path")]
    #[diagnostic(
        code(prax::mapper::missing_through),
        help("list the intermediate associations, e.g. through = [\"post_tags\", \"tag\"]")
    )]
    MissingThroughPath { model: String, association: String },

    /// Association kind outside the supported set.
    #[error("unsupported association kind `{kind}` for `{model}.{association}`")]
    #[diagnostic(
        code(prax::mapper::unsupported_kind),
        help("supported kinds are many_to_one, one_to_many and many_to_many")
    )]
    UnsupportedAssociationKind {
        model: String,
        association: String,
        kind: String,
    },

    /// Association target is not a registered model.
    #[error("unknown model `{target}` referenced by `{model}.{association}`")]
    #[diagnostic(code(prax::mapper::unknown_model))]
    UnknownModel {
        model: String,
        association: String,
        target: String,
    },

    /// Duplicate definition.
    #[error("duplicate {kind} `{name}`")]
    #[diagnostic(code(prax::mapper::duplicate))]
    Duplicate { kind: String, name: String },

    /// Configuration error.
    #[error("configuration error: {message}")]
    #[diagnostic(code(prax::mapper::config_error))]
    ConfigError { message: String },

    /// TOML parsing error.
    #[error("failed to parse TOML")]
    #[diagnostic(code(prax::mapper::toml_error))]
    TomlError {
        #[source]
        source: toml::de::Error,
    },

    /// Validation error with multiple issues.
    #[error("resource graph validation failed with {count} error(s)")]
    #[diagnostic(code(prax::mapper::validation_failed))]
    ValidationFailed {
        count: usize,
        #[related]
        errors: Vec<SchemaError>,
    },
}

impl SchemaError {
    /// Create an invalid association error.
    pub fn invalid_association(
        model: impl Into<String>,
        association: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidAssociation {
            model: model.into(),
            association: association.into(),
            message: message.into(),
        }
    }

    /// Create a missing through-path error.
    pub fn missing_through(model: impl Into<String>, association: impl Into<String>) -> Self {
        Self::MissingThroughPath {
            model: model.into(),
            association: association.into(),
        }
    }

    /// Create an unsupported association kind error.
    pub fn unsupported_kind(
        model: impl Into<String>,
        association: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self::UnsupportedAssociationKind {
            model: model.into(),
            association: association.into(),
            kind: kind.into(),
        }
    }

    /// Create an unknown model error.
    pub fn unknown_model(
        model: impl Into<String>,
        association: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self::UnknownModel {
            model: model.into(),
            association: association.into(),
            target: target.into(),
        }
    }

    /// Create a duplicate definition error.
    pub fn duplicate(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Duplicate {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Flatten aggregated validation failures into their individual errors.
    pub fn flatten(self) -> Vec<SchemaError> {
        match self {
            Self::ValidationFailed { errors, .. } => {
                errors.into_iter().flat_map(SchemaError::flatten).collect()
            }
            other => vec![other],
        }
    }
}
