//! Derived properties and their dependency declarations.

use std::fmt;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// A declared property of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// Property name.
    pub name: SmolStr,
    /// What must be fetched to compute this property.
    pub dependencies: Vec<Dependency>,
}

impl Property {
    /// Create a property with no dependencies.
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            dependencies: Vec::new(),
        }
    }

    /// Set the dependencies.
    pub fn with_dependencies<D: Into<Dependency>>(
        mut self,
        dependencies: impl IntoIterator<Item = D>,
    ) -> Self {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    /// Check if selecting this property requires anything else.
    pub fn has_dependencies(&self) -> bool {
        !self.dependencies.is_empty()
    }
}

/// Something a property needs fetched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dependency {
    /// A property, association or column on the same model.
    Field(SmolStr),
    /// An `association.property` path, traversing one association.
    Path(SmolStr),
}

impl Dependency {
    /// Classify a dependency string: anything containing a `.` is a path.
    pub fn parse(raw: &str) -> Self {
        if raw.contains('.') {
            Self::Path(SmolStr::new(raw))
        } else {
            Self::Field(SmolStr::new(raw))
        }
    }

    /// Create a same-model dependency.
    pub fn field(name: impl Into<SmolStr>) -> Self {
        Self::Field(name.into())
    }

    /// Create a path dependency without checking its shape.
    pub fn path(raw: impl Into<SmolStr>) -> Self {
        Self::Path(raw.into())
    }

    /// Check if this is a path dependency.
    pub fn is_path(&self) -> bool {
        matches!(self, Self::Path(_))
    }

    /// Get the raw dependency text.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Field(name) | Self::Path(name) => name.as_str(),
        }
    }

    /// Split a path dependency into `(association, property)`.
    ///
    /// Returns `None` for field dependencies and for paths that do not
    /// consist of exactly two non-empty segments.
    pub fn split_path(&self) -> Option<(&str, &str)> {
        let Self::Path(raw) = self else {
            return None;
        };

        let mut segments = raw.split('.');
        match (segments.next(), segments.next(), segments.next()) {
            (Some(head), Some(tail), None) if !head.is_empty() && !tail.is_empty() => {
                Some((head, tail))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Dependency {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<String> for Dependency {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field() {
        assert_eq!(Dependency::parse("profile_picture"), Dependency::field("profile_picture"));
        assert!(!Dependency::parse("name").is_path());
    }

    #[test]
    fn test_parse_path() {
        let dep = Dependency::parse("author.name");
        assert!(dep.is_path());
        assert_eq!(dep.split_path(), Some(("author", "name")));
    }

    #[test]
    fn test_split_path_rejects_single_segment() {
        assert_eq!(Dependency::path("author").split_path(), None);
        assert_eq!(Dependency::path("author.").split_path(), None);
        assert_eq!(Dependency::path(".name").split_path(), None);
    }

    #[test]
    fn test_split_path_rejects_three_segments() {
        assert_eq!(Dependency::path("author.company.name").split_path(), None);
    }

    #[test]
    fn test_field_never_splits() {
        assert_eq!(Dependency::field("author").split_path(), None);
    }

    #[test]
    fn test_property_dependencies() {
        let property = Property::new("full_name").with_dependencies(["first_name", "last_name"]);
        assert!(property.has_dependencies());
        assert_eq!(property.dependencies[1].as_str(), "last_name");
        assert!(!Property::new("email").has_dependencies());
    }
}
