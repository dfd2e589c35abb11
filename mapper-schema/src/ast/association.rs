//! Association declarations between models.

use std::fmt;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::ModelId;

/// Cardinality of an association, seen from the owning model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssociationKind {
    /// The foreign key lives on the owning model (e.g., Post belongs to User).
    ManyToOne,
    /// The foreign key lives on the target model (e.g., User has many Posts).
    OneToMany,
    /// Connected through a chain of intermediate associations.
    ManyToMany,
}

impl AssociationKind {
    /// Parse a kind name, accepting the common aliases.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "many_to_one" | "to_one" | "belongs_to" => Some(Self::ManyToOne),
            "one_to_many" | "to_many" | "has_many" => Some(Self::OneToMany),
            "many_to_many" => Some(Self::ManyToMany),
            _ => None,
        }
    }

    /// Get the canonical kind name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ManyToOne => "many_to_one",
            Self::OneToMany => "one_to_many",
            Self::ManyToMany => "many_to_many",
        }
    }
}

impl fmt::Display for AssociationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ManyToOne => write!(f, "n:1"),
            Self::OneToMany => write!(f, "1:n"),
            Self::ManyToMany => write!(f, "m:n"),
        }
    }
}

/// Ordered, non-empty chain of association names a many-to-many
/// association is resolved through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SmolStr>", into = "Vec<SmolStr>")]
pub struct ThroughPath(Vec<SmolStr>);

impl ThroughPath {
    /// Create a through path. Returns `None` if the path is empty.
    pub fn new(steps: impl IntoIterator<Item = impl Into<SmolStr>>) -> Option<Self> {
        let steps: Vec<SmolStr> = steps.into_iter().map(Into::into).collect();
        if steps.is_empty() { None } else { Some(Self(steps)) }
    }

    /// The association traversed first.
    pub fn head(&self) -> &str {
        &self.0[0]
    }

    /// The associations traversed after the head, in order.
    pub fn tail(&self) -> &[SmolStr] {
        &self.0[1..]
    }

    /// All steps, in order.
    pub fn steps(&self) -> &[SmolStr] {
        &self.0
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; a through path has at least one step.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<SmolStr>> for ThroughPath {
    type Error = &'static str;

    fn try_from(steps: Vec<SmolStr>) -> Result<Self, Self::Error> {
        Self::new(steps).ok_or("through path must not be empty")
    }
}

impl From<ThroughPath> for Vec<SmolStr> {
    fn from(path: ThroughPath) -> Self {
        path.0
    }
}

/// An association from one model to another.
///
/// Each kind carries exactly the metadata it needs, so a graph cannot hold
/// a many-to-many association without a through path or a to-one
/// association without a join key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Association {
    /// Join key column lives on the owning model.
    ManyToOne {
        /// Target model.
        target: ModelId,
        /// Foreign key column on the owning model.
        key: SmolStr,
    },
    /// Join key column lives on the target model.
    OneToMany {
        /// Target model.
        target: ModelId,
        /// Foreign key column on the target model.
        key: SmolStr,
    },
    /// Resolved through a chain of other associations.
    ManyToMany {
        /// Target model.
        target: ModelId,
        /// Intermediate association chain.
        through: ThroughPath,
    },
}

impl Association {
    /// Create a to-one association.
    pub fn to_one(target: impl Into<ModelId>, key: impl Into<SmolStr>) -> Self {
        Self::ManyToOne {
            target: target.into(),
            key: key.into(),
        }
    }

    /// Create a to-many association.
    pub fn to_many(target: impl Into<ModelId>, key: impl Into<SmolStr>) -> Self {
        Self::OneToMany {
            target: target.into(),
            key: key.into(),
        }
    }

    /// Create a many-to-many association. Returns `None` if `through` is empty.
    pub fn many_to_many(
        target: impl Into<ModelId>,
        through: impl IntoIterator<Item = impl Into<SmolStr>>,
    ) -> Option<Self> {
        Some(Self::ManyToMany {
            target: target.into(),
            through: ThroughPath::new(through)?,
        })
    }

    /// Get the association kind.
    pub fn kind(&self) -> AssociationKind {
        match self {
            Self::ManyToOne { .. } => AssociationKind::ManyToOne,
            Self::OneToMany { .. } => AssociationKind::OneToMany,
            Self::ManyToMany { .. } => AssociationKind::ManyToMany,
        }
    }

    /// Get the target model.
    pub fn target(&self) -> &ModelId {
        match self {
            Self::ManyToOne { target, .. }
            | Self::OneToMany { target, .. }
            | Self::ManyToMany { target, .. } => target,
        }
    }

    /// Get the join key column, if this kind has one.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::ManyToOne { key, .. } | Self::OneToMany { key, .. } => Some(key.as_str()),
            Self::ManyToMany { .. } => None,
        }
    }

    /// Get the through path, if this is a many-to-many association.
    pub fn through(&self) -> Option<&ThroughPath> {
        match self {
            Self::ManyToMany { through, .. } => Some(through),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse_aliases() {
        assert_eq!(AssociationKind::parse("many_to_one"), Some(AssociationKind::ManyToOne));
        assert_eq!(AssociationKind::parse("belongs_to"), Some(AssociationKind::ManyToOne));
        assert_eq!(AssociationKind::parse("ONE_TO_MANY"), Some(AssociationKind::OneToMany));
        assert_eq!(AssociationKind::parse("has_many"), Some(AssociationKind::OneToMany));
        assert_eq!(AssociationKind::parse("many_to_many"), Some(AssociationKind::ManyToMany));
        assert_eq!(AssociationKind::parse("one_to_one"), None);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(AssociationKind::ManyToOne.to_string(), "n:1");
        assert_eq!(AssociationKind::ManyToMany.as_str(), "many_to_many");
    }

    #[test]
    fn test_through_path() {
        let path = ThroughPath::new(["taggings", "tag"]).unwrap();
        assert_eq!(path.head(), "taggings");
        assert_eq!(path.tail(), &[SmolStr::new("tag")]);
        assert_eq!(path.len(), 2);
        assert!(ThroughPath::new(Vec::<SmolStr>::new()).is_none());
    }

    #[test]
    fn test_association_accessors() {
        let author = Association::to_one("User", "author_id");
        assert_eq!(author.kind(), AssociationKind::ManyToOne);
        assert_eq!(author.target().as_str(), "User");
        assert_eq!(author.key(), Some("author_id"));
        assert!(author.through().is_none());

        let tags = Association::many_to_many("Tag", ["taggings", "tag"]).unwrap();
        assert_eq!(tags.kind(), AssociationKind::ManyToMany);
        assert_eq!(tags.key(), None);
        assert_eq!(tags.through().map(ThroughPath::head), Some("taggings"));
    }

    #[test]
    fn test_many_to_many_requires_path() {
        assert!(Association::many_to_many("Tag", Vec::<&str>::new()).is_none());
    }
}
