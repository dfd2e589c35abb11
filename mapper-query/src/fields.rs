//! Requested field trees.
//!
//! A field tree maps field names to either `true` ("just this field") or a
//! nested tree ("this is an association, descend with these fields"). The
//! name `*` selects every column of the model.
//!
//! ```rust
//! use mapper_query::{fields, FieldRequest, FieldTree};
//!
//! let tree = fields! { name, posts: { title, comments: { * } } };
//! assert_eq!(tree.len(), 2);
//! assert!(matches!(tree.get("posts"), Some(FieldRequest::Nested(_))));
//!
//! let parsed = FieldTree::parse(r#"{"name": true, "posts": {"title": true, "comments": {"*": true}}}"#).unwrap();
//! assert_eq!(parsed, tree);
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::{QueryError, QueryResult};

/// Field name that selects every column.
pub const WILDCARD: &str = "*";

/// What is requested for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRequest", into = "RawRequest")]
pub enum FieldRequest {
    /// The field itself, nothing nested (`true`).
    Leaf,
    /// Fields requested on the far side of an association.
    Nested(FieldTree),
}

impl FieldRequest {
    /// Check if this is the literal `true` request.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf)
    }

    /// Get the nested tree, if any.
    pub fn as_nested(&self) -> Option<&FieldTree> {
        match self {
            Self::Nested(tree) => Some(tree),
            Self::Leaf => None,
        }
    }
}

impl From<FieldTree> for FieldRequest {
    fn from(tree: FieldTree) -> Self {
        Self::Nested(tree)
    }
}

#[derive(Deserialize, Serialize)]
#[serde(untagged)]
enum RawRequest {
    Flag(bool),
    Tree(IndexMap<SmolStr, FieldRequest>),
}

impl TryFrom<RawRequest> for FieldRequest {
    type Error = String;

    fn try_from(raw: RawRequest) -> Result<Self, Self::Error> {
        match raw {
            RawRequest::Flag(true) => Ok(Self::Leaf),
            RawRequest::Flag(false) => {
                Err("`false` is not a field request; omit the field instead".to_string())
            }
            RawRequest::Tree(fields) => Ok(Self::Nested(FieldTree { fields })),
        }
    }
}

impl From<FieldRequest> for RawRequest {
    fn from(request: FieldRequest) -> Self {
        match request {
            FieldRequest::Leaf => Self::Flag(true),
            FieldRequest::Nested(tree) => Self::Tree(tree.fields),
        }
    }
}

/// An ordered tree of requested fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldTree {
    fields: IndexMap<SmolStr, FieldRequest>,
}

impl FieldTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tree holding a single entry.
    pub fn single(name: impl Into<SmolStr>, request: FieldRequest) -> Self {
        let mut tree = Self::new();
        tree.insert(name, request);
        tree
    }

    /// Parse a tree from JSON text.
    pub fn parse(json: &str) -> QueryResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| QueryError::invalid_field_request(e.to_string()).with_source(e))
    }

    /// Convert a JSON value into a tree.
    pub fn from_json(value: serde_json::Value) -> QueryResult<Self> {
        serde_json::from_value(value)
            .map_err(|e| QueryError::invalid_field_request(e.to_string()).with_source(e))
    }

    /// Request a field with no nesting.
    pub fn field(mut self, name: impl Into<SmolStr>) -> Self {
        self.insert(name, FieldRequest::Leaf);
        self
    }

    /// Request an association with nested fields.
    pub fn nested(mut self, name: impl Into<SmolStr>, tree: FieldTree) -> Self {
        self.insert(name, FieldRequest::Nested(tree));
        self
    }

    /// Insert or replace a request.
    pub fn insert(&mut self, name: impl Into<SmolStr>, request: FieldRequest) {
        self.fields.insert(name.into(), request);
    }

    /// Get the request for a field.
    pub fn get(&self, name: &str) -> Option<&FieldRequest> {
        self.fields.get(name)
    }

    /// Iterate over requests in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&SmolStr, &FieldRequest)> {
        self.fields.iter()
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if nothing is requested.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'a> IntoIterator for &'a FieldTree {
    type Item = (&'a SmolStr, &'a FieldRequest);
    type IntoIter = indexmap::map::Iter<'a, SmolStr, FieldRequest>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// Build a [`FieldTree`] from a nested field list.
///
/// ```rust
/// use mapper_query::fields;
///
/// let tree = fields! { *, author: { name } };
/// assert!(tree.get("*").is_some());
/// ```
#[macro_export]
macro_rules! fields {
    (@insert $tree:ident; ) => {};
    (@insert $tree:ident; $name:tt : { $($inner:tt)* } $(, $($rest:tt)*)?) => {
        $tree.insert(
            stringify!($name),
            $crate::FieldRequest::Nested($crate::fields!($($inner)*)),
        );
        $crate::fields!(@insert $tree; $($($rest)*)?);
    };
    (@insert $tree:ident; $name:tt $(, $($rest:tt)*)?) => {
        $tree.insert(stringify!($name), $crate::FieldRequest::Leaf);
        $crate::fields!(@insert $tree; $($($rest)*)?);
    };
    ($($body:tt)*) => {{
        #[allow(unused_mut)]
        let mut tree = $crate::FieldTree::new();
        $crate::fields!(@insert tree; $($body)*);
        tree
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builder() {
        let tree = FieldTree::new()
            .field("name")
            .nested("posts", FieldTree::new().field("title"));

        assert_eq!(tree.len(), 2);
        assert!(tree.get("name").unwrap().is_leaf());
        assert_eq!(
            tree.get("posts").and_then(FieldRequest::as_nested).map(FieldTree::len),
            Some(1)
        );
    }

    #[test]
    fn test_macro_matches_builder() {
        let built = FieldTree::new()
            .field("*")
            .nested("posts", FieldTree::new().field("title").nested("tags", FieldTree::new()));

        assert_eq!(fields! { *, posts: { title, tags: {} } }, built);
        assert!(fields!().is_empty());
    }

    #[test]
    fn test_parse_json() {
        let tree = FieldTree::parse(r#"{"id": true, "author": {"name": true}}"#).unwrap();
        let names: Vec<_> = tree.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["id", "author"]);
    }

    #[test]
    fn test_parse_rejects_false() {
        let err = FieldTree::parse(r#"{"id": false}"#).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::InvalidFieldRequest);
    }

    #[test]
    fn test_parse_rejects_scalars() {
        assert!(FieldTree::parse(r#"{"id": 1}"#).is_err());
        assert!(FieldTree::parse(r#"["id"]"#).is_err());
    }

    #[test]
    fn test_serialize_round_trip_shape() {
        let tree = fields! { id, author: { name } };
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json, serde_json::json!({"id": true, "author": {"name": true}}));
    }

    #[test]
    fn test_single() {
        let tree = FieldTree::single("title", FieldRequest::Leaf);
        assert_eq!(tree, fields! { title });
    }
}
