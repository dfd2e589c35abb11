//! Values bound into statements and returned in rows.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A parameter or column value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlValue {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// String value.
    String(String),
    /// List of values, used for composite identities.
    List(Vec<SqlValue>),
    /// JSON value.
    Json(serde_json::Value),
}

impl SqlValue {
    /// Check if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Get the list items, if this is a list.
    pub fn as_list(&self) -> Option<&[SqlValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

/// A result row, keyed by column name in the order the data store returned
/// them.
pub type Row = IndexMap<String, SqlValue>;

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<serde_json::Value> for SqlValue {
    fn from(v: serde_json::Value) -> Self {
        Self::Json(v)
    }
}

impl<T: Into<SqlValue>> From<Vec<T>> for SqlValue {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(SqlValue::from(7), SqlValue::Int(7));
        assert_eq!(SqlValue::from("a"), SqlValue::String("a".into()));
        assert!(SqlValue::from(None::<i64>).is_null());
        assert_eq!(
            SqlValue::from(vec!["foo", "bar"]).as_list().map(<[SqlValue]>::len),
            Some(2)
        );
    }

    #[test]
    fn test_row_deserialize() {
        let row: Row = serde_json::from_str(r#"{"id": 1, "name": "Ada", "bio": null}"#).unwrap();
        assert_eq!(row["id"], SqlValue::Int(1));
        assert_eq!(row["name"], SqlValue::String("Ada".into()));
        assert!(row["bio"].is_null());
    }
}
