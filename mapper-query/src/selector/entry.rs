//! Per-model selector entries and the plan that collects them.

use indexmap::{IndexMap, IndexSet};
use mapper_schema::ModelId;
use serde::ser::{Serialize, SerializeSeq, Serializer};
use smol_str::SmolStr;
use tracing::trace;

/// Columns to fetch for one model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// Every column. Once reached, a projection never narrows again.
    All,
    /// Exactly these columns.
    Columns(IndexSet<SmolStr>),
}

impl Default for Projection {
    fn default() -> Self {
        Self::Columns(IndexSet::new())
    }
}

impl Projection {
    /// Check if every column is selected.
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Get the explicit column set, if the projection is not `All`.
    pub fn columns(&self) -> Option<&IndexSet<SmolStr>> {
        match self {
            Self::Columns(columns) => Some(columns),
            Self::All => None,
        }
    }

    /// Check if a column would be fetched.
    pub fn includes(&self, column: &str) -> bool {
        match self {
            Self::All => true,
            Self::Columns(columns) => columns.contains(column),
        }
    }

    /// Add a column. No-op once the projection is `All`.
    pub fn insert(&mut self, column: impl Into<SmolStr>) -> bool {
        match self {
            Self::All => false,
            Self::Columns(columns) => columns.insert(column.into()),
        }
    }

    /// Widen to every column.
    pub fn select_all(&mut self) {
        *self = Self::All;
    }

    /// Check if nothing is selected yet.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Columns(columns) if columns.is_empty())
    }
}

impl Serialize for Projection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::All => serializer.serialize_str("*"),
            Self::Columns(columns) => {
                let mut seq = serializer.serialize_seq(Some(columns.len()))?;
                for column in columns {
                    seq.serialize_element(column.as_str())?;
                }
                seq.end()
            }
        }
    }
}

/// What to load for one model: its projection and the associations to
/// resolve eagerly alongside it.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct SelectorEntry {
    /// Columns to fetch.
    #[serde(rename = "select")]
    pub projection: Projection,
    /// Associations to load eagerly.
    #[serde(rename = "track")]
    pub eager: IndexSet<SmolStr>,
}

impl SelectorEntry {
    /// Add a column to the projection.
    pub fn select(&mut self, column: impl Into<SmolStr>) -> bool {
        self.projection.insert(column)
    }

    /// Select every column.
    pub fn select_all(&mut self) {
        self.projection.select_all();
    }

    /// Mark an association for eager loading.
    pub fn track(&mut self, association: impl Into<SmolStr>) -> bool {
        self.eager.insert(association.into())
    }

    /// Check if an association is marked for eager loading.
    pub fn is_tracked(&self, association: &str) -> bool {
        self.eager.contains(association)
    }

    /// Check if the entry records nothing at all.
    pub fn is_empty(&self) -> bool {
        self.projection.is_empty() && self.eager.is_empty()
    }
}

/// The planner's result: one [`SelectorEntry`] per model reached.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct SelectorPlan {
    entries: IndexMap<ModelId, SelectorEntry>,
}

impl SelectorPlan {
    /// Create an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the entry for a model, creating an empty one on first access.
    pub fn get_or_create(&mut self, model: &ModelId) -> &mut SelectorEntry {
        if !self.entries.contains_key(model) {
            trace!(model = %model, "Creating selector entry");
        }
        self.entries.entry(model.clone()).or_default()
    }

    /// Get the entry for a model.
    pub fn get(&self, model: &str) -> Option<&SelectorEntry> {
        self.entries.get(model)
    }

    /// Check if a model has an entry.
    pub fn contains(&self, model: &str) -> bool {
        self.entries.contains_key(model)
    }

    /// Iterate over entries in the order models were first reached.
    pub fn iter(&self) -> impl Iterator<Item = (&ModelId, &SelectorEntry)> {
        self.entries.iter()
    }

    /// Iterate over the models in the plan.
    pub fn models(&self) -> impl Iterator<Item = &ModelId> {
        self.entries.keys()
    }

    /// Number of models in the plan.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the plan is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_all_is_monotonic() {
        let mut projection = Projection::default();
        assert!(projection.insert("id"));
        projection.select_all();
        assert!(!projection.insert("name"));
        assert!(projection.is_all());
        assert!(projection.includes("anything"));
    }

    #[test]
    fn test_projection_set_semantics() {
        let mut projection = Projection::default();
        assert!(projection.is_empty());
        assert!(projection.insert("id"));
        assert!(!projection.insert("id"));
        assert_eq!(projection.columns().map(IndexSet::len), Some(1));
        assert!(!projection.includes("name"));
    }

    #[test]
    fn test_entry_track() {
        let mut entry = SelectorEntry::default();
        assert!(entry.is_empty());
        assert!(entry.track("posts"));
        assert!(!entry.track("posts"));
        assert!(entry.is_tracked("posts"));
        assert!(!entry.is_empty());
    }

    #[test]
    fn test_get_or_create_is_idempotent() {
        let mut plan = SelectorPlan::new();
        let user = ModelId::new("User");
        plan.get_or_create(&user).select("id");
        plan.get_or_create(&user).select("name");

        assert_eq!(plan.len(), 1);
        assert!(plan.get("User").unwrap().projection.includes("name"));
    }

    #[test]
    fn test_serialize_plan() {
        let mut plan = SelectorPlan::new();
        plan.get_or_create(&ModelId::new("User")).track("posts");
        plan.get_or_create(&ModelId::new("Post")).select_all();

        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "User": {"select": [], "track": ["posts"]},
                "Post": {"select": "*", "track": []},
            })
        );
    }
}
