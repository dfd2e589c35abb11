//! Model identifiers and resource declarations.

use std::borrow::Borrow;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::{Association, Dependency, Property};

/// Identity of a model in the resource graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(SmolStr);

impl ModelId {
    /// Create a new model id.
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self(name.into())
    }

    /// Get the model name as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ModelId {
    fn borrow(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for ModelId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ModelId {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<SmolStr> for ModelId {
    fn from(name: SmolStr) -> Self {
        Self(name)
    }
}

/// A resource: one model together with its declared properties and
/// associations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Model identity.
    pub model: ModelId,
    /// Backing table name.
    pub table: SmolStr,
    /// Primary key column(s).
    pub primary_key: Vec<SmolStr>,
    /// Declared properties, in declaration order.
    pub properties: IndexMap<SmolStr, Property>,
    /// Declared associations, in declaration order.
    pub associations: IndexMap<SmolStr, Association>,
}

impl Resource {
    /// Create a resource with no properties or associations.
    ///
    /// The table name defaults to the lowercased model name and the primary
    /// key to `id`.
    pub fn new(model: impl Into<ModelId>) -> Self {
        let model = model.into();
        let table = SmolStr::new(model.as_str().to_lowercase());
        Self {
            model,
            table,
            primary_key: vec![SmolStr::new_static("id")],
            properties: IndexMap::new(),
            associations: IndexMap::new(),
        }
    }

    /// Set the backing table name.
    pub fn with_table(mut self, table: impl Into<SmolStr>) -> Self {
        self.table = table.into();
        self
    }

    /// Set the primary key column(s).
    pub fn with_primary_key(mut self, columns: impl IntoIterator<Item = impl Into<SmolStr>>) -> Self {
        self.primary_key = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Declare a property with the given dependencies.
    pub fn with_property<D: Into<Dependency>>(
        mut self,
        name: impl Into<SmolStr>,
        dependencies: impl IntoIterator<Item = D>,
    ) -> Self {
        let property = Property::new(name).with_dependencies(dependencies);
        self.add_property(property);
        self
    }

    /// Declare a property that depends on nothing.
    pub fn with_plain_property(mut self, name: impl Into<SmolStr>) -> Self {
        self.add_property(Property::new(name));
        self
    }

    /// Declare an association.
    pub fn with_association(mut self, name: impl Into<SmolStr>, association: Association) -> Self {
        self.associations.insert(name.into(), association);
        self
    }

    /// Add a property to the resource.
    pub fn add_property(&mut self, property: Property) {
        self.properties.insert(property.name.clone(), property);
    }

    /// Get the model name as a string.
    pub fn name(&self) -> &str {
        self.model.as_str()
    }

    /// Get a property by name.
    pub fn get_property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    /// Get an association by name.
    pub fn get_association(&self, name: &str) -> Option<&Association> {
        self.associations.get(name)
    }

    /// Check if a property with this name is declared.
    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Check if an association with this name is declared.
    pub fn has_association(&self, name: &str) -> bool {
        self.associations.contains_key(name)
    }
}
