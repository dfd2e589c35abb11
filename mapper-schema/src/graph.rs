//! The resource graph and the registry seam used to resolve models.

use indexmap::IndexMap;
use tracing::debug;

use crate::ast::{ModelId, Resource};
use crate::error::{SchemaError, SchemaResult};
use crate::validator::Validator;

/// Resolves model identities to resource declarations.
///
/// The planner only ever looks models up through this trait, so any
/// metadata store can back it.
pub trait ModelRegistry {
    /// Look up the resource declared for a model.
    fn resource(&self, model: &ModelId) -> Option<&Resource>;
}

impl<R: ModelRegistry + ?Sized> ModelRegistry for &R {
    fn resource(&self, model: &ModelId) -> Option<&Resource> {
        (**self).resource(model)
    }
}

/// A validated set of resources keyed by model.
#[derive(Debug, Clone, Default)]
pub struct ResourceGraph {
    resources: IndexMap<ModelId, Resource>,
}

impl ResourceGraph {
    /// Start building a resource graph.
    pub fn builder() -> ResourceGraphBuilder {
        ResourceGraphBuilder::default()
    }

    /// Get a resource by model name.
    pub fn get(&self, model: &str) -> Option<&Resource> {
        self.resources.get(model)
    }

    /// Iterate over all resources in declaration order.
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }

    /// Iterate over all model ids in declaration order.
    pub fn models(&self) -> impl Iterator<Item = &ModelId> {
        self.resources.keys()
    }

    /// Number of resources.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Check if the graph has no resources.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Total number of declared associations across all resources.
    pub fn association_count(&self) -> usize {
        self.resources.values().map(|r| r.associations.len()).sum()
    }

    /// Total number of declared properties across all resources.
    pub fn property_count(&self) -> usize {
        self.resources.values().map(|r| r.properties.len()).sum()
    }
}

impl ModelRegistry for ResourceGraph {
    fn resource(&self, model: &ModelId) -> Option<&Resource> {
        self.resources.get(model)
    }
}

/// Builder for [`ResourceGraph`]. Validation runs in [`build`](Self::build).
#[derive(Debug, Default)]
pub struct ResourceGraphBuilder {
    resources: Vec<Resource>,
}

impl ResourceGraphBuilder {
    /// Add a resource.
    pub fn resource(mut self, resource: Resource) -> Self {
        self.resources.push(resource);
        self
    }

    /// Add several resources.
    pub fn resources(mut self, resources: impl IntoIterator<Item = Resource>) -> Self {
        self.resources.extend(resources);
        self
    }

    /// Validate the collected resources and build the graph.
    pub fn build(self) -> SchemaResult<ResourceGraph> {
        let mut errors = Vec::new();
        let mut resources = IndexMap::with_capacity(self.resources.len());

        for resource in self.resources {
            if resources.contains_key(&resource.model) {
                errors.push(SchemaError::duplicate("model", resource.name()));
                continue;
            }
            resources.insert(resource.model.clone(), resource);
        }

        let graph = ResourceGraph { resources };
        errors.extend(Validator::new().check(&graph));

        if !errors.is_empty() {
            return Err(SchemaError::ValidationFailed {
                count: errors.len(),
                errors,
            });
        }

        debug!(
            models = graph.len(),
            associations = graph.association_count(),
            "Resource graph built"
        );
        Ok(graph)
    }
}
