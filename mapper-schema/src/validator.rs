//! Resource graph validation.
//!
//! Checks performed when a graph is built:
//! - Every association targets a registered model
//! - Join keys are non-empty
//! - Every step of a through path names an association reachable from the
//!   previous step

use crate::ast::{Association, ModelId, Resource};
use crate::error::SchemaError;
use crate::graph::{ModelRegistry, ResourceGraph};

/// Resource graph validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<SchemaError>,
}

impl Validator {
    /// Create a new validator.
    pub fn new() -> Self {
        Self { errors: vec![] }
    }

    /// Validate a graph, returning every problem found.
    pub fn check(mut self, graph: &ResourceGraph) -> Vec<SchemaError> {
        for resource in graph.resources() {
            self.validate_resource(resource, graph);
        }
        self.errors
    }

    fn validate_resource(&mut self, resource: &Resource, graph: &ResourceGraph) {
        for (name, association) in &resource.associations {
            if graph.resource(association.target()).is_none() {
                self.errors.push(SchemaError::unknown_model(
                    resource.name(),
                    name.as_str(),
                    association.target().as_str(),
                ));
            }

            match association {
                Association::ManyToOne { key, .. } | Association::OneToMany { key, .. } => {
                    if key.trim().is_empty() {
                        self.errors.push(SchemaError::invalid_association(
                            resource.name(),
                            name.as_str(),
                            "join key must not be empty",
                        ));
                    }
                }
                Association::ManyToMany { through, .. } => {
                    self.validate_through(resource, name, through.steps(), graph);
                }
            }
        }
    }

    /// Walk a through path step by step from the owning model.
    fn validate_through(
        &mut self,
        resource: &Resource,
        name: &str,
        steps: &[smol_str::SmolStr],
        graph: &ResourceGraph,
    ) {
        let mut current: ModelId = resource.model.clone();

        for step in steps {
            let Some(owner) = graph.resource(&current) else {
                // Reported as an unknown model on the step that led here.
                return;
            };
            let Some(next) = owner.get_association(step) else {
                self.errors.push(SchemaError::invalid_association(
                    resource.name(),
                    name,
                    format!("through step `{}` is not an association of `{}`", step, current),
                ));
                return;
            };
            current = next.target().clone();
        }
    }
}
