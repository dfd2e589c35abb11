//! The selector generator.
//!
//! Walks a requested [`FieldTree`] over a resource graph and records, per
//! model, which columns to select and which associations to load eagerly.
//! Property dependencies are expanded in place, and many-to-many
//! associations are rewritten into the chain of associations they go
//! through.

use mapper_schema::config::PlannerConfig;
use mapper_schema::{Association, Dependency, MapperConfig, ModelId, ModelRegistry, Resource};
use smol_str::SmolStr;
use tracing::{debug, trace};

use super::entry::SelectorPlan;
use crate::error::{QueryError, QueryResult};
use crate::fields::{FieldRequest, FieldTree, WILDCARD};

pub use mapper_schema::config::DEFAULT_MAX_DEPTH;

/// Accumulates a [`SelectorPlan`] for one planning call.
///
/// A generator owns its plan exclusively; use one generator per call.
///
/// ```rust
/// use mapper_query::{fields, SelectorGenerator};
/// use mapper_schema::{Association, Resource, ResourceGraph};
///
/// let graph = ResourceGraph::builder()
///     .resource(
///         Resource::new("User")
///             .with_association("posts", Association::to_many("Post", "user_id")),
///     )
///     .resource(Resource::new("Post"))
///     .build()
///     .unwrap();
///
/// let mut generator = SelectorGenerator::new(&graph);
/// generator.add_model("User", &fields! { posts: { title } }).unwrap();
/// let plan = generator.finish();
///
/// assert!(plan.get("User").unwrap().is_tracked("posts"));
/// assert!(plan.get("Post").unwrap().projection.includes("user_id"));
/// ```
#[derive(Debug)]
pub struct SelectorGenerator<'r, R: ModelRegistry + ?Sized> {
    registry: &'r R,
    selectors: SelectorPlan,
    max_depth: usize,
    log_plans: bool,
    expanding: Vec<String>,
    rewriting: Vec<String>,
}

impl<'r, R: ModelRegistry + ?Sized> SelectorGenerator<'r, R> {
    /// Create a generator with the default depth limit.
    pub fn new(registry: &'r R) -> Self {
        Self {
            registry,
            selectors: SelectorPlan::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            log_plans: false,
            expanding: Vec::new(),
            rewriting: Vec::new(),
        }
    }

    /// Create a generator using the planner and debug settings of a config.
    pub fn with_config(registry: &'r R, config: &MapperConfig) -> Self {
        let mut generator = Self::new(registry).with_planner_config(&config.planner);
        generator.log_plans = config.debug.log_plans;
        generator
    }

    /// Apply planner settings.
    pub fn with_planner_config(mut self, config: &PlannerConfig) -> Self {
        self.max_depth = config.max_depth;
        self
    }

    /// Set the maximum nesting of dependency and through-path expansion.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// The plan accumulated so far.
    pub fn selectors(&self) -> &SelectorPlan {
        &self.selectors
    }

    /// Consume the generator and return the finished plan.
    pub fn finish(self) -> SelectorPlan {
        debug!(models = self.selectors.len(), "Selector plan complete");
        if self.log_plans {
            debug!(plan = ?self.selectors, "Selector plan");
        }
        self.selectors
    }

    /// Plan a field tree for a model looked up in the registry.
    pub fn add_model(&mut self, model: &str, fields: &FieldTree) -> QueryResult<()> {
        let registry: &'r R = self.registry;
        let resource = registry
            .resource(&ModelId::new(model))
            .ok_or_else(|| QueryError::unknown_model(model).with_context(format!("Planning {}", model)))?;

        mapper_debug!(model = %model, fields = ?fields, "Planning selectors");
        self.add(resource, fields)
    }

    /// Map every requested field of a tree onto a resource.
    pub fn add(&mut self, resource: &Resource, fields: &FieldTree) -> QueryResult<()> {
        for (name, request) in fields {
            self.map_property(resource, name, request)?;
        }
        Ok(())
    }

    /// Dispatch one field: declared property, then association, then column.
    pub fn map_property(
        &mut self,
        resource: &Resource,
        name: &str,
        request: &FieldRequest,
    ) -> QueryResult<()> {
        if resource.has_property(name) {
            trace!(model = %resource.model, property = %name, "Mapping property");
            self.add_property(resource, name)
        } else if resource.has_association(name) {
            trace!(model = %resource.model, association = %name, "Mapping association");
            self.add_association(resource, name, request)
        } else {
            mapper_trace!(model = %resource.model, column = %name, "Selecting column");
            self.add_select(resource, name);
            Ok(())
        }
    }

    /// Select a column, or every column for `*`.
    pub fn add_select(&mut self, resource: &Resource, name: &str) {
        if name == WILDCARD {
            self.select_all(resource);
            return;
        }
        self.selectors.get_or_create(&resource.model).select(name);
    }

    /// Select every column of a model.
    pub fn select_all(&mut self, resource: &Resource) {
        self.selectors.get_or_create(&resource.model).select_all();
    }

    /// Mark an association for eager loading.
    pub fn add_track(&mut self, resource: &Resource, name: &str) {
        self.selectors.get_or_create(&resource.model).track(name);
    }

    /// Record an association and expand the fields requested through it.
    ///
    /// Requesting an association with `true` selects only its join key; the
    /// target's primary key is not added unless it is requested.
    ///
    /// ```rust
    /// use mapper_query::{fields, plan};
    /// use mapper_schema::{Association, Resource, ResourceGraph};
    ///
    /// let graph = ResourceGraph::builder()
    ///     .resource(Resource::new("User").with_association("posts", Association::to_many("Post", "user_id")))
    ///     .resource(Resource::new("Post"))
    ///     .build()
    ///     .unwrap();
    ///
    /// let selectors = plan(&graph, "User", &fields! { posts }).unwrap();
    /// let post = &selectors.get("Post").unwrap().projection;
    /// assert!(post.includes("user_id"));
    /// assert!(!post.includes("id"));
    /// ```
    pub fn add_association(
        &mut self,
        resource: &Resource,
        name: &str,
        request: &FieldRequest,
    ) -> QueryResult<()> {
        self.follow(resource, &[SmolStr::new(name)], request)
    }

    /// Follow a chain of associations from `resource`, then expand `request`
    /// on the model the chain ends at.
    ///
    /// A many-to-many step is spliced into the chain as its through path.
    /// Only that splicing is cycle-checked; once the chain ends, the caller's
    /// fields are expanded with the rewrite frames cleared.
    fn follow(
        &mut self,
        resource: &Resource,
        steps: &[SmolStr],
        request: &FieldRequest,
    ) -> QueryResult<()> {
        let Some((name, rest)) = steps.split_first() else {
            return self.expand(resource, request);
        };
        let association = resource
            .get_association(name)
            .ok_or_else(|| QueryError::unknown_association(resource.name(), name.as_str()))?;

        let target = match association {
            Association::ManyToOne { target, key } => {
                let target = self.resolve(resource, name, target)?;
                self.add_track(resource, name);
                self.add_select(resource, key);
                target
            }
            Association::OneToMany { target, key } => {
                let target = self.resolve(resource, name, target)?;
                self.add_track(resource, name);
                self.add_select(target, key);
                target
            }
            Association::ManyToMany { through, .. } => {
                trace!(
                    model = %resource.model,
                    association = %name,
                    through = %through.head(),
                    "Rewriting many-to-many association"
                );
                let frame = self.frame(&self.rewriting, resource, name)?;
                self.rewriting.push(frame);

                let spliced: Vec<SmolStr> = through.steps().iter().chain(rest).cloned().collect();
                let result = self.follow(resource, &spliced, request);
                self.rewriting.pop();
                return result;
            }
        };

        self.follow(target, rest, request)
    }

    fn expand(&mut self, target: &Resource, request: &FieldRequest) -> QueryResult<()> {
        let FieldRequest::Nested(fields) = request else {
            return Ok(());
        };

        let rewriting = std::mem::take(&mut self.rewriting);
        let result = self.add(target, fields);
        self.rewriting = rewriting;
        result
    }

    /// Expand the dependencies of a declared property.
    pub fn add_property(&mut self, resource: &Resource, name: &str) -> QueryResult<()> {
        let Some(property) = resource.get_property(name) else {
            return Ok(());
        };
        if !property.has_dependencies() {
            return Ok(());
        }

        self.enter(resource, name)?;
        let result = property
            .dependencies
            .iter()
            .try_for_each(|dependency| self.apply_dependency(resource, dependency));
        self.expanding.pop();
        result
    }

    /// Apply one dependency of a property declared on `resource`.
    pub fn apply_dependency(
        &mut self,
        resource: &Resource,
        dependency: &Dependency,
    ) -> QueryResult<()> {
        match dependency {
            Dependency::Field(name) => {
                self.map_property(resource, name, &FieldRequest::Nested(FieldTree::new()))
            }
            Dependency::Path(raw) => {
                let (head, tail) = dependency
                    .split_path()
                    .ok_or_else(|| QueryError::malformed_dependency(resource.name(), raw.as_str()))?;
                let request = FieldRequest::Nested(FieldTree::single(tail, FieldRequest::Leaf));
                self.add_association(resource, head, &request)
            }
        }
    }

    fn resolve(&self, resource: &Resource, name: &str, target: &ModelId) -> QueryResult<&'r Resource> {
        let registry: &'r R = self.registry;
        registry.resource(target).ok_or_else(|| {
            QueryError::unknown_model(target.as_str())
                .with_field(name)
                .with_context(format!("Resolving {}.{}", resource.name(), name))
        })
    }

    fn enter(&mut self, resource: &Resource, name: &str) -> QueryResult<()> {
        let frame = self.frame(&self.expanding, resource, name)?;
        self.expanding.push(frame);
        Ok(())
    }

    /// Build the `Model.name` frame for `stack`, rejecting repeats and
    /// expansion past `max_depth`.
    fn frame(&self, stack: &[String], resource: &Resource, name: &str) -> QueryResult<String> {
        let frame = format!("{}.{}", resource.name(), name);

        if stack.contains(&frame) {
            let mut path = stack.to_vec();
            path.push(frame);
            return Err(QueryError::dependency_cycle(&path).with_model(resource.name()));
        }
        if self.expanding.len() + self.rewriting.len() >= self.max_depth {
            return Err(QueryError::depth_exceeded(self.max_depth).with_field(frame));
        }

        Ok(frame)
    }
}

/// Plan a field tree for one model in a single call.
pub fn plan<R: ModelRegistry + ?Sized>(
    registry: &R,
    model: &str,
    fields: &FieldTree,
) -> QueryResult<SelectorPlan> {
    let mut generator = SelectorGenerator::new(registry);
    generator.add_model(model, fields)?;
    Ok(generator.finish())
}
