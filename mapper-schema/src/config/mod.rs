//! Configuration file parsing for `mapper.toml`.
//!
//! A configuration file declares planner settings and the resource graph:
//!
//! ```toml
//! [planner]
//! max_depth = 32
//!
//! [models.User]
//! table = "users"
//! properties = { display_name = ["profile_picture"] }
//!
//! [models.User.associations.posts]
//! kind = "one_to_many"
//! model = "Post"
//! key = "user_id"
//!
//! [models.Post]
//! table = "posts"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::ast::{Association, AssociationKind, Resource, ThroughPath};
use crate::error::{SchemaError, SchemaResult};
use crate::graph::ResourceGraph;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "mapper.toml";

/// Default limit on nested dependency and through-path expansion.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Main configuration structure for `mapper.toml`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MapperConfig {
    /// Planner settings.
    #[serde(default)]
    pub planner: PlannerConfig,

    /// Debug/logging settings.
    #[serde(default)]
    pub debug: DebugConfig,

    /// Resource declarations keyed by model name.
    #[serde(default)]
    pub models: IndexMap<String, ModelConfig>,

    /// Environment-specific overrides.
    #[serde(default)]
    pub environments: HashMap<String, EnvironmentOverride>,
}

impl MapperConfig {
    /// Load configuration from a file path.
    pub fn from_file(path: impl AsRef<Path>) -> SchemaResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| SchemaError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> SchemaResult<Self> {
        let expanded = expand_env_vars(content);

        toml::from_str(&expanded).map_err(|e| SchemaError::TomlError { source: e })
    }

    /// Apply environment-specific overrides.
    pub fn with_environment(mut self, env: &str) -> Self {
        if let Some(overrides) = self.environments.remove(env) {
            if let Some(planner) = overrides.planner {
                if let Some(max_depth) = planner.max_depth {
                    self.planner.max_depth = max_depth;
                }
            }
            if let Some(debug) = overrides.debug {
                if let Some(log_plans) = debug.log_plans {
                    self.debug.log_plans = log_plans;
                }
            }
        }
        self
    }

    /// Build and validate the declared resource graph.
    pub fn resource_graph(&self) -> SchemaResult<ResourceGraph> {
        let mut errors = Vec::new();
        let mut resources = Vec::with_capacity(self.models.len());

        for (name, model) in &self.models {
            match model.to_resource(name) {
                Ok(resource) => resources.push(resource),
                Err(mut model_errors) => errors.append(&mut model_errors),
            }
        }

        if !errors.is_empty() {
            return Err(SchemaError::ValidationFailed {
                count: errors.len(),
                errors,
            });
        }

        ResourceGraph::builder().resources(resources).build()
    }
}

/// Planner configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PlannerConfig {
    /// Maximum nesting of dependency and through-path expansion.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

/// Debug/logging configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DebugConfig {
    /// Log every finished plan at debug level.
    #[serde(default)]
    pub log_plans: bool,
}

/// Declaration of one model.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    /// Backing table (defaults to the lowercased model name).
    pub table: Option<String>,

    /// Primary key column(s).
    #[serde(default)]
    pub primary_key: Option<Vec<String>>,

    /// Properties and their dependencies.
    #[serde(default)]
    pub properties: IndexMap<String, Vec<String>>,

    /// Associations keyed by name.
    #[serde(default)]
    pub associations: IndexMap<String, AssociationConfig>,
}

impl ModelConfig {
    fn to_resource(&self, name: &str) -> Result<Resource, Vec<SchemaError>> {
        let mut resource = Resource::new(name);
        if let Some(ref table) = self.table {
            resource = resource.with_table(table.as_str());
        }
        if let Some(ref pk) = self.primary_key {
            resource = resource.with_primary_key(pk.iter().map(String::as_str));
        }
        for (property, dependencies) in &self.properties {
            resource = resource.with_property(property.as_str(), dependencies.iter().map(String::as_str));
        }

        let mut errors = Vec::new();
        for (assoc_name, assoc) in &self.associations {
            match assoc.to_association(name, assoc_name) {
                Ok(association) => {
                    resource = resource.with_association(assoc_name.as_str(), association);
                }
                Err(e) => errors.push(e),
            }
        }

        if errors.is_empty() { Ok(resource) } else { Err(errors) }
    }
}

/// Declaration of one association.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AssociationConfig {
    /// Association kind (`many_to_one`, `one_to_many`, `many_to_many` or an alias).
    pub kind: String,

    /// Target model name.
    pub model: String,

    /// Join key column.
    pub key: Option<String>,

    /// Intermediate association chain for many-to-many.
    pub through: Option<Vec<String>>,
}

impl AssociationConfig {
    fn to_association(&self, model: &str, name: &str) -> SchemaResult<Association> {
        let kind = AssociationKind::parse(&self.kind)
            .ok_or_else(|| SchemaError::unsupported_kind(model, name, self.kind.as_str()))?;

        match kind {
            AssociationKind::ManyToOne | AssociationKind::OneToMany => {
                let key = self.key.as_deref().ok_or_else(|| {
                    SchemaError::invalid_association(
                        model,
                        name,
                        format!("`{}` association requires a `key`", kind.as_str()),
                    )
                })?;
                Ok(if kind == AssociationKind::ManyToOne {
                    Association::to_one(self.model.as_str(), key)
                } else {
                    Association::to_many(self.model.as_str(), key)
                })
            }
            AssociationKind::ManyToMany => {
                let through = self
                    .through
                    .as_ref()
                    .and_then(|steps| ThroughPath::new(steps.iter().map(|s| SmolStr::new(s))))
                    .ok_or_else(|| SchemaError::missing_through(model, name))?;
                Ok(Association::ManyToMany {
                    target: self.model.as_str().into(),
                    through,
                })
            }
        }
    }
}

/// Environment-specific configuration overrides.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentOverride {
    /// Planner overrides.
    pub planner: Option<PlannerOverride>,

    /// Debug overrides.
    pub debug: Option<DebugOverride>,
}

/// Planner configuration overrides.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PlannerOverride {
    /// Override max_depth.
    pub max_depth: Option<usize>,
}

/// Debug configuration overrides.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DebugOverride {
    /// Override log_plans.
    pub log_plans: Option<bool>,
}

/// Expand environment variables in the format `${VAR_NAME}`.
fn expand_env_vars(content: &str) -> String {
    let Ok(re) = regex_lite::Regex::new(r"\$\{([^}]+)\}") else {
        return content.to_string();
    };

    re.replace_all(content, |caps: &regex_lite::Captures<'_>| {
        std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ModelRegistry;

    const BLOG: &str = r#"
        [planner]
        max_depth = 16

        [models.User]
        table = "users"
        properties = { display_name = ["profile_picture"], email = [] }

        [models.User.associations.posts]
        kind = "one_to_many"
        model = "Post"
        key = "user_id"

        [models.Post]
        table = "posts"

        [models.Post.associations.author]
        kind = "belongs_to"
        model = "User"
        key = "user_id"

        [models.Post.associations.taggings]
        kind = "has_many"
        model = "Tagging"
        key = "post_id"

        [models.Post.associations.tags]
        kind = "many_to_many"
        model = "Tag"
        through = ["taggings", "tag"]

        [models.Tagging.associations.tag]
        kind = "many_to_one"
        model = "Tag"
        key = "tag_id"

        [models.Tag]
    "#;

    #[test]
    fn test_default_config() {
        let config = MapperConfig::default();
        assert_eq!(config.planner.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(MapperConfig::from_str("").unwrap().planner.max_depth, DEFAULT_MAX_DEPTH);
        assert!(!config.debug.log_plans);
        assert!(config.models.is_empty());
    }

    #[test]
    fn test_parse_blog_graph() {
        let config = MapperConfig::from_str(BLOG).unwrap();
        assert_eq!(config.planner.max_depth, 16);

        let graph = config.resource_graph().unwrap();
        assert_eq!(graph.len(), 4);

        let user = graph.get("User").unwrap();
        assert_eq!(user.table, "users");
        assert!(user.has_property("display_name"));
        assert!(!user.get_property("email").unwrap().has_dependencies());

        let post = graph.get("Post").unwrap();
        assert_eq!(
            post.get_association("author").map(Association::kind),
            Some(AssociationKind::ManyToOne)
        );
        assert_eq!(
            post.get_association("tags").and_then(Association::through).map(ThroughPath::len),
            Some(2)
        );
        assert!(graph.resource(&"Tag".into()).is_some());
    }

    #[test]
    fn test_unsupported_kind() {
        let toml = r#"
            [models.User.associations.friends]
            kind = "polymorphic"
            model = "User"
        "#;
        let errors = MapperConfig::from_str(toml).unwrap().resource_graph().unwrap_err().flatten();
        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], SchemaError::UnsupportedAssociationKind { kind, .. } if kind == "polymorphic"));
    }

    #[test]
    fn test_missing_through() {
        let toml = r#"
            [models.Post.associations.tags]
            kind = "many_to_many"
            model = "Post"
        "#;
        let errors = MapperConfig::from_str(toml).unwrap().resource_graph().unwrap_err().flatten();
        assert!(matches!(&errors[0], SchemaError::MissingThroughPath { association, .. } if association == "tags"));
    }

    #[test]
    fn test_empty_through() {
        let toml = r#"
            [models.Post.associations.tags]
            kind = "many_to_many"
            model = "Post"
            through = []
        "#;
        let errors = MapperConfig::from_str(toml).unwrap().resource_graph().unwrap_err().flatten();
        assert!(matches!(&errors[0], SchemaError::MissingThroughPath { .. }));
    }

    #[test]
    fn test_missing_key() {
        let toml = r#"
            [models.Post.associations.author]
            kind = "many_to_one"
            model = "Post"
        "#;
        let errors = MapperConfig::from_str(toml).unwrap().resource_graph().unwrap_err().flatten();
        assert!(errors[0].to_string().contains("requires a `key`"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let toml = r#"
            [planner]
            max_depht = 3
        "#;
        assert!(matches!(
            MapperConfig::from_str(toml),
            Err(SchemaError::TomlError { .. })
        ));
    }

    #[test]
    fn test_environment_override() {
        let toml = r#"
            [planner]
            max_depth = 64

            [environments.test.planner]
            max_depth = 4

            [environments.test.debug]
            log_plans = true
        "#;
        let config = MapperConfig::from_str(toml).unwrap().with_environment("test");
        assert_eq!(config.planner.max_depth, 4);
        assert!(config.debug.log_plans);
    }

    #[test]
    fn test_env_var_expansion() {
        // SAFETY: This test runs single-threaded and we clean up after
        unsafe {
            std::env::set_var("MAPPER_TEST_TABLE", "people");
        }
        let expanded = expand_env_vars("table = \"${MAPPER_TEST_TABLE}\"");
        assert_eq!(expanded, "table = \"people\"");
        unsafe {
            std::env::remove_var("MAPPER_TEST_TABLE");
        }
    }

    #[test]
    fn test_unset_env_var_left_alone() {
        let expanded = expand_env_vars("table = \"${MAPPER_SURELY_UNSET_VAR}\"");
        assert_eq!(expanded, "table = \"${MAPPER_SURELY_UNSET_VAR}\"");
    }
}
