//! CLI command implementations.

pub mod plan;
pub mod sql;
pub mod validate;
pub mod version;

use std::path::PathBuf;

use mapper_query::{FieldTree, SelectorGenerator, SelectorPlan};
use mapper_schema::config::CONFIG_FILE_NAME;
use mapper_schema::{MapperConfig, ResourceGraph};

use crate::cli::SourceArgs;
use crate::error::{CliError, CliResult};

/// A loaded config and the resource graph it declares.
pub struct Loaded {
    /// Where the config was read from.
    pub path: PathBuf,
    /// The config with environment overrides applied.
    pub config: MapperConfig,
    /// The validated resource graph.
    pub graph: ResourceGraph,
}

/// Resolve the config path, defaulting to `mapper.toml` in the working directory.
pub fn config_path(source: &SourceArgs) -> CliResult<PathBuf> {
    let path = match &source.config {
        Some(path) => path.clone(),
        None => std::env::current_dir()?.join(CONFIG_FILE_NAME),
    };

    if !path.exists() {
        return Err(CliError::Config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }
    Ok(path)
}

/// Read a config file and apply the selected environment.
pub fn load_config(source: &SourceArgs) -> CliResult<(PathBuf, MapperConfig)> {
    let path = config_path(source)?;
    let mut config = MapperConfig::from_file(&path)?;
    if let Some(env) = &source.env {
        config = config.with_environment(env);
    }
    Ok((path, config))
}

/// Read a config file and build its resource graph.
pub fn load(source: &SourceArgs) -> CliResult<Loaded> {
    let (path, config) = load_config(source)?;
    let graph = config.resource_graph()?;
    Ok(Loaded {
        path,
        config,
        graph,
    })
}

/// Plan a JSON field request for a model.
pub fn plan_request(loaded: &Loaded, model: &str, fields: &str) -> CliResult<SelectorPlan> {
    let fields = FieldTree::parse(fields)?;
    let mut generator = SelectorGenerator::with_config(&loaded.graph, &loaded.config);
    generator.add_model(model, &fields)?;
    Ok(generator.finish())
}
