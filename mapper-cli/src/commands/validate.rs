//! `prax-mapper validate` command - Validate a declared resource graph.

use crate::cli::ValidateArgs;
use crate::commands::load_config;
use crate::error::{CliError, CliResult};
use crate::output::{self, success};

/// Run the validate command
pub async fn run(args: ValidateArgs) -> CliResult<()> {
    output::header("Validate Resource Graph");

    let (path, config) = load_config(&args.source)?;
    output::kv("Config", &path.display().to_string());
    if let Some(env) = &args.source.env {
        output::kv("Environment", env);
    }
    output::newline();

    output::step(1, 2, "Parsing config...");
    output::step(2, 2, "Building resource graph...");
    let graph = match config.resource_graph() {
        Ok(graph) => graph,
        Err(err) => {
            let errors = err.flatten();
            output::newline();
            output::error("Resource graph validation failed!");
            output::newline();
            output::section("Errors");
            for error in &errors {
                output::list_item(&format!("❌ {}", error));
            }
            return Err(CliError::Validation(format!(
                "Found {} validation errors",
                errors.len()
            )));
        }
    };

    output::newline();
    success("Resource graph is valid!");
    if graph.is_empty() {
        output::warn("No models declared; every plan request will fail with an unknown model");
    }
    output::newline();

    output::section("Summary");
    output::kv("Models", &graph.len().to_string());
    output::kv("Properties", &graph.property_count().to_string());
    output::kv("Associations", &graph.association_count().to_string());
    output::kv("Max depth", &config.planner.max_depth.to_string());

    Ok(())
}
