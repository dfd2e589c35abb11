//! `prax-mapper plan` command - Plan the selectors for a field request.

use mapper_query::{Projection, SelectorPlan};

use crate::cli::{OutputFormat, PlanArgs};
use crate::commands::{load, plan_request};
use crate::error::CliResult;
use crate::output;

/// Run the plan command
pub async fn run(args: PlanArgs) -> CliResult<()> {
    let loaded = load(&args.source)?;
    let plan = plan_request(&loaded, &args.model, &args.fields)?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
        OutputFormat::Pretty => print_pretty(&args.model, &plan),
    }

    Ok(())
}

fn print_pretty(model: &str, plan: &SelectorPlan) {
    output::header(&format!("Selector Plan for {}", model));

    for (model, entry) in plan.iter() {
        output::section(model.as_str());
        output::kv("select", &describe_projection(&entry.projection));
        let eager: Vec<&str> = entry.eager.iter().map(|name| name.as_str()).collect();
        output::kv("track", &describe_list(&eager));
        output::newline();
    }

    output::dim(&format!("{} model(s) in plan", plan.len()));
}

/// Render a projection for humans.
pub fn describe_projection(projection: &Projection) -> String {
    match projection.columns() {
        None => "*".to_string(),
        Some(columns) => {
            let columns: Vec<&str> = columns.iter().map(|c| c.as_str()).collect();
            describe_list(&columns)
        }
    }
}

fn describe_list(items: &[&str]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}
