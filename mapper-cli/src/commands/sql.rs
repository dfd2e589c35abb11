//! `prax-mapper sql` command - Print the SQL a field request would issue.

use mapper_query::query::{Dataset, Dialect};

use crate::cli::SqlArgs;
use crate::commands::{load, plan_request};
use crate::error::{CliError, CliResult};
use crate::output;

/// Run the sql command
pub async fn run(args: SqlArgs) -> CliResult<()> {
    let loaded = load(&args.source)?;
    let plan = plan_request(&loaded, &args.model, &args.fields)?;
    let dialect = Dialect::from(args.dialect);

    for (model, entry) in plan.iter() {
        let resource = loaded.graph.get(model.as_str()).ok_or_else(|| {
            CliError::Config(format!("Model `{}` is missing from the resource graph", model))
        })?;

        let mut dataset = Dataset::for_resource(resource, &plan).with_dialect(dialect);
        if let Some(limit) = args.limit.filter(|_| model.as_str() == args.model) {
            dataset = dataset.limit(limit);
        }

        output::dim(&format!("-- {}", model));
        if !entry.eager.is_empty() {
            let eager: Vec<&str> = entry.eager.iter().map(|name| name.as_str()).collect();
            output::dim(&format!("-- eager: {}", eager.join(", ")));
        }
        output::code(&format!("{};", dataset.sql()));
        output::newline();
    }

    Ok(())
}
