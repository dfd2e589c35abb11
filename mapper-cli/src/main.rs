//! Prax Mapper CLI - command-line interface for the field-selection mapper.

use clap::Parser;

use mapper_cli::cli::{Cli, Command};
use mapper_cli::commands;
use mapper_cli::error::CliResult;
use mapper_cli::output;

#[tokio::main]
async fn main() {
    mapper_query::logging::init();

    if let Err(e) = run().await {
        output::newline();
        output::error(&e.report());
        std::process::exit(1);
    }
}

async fn run() -> CliResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Validate(args) => commands::validate::run(args).await,
        Command::Plan(args) => commands::plan::run(args).await,
        Command::Sql(args) => commands::sql::run(args).await,
        Command::Version => commands::version::run().await,
    }
}
