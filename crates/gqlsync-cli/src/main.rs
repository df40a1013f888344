mod cli;
mod commands;
mod config;
mod desired;
mod observability;
mod output;

use anyhow::{Result, anyhow};
use clap::Parser;

use cli::{Cli, Commands};
use output::print_error;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let format = cli.format.unwrap_or_default();

    let config = config::loader::load_config(cli.config.as_deref()).map_err(|e| anyhow!(e))?;
    observability::init_tracing(&config.logging);

    match &cli.command {
        Commands::Validate(args) => {
            commands::validate::validate(&args.file, format)?;
        }
        Commands::Plan(args) => {
            commands::plan::plan(args, &config, format).await?;
        }
        Commands::Apply(args) => {
            commands::apply::apply(args, &config, format).await?;
        }
    }

    Ok(())
}
