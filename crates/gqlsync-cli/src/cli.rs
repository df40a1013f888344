use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "gqlsync")]
#[command(about = "Reconcile AppSync resolvers and data sources with a desired state")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (defaults to ./gqlsync.toml when present)
    #[arg(short, long, global = true, env = "GQLSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,
}

#[derive(Clone, Copy, Debug, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a desired-state file without contacting AWS
    Validate(ValidateArgs),
    /// Show what apply would change
    Plan(TargetArgs),
    /// Converge the API to the desired state
    Apply(TargetArgs),
}

#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Desired-state file (.json or .toml)
    pub file: PathBuf,
}

#[derive(clap::Args)]
pub struct TargetArgs {
    /// Desired-state file (.json or .toml)
    pub file: PathBuf,
    /// AppSync API ID (overrides the file's apiId)
    #[arg(long, env = "GQLSYNC_API_ID")]
    pub api_id: Option<String>,
    /// IAM role assumed by data sources (overrides the file's roleName)
    #[arg(long, env = "GQLSYNC_ROLE_NAME")]
    pub role_name: Option<String>,
}
