use anyhow::{Result, bail};

use crate::cli::{OutputFormat, TargetArgs};
use crate::commands::appsync_reconciler;
use crate::config::AppConfig;
use crate::desired::{apply_overrides, load_request};
use crate::output::print_plan;

/// Snapshot the API and print the changes `apply` would make.
pub async fn plan(args: &TargetArgs, config: &AppConfig, format: OutputFormat) -> Result<()> {
    let request = apply_overrides(
        load_request(&args.file)?,
        args.api_id.as_deref(),
        args.role_name.as_deref(),
    );
    if request.api_id.trim().is_empty() {
        bail!("Missing API ID: pass --api-id, set GQLSYNC_API_ID, or add apiId to the file");
    }
    let desired = gqlsync_core::DesiredState::from_value(&request.resolvers)?;

    let reconciler = appsync_reconciler(config).await;
    let plan = reconciler.plan(&request.api_id, &desired).await?;
    print_plan(&plan, format)
}
