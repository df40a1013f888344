use anyhow::Result;

use crate::cli::{OutputFormat, TargetArgs};
use crate::commands::appsync_reconciler;
use crate::config::AppConfig;
use crate::desired::{apply_overrides, load_request};
use crate::output::print_report;

pub async fn apply(args: &TargetArgs, config: &AppConfig, format: OutputFormat) -> Result<()> {
    let request = apply_overrides(
        load_request(&args.file)?,
        args.api_id.as_deref(),
        args.role_name.as_deref(),
    );
    // Fail before any AWS client is built.
    request.validate()?;

    let reconciler = appsync_reconciler(config).await;
    let report = reconciler.reconcile(&request).await?;
    print_report(&report, format)
}
