pub mod apply;
pub mod plan;
pub mod validate;

use std::sync::Arc;

use aws_config::BehaviorVersion;
use gqlsync_appsync::{AppSyncService, IamRoleResolver, LambdaFunctionResolver};
use gqlsync_reconcile::{DEFAULT_REGION, Reconciler};

use crate::config::AppConfig;

/// Build a reconciler backed by AppSync, IAM and Lambda clients.
pub async fn appsync_reconciler(config: &AppConfig) -> Reconciler {
    let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let region = config
        .aws
        .region
        .clone()
        .or_else(|| sdk_config.region().map(|r| r.to_string()))
        .unwrap_or_else(|| DEFAULT_REGION.to_string());

    tracing::debug!(region = %region, endpoint = ?config.aws.endpoint, "Using AWS region");

    let service = Arc::new(AppSyncService::new(&sdk_config, &config.aws));
    let roles = Arc::new(IamRoleResolver::new(&sdk_config, &config.aws));
    let functions = Arc::new(LambdaFunctionResolver::new(&sdk_config, &config.aws));

    Reconciler::new(service, roles, functions)
        .with_retry_policy(config.retry.policy())
        .with_default_region(region)
}
