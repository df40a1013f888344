//! Reconciliation planner and executor.

use std::sync::Arc;

use futures_util::future::join_all;
use gqlsync_core::DesiredState;
use gqlsync_service::{DynFunctionResolver, DynRoleResolver, DynService};
use serde::Serialize;

use crate::data_source::{DataSourceProvisioner, ProvisionContext};
use crate::error::{ReconcileError, Result};
use crate::plan::ReconcilePlan;
use crate::request::ReconcileRequest;
use crate::resolver::ResolverProvisioner;
use crate::retry::RetryPolicy;
use crate::snapshot::Snapshot;

/// Region used for data sources that name none, unless overridden.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Outcome of a successful reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    /// Attempts made, including the successful one.
    pub attempts: u32,
    /// `Type.field` keys, sorted.
    pub resolvers_upserted: Vec<String>,
    pub data_sources_provisioned: Vec<String>,
    pub resolvers_deleted: Vec<String>,
    pub data_sources_deleted: Vec<String>,
}

/// Converges a remote API's resolvers and data sources to a desired state.
pub struct Reconciler {
    service: DynService,
    roles: DynRoleResolver,
    functions: DynFunctionResolver,
    retry: RetryPolicy,
    default_region: String,
}

impl Reconciler {
    pub fn new(service: DynService, roles: DynRoleResolver, functions: DynFunctionResolver) -> Self {
        Self {
            service,
            roles,
            functions,
            retry: RetryPolicy::default(),
            default_region: DEFAULT_REGION.to_string(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_default_region(mut self, region: impl Into<String>) -> Self {
        self.default_region = region.into();
        self
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Validate `request` and converge the remote API to it.
    ///
    /// Validation failures are returned before any remote call is made.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error encountered. Changes committed before
    /// the failure are not rolled back.
    pub async fn reconcile(&self, request: &ReconcileRequest) -> Result<ReconcileReport> {
        let desired = request.validate()?;
        self.reconcile_desired(&request.api_id, &request.role_name, &desired)
            .await
    }

    /// Run attempts until one succeeds, a fatal error occurs, or the retry
    /// policy is exhausted. Only schema-lock conflicts are retried, each
    /// time from a fresh snapshot.
    pub async fn reconcile_desired(
        &self,
        api_id: &str,
        role_name: &str,
        desired: &DesiredState,
    ) -> Result<ReconcileReport> {
        for type_name in desired.unmanaged_types() {
            tracing::warn!(
                api_id = %api_id,
                type_name = %type_name,
                "Resolvers on non-root type are upserted but never deleted"
            );
        }

        let mut attempt = 1;
        loop {
            match self.attempt(api_id, role_name, desired).await {
                Ok(mut report) => {
                    report.attempts = attempt;
                    tracing::info!(
                        api_id = %api_id,
                        attempts = attempt,
                        upserted = report.resolvers_upserted.len(),
                        provisioned = report.data_sources_provisioned.len(),
                        resolvers_deleted = report.resolvers_deleted.len(),
                        data_sources_deleted = report.data_sources_deleted.len(),
                        "Resolvers reconciled"
                    );
                    return Ok(report);
                }
                Err(err) if err.is_schema_conflict() => {
                    if !self.retry.allows_retry_after(attempt) {
                        return Err(ReconcileError::RetriesExhausted {
                            attempts: attempt,
                            last: Box::new(err),
                        });
                    }
                    tracing::warn!(
                        api_id = %api_id,
                        attempt = attempt,
                        pause_ms = self.retry.pause.as_millis() as u64,
                        error = %err,
                        "Schema is being altered, restarting reconciliation"
                    );
                    tokio::time::sleep(self.retry.pause).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Compute the work a run would do right now, without mutating anything.
    pub async fn plan(&self, api_id: &str, desired: &DesiredState) -> Result<ReconcilePlan> {
        let snapshot = Snapshot::fetch(self.service.as_ref(), api_id).await?;
        Ok(ReconcilePlan::compute(desired, &snapshot))
    }

    /// One pass: snapshot, diff, upsert, then delete.
    async fn attempt(
        &self,
        api_id: &str,
        role_name: &str,
        desired: &DesiredState,
    ) -> Result<ReconcileReport> {
        let service_role_arn = self
            .roles
            .role_arn(role_name)
            .await
            .map_err(|e| ReconcileError::identity("role", role_name, e))?;

        let snapshot = Snapshot::fetch(self.service.as_ref(), api_id).await?;
        let plan = ReconcilePlan::compute(desired, &snapshot);
        tracing::debug!(
            api_id = %api_id,
            upserts = plan.upserts.len(),
            resolver_deletes = plan.resolver_deletes.len(),
            data_source_deletes = plan.data_source_deletes.len(),
            "Computed reconciliation plan"
        );

        let data_sources = Arc::new(DataSourceProvisioner::new(
            self.service.clone(),
            self.functions.clone(),
            ProvisionContext {
                api_id: api_id.to_string(),
                service_role_arn,
                default_region: self.default_region.clone(),
            },
        ));
        let resolvers = ResolverProvisioner::new(self.service.clone(), data_sources.clone());
        let resolvers = &resolvers;

        // Upserts
        let upserted = settle(
            join_all(plan.upserts.iter().map(|spec| async move {
                resolvers
                    .provision(spec)
                    .await
                    .map(|_| format!("{}.{}", spec.type_name, spec.field_name))
            }))
            .await,
        )?;

        // Resolver deletes
        let resolvers_deleted = settle(
            join_all(plan.resolver_deletes.iter().map(|target| async move {
                self.service
                    .delete_resolver(api_id, &target.type_name, &target.field_name)
                    .await?;
                tracing::info!(api_id = %api_id, resolver = %target, "Deleted resolver");
                Ok::<_, ReconcileError>(target.to_string())
            }))
            .await,
        )?;

        // Data-source deletes, only after every resolver delete settled
        let data_sources_deleted = settle(
            join_all(plan.data_source_deletes.iter().map(|name| async move {
                self.service.delete_data_source(api_id, name).await?;
                tracing::info!(api_id = %api_id, data_source = %name, "Deleted data source");
                Ok::<_, ReconcileError>(name.clone())
            }))
            .await,
        )?;

        let mut data_sources_provisioned: Vec<String> = data_sources
            .provisioned()
            .await
            .into_iter()
            .map(|ds| ds.name)
            .collect();
        data_sources_provisioned.sort();
        data_sources_provisioned.dedup();

        let mut resolvers_upserted = upserted;
        resolvers_upserted.sort();

        Ok(ReconcileReport {
            attempts: 0,
            resolvers_upserted,
            data_sources_provisioned,
            resolvers_deleted,
            data_sources_deleted,
        })
    }
}

/// Collect the results of one phase.
///
/// The first non-conflict failure wins. When every failure is a schema-lock
/// conflict, the conflict is returned so the attempt is retried.
fn settle<T>(results: Vec<Result<T>>) -> Result<Vec<T>> {
    let mut values = Vec::with_capacity(results.len());
    let mut conflict = None;
    for result in results {
        match result {
            Ok(value) => values.push(value),
            Err(err) if err.is_schema_conflict() => {
                conflict.get_or_insert(err);
            }
            Err(err) => return Err(err),
        }
    }
    match conflict {
        Some(err) => Err(err),
        None => Ok(values),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gqlsync_service::ServiceError;

    #[test]
    fn test_settle_all_ok() {
        let results: Vec<Result<u32>> = vec![Ok(1), Ok(2)];
        assert_eq!(settle(results).unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_settle_prefers_fatal_over_conflict() {
        let results: Vec<Result<u32>> = vec![
            Err(ServiceError::schema_conflict("busy").into()),
            Err(ServiceError::internal("boom").into()),
            Ok(3),
        ];
        let err = settle(results).unwrap_err();
        assert!(!err.is_schema_conflict());
        assert_eq!(err.to_string(), "Internal error: boom");
    }

    #[test]
    fn test_settle_only_conflicts_retries() {
        let results: Vec<Result<u32>> = vec![
            Ok(1),
            Err(ServiceError::schema_conflict("busy").into()),
        ];
        assert!(settle(results).unwrap_err().is_schema_conflict());
    }
}
