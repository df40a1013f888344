//! Resolver provisioning.

use std::sync::Arc;

use gqlsync_core::ResolverSpec;
use gqlsync_service::{DynService, KIND_RESOLVER, RemoteResolver, ResolverInput, ServiceError};

use crate::data_source::DataSourceProvisioner;
use crate::error::{ReconcileError, Result};

/// Upserts resolvers once their data source is in place.
pub struct ResolverProvisioner {
    service: DynService,
    data_sources: Arc<DataSourceProvisioner>,
}

impl ResolverProvisioner {
    pub fn new(service: DynService, data_sources: Arc<DataSourceProvisioner>) -> Self {
        Self {
            service,
            data_sources,
        }
    }

    /// Ensure `spec` is attached to its field with the desired templates.
    ///
    /// The data source is provisioned first. The resolver is then updated,
    /// or created when no resolver is attached to the field yet.
    pub async fn provision(&self, spec: &ResolverSpec) -> Result<RemoteResolver> {
        let data_source = self.data_sources.provision(&spec.data_source).await?;
        let api_id = &self.data_sources.context().api_id;

        let input = ResolverInput {
            type_name: spec.type_name.clone(),
            field_name: spec.field_name.clone(),
            data_source_name: data_source.name,
            request_mapping_template: spec.request_template().to_string(),
            response_mapping_template: spec.response_template().to_string(),
        };

        let result = match self.service.update_resolver(api_id, &input).await {
            Err(err) if err.is_missing(KIND_RESOLVER) => {
                tracing::debug!(
                    api_id = %api_id,
                    resolver = %input.key(),
                    "Resolver not found, creating"
                );
                self.service.create_resolver(api_id, &input).await
            }
            other => other,
        };

        let remote = result.map_err(|err| schema_aware(err, spec))?;
        tracing::debug!(
            api_id = %api_id,
            resolver = %input.key(),
            data_source = %input.data_source_name,
            "Provisioned resolver"
        );
        Ok(remote)
    }
}

fn schema_aware(err: ServiceError, spec: &ResolverSpec) -> ReconcileError {
    if err.is_type_not_found() {
        ReconcileError::schema_mismatch(&spec.type_name, &spec.field_name)
    } else {
        err.into()
    }
}
