//! AWS AppSync implementation of [`GraphqlApiService`].

use async_trait::async_trait;
use aws_sdk_appsync::Client;
use gqlsync_service::{
    DataSourceInput, GraphqlApiService, RemoteDataSource, RemoteResolver, ResolverInput,
    ServiceError,
};

use crate::config::{AppSyncConfig, client_from_config};
use crate::convert::{DataSourcePayload, remote_data_source, remote_resolver};
use crate::error::{Target, classify};

/// AppSync-backed GraphQL API-management service.
#[derive(Clone)]
pub struct AppSyncService {
    client: Client,
}

impl std::fmt::Debug for AppSyncService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppSyncService").finish_non_exhaustive()
    }
}

impl AppSyncService {
    /// Create a client from the shared SDK config plus overrides.
    pub fn new(sdk_config: &aws_config::SdkConfig, config: &AppSyncConfig) -> Self {
        Self {
            client: client_from_config!(aws_sdk_appsync, sdk_config, config),
        }
    }

    /// Create from a pre-built client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    fn missing_output(operation: &str) -> ServiceError {
        ServiceError::internal(format!("AppSync {operation} returned no object"))
    }
}

#[async_trait]
impl GraphqlApiService for AppSyncService {
    async fn list_resolvers(
        &self,
        api_id: &str,
        type_name: &str,
    ) -> Result<Vec<RemoteResolver>, ServiceError> {
        let mut resolvers = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let output = self
                .client
                .list_resolvers()
                .api_id(api_id)
                .type_name(type_name)
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| classify(e, Target::Type(type_name)))?;

            resolvers.extend(output.resolvers().iter().map(remote_resolver));

            match output.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        Ok(resolvers)
    }

    async fn create_resolver(
        &self,
        api_id: &str,
        input: &ResolverInput,
    ) -> Result<RemoteResolver, ServiceError> {
        let output = self
            .client
            .create_resolver()
            .api_id(api_id)
            .type_name(&input.type_name)
            .field_name(&input.field_name)
            .data_source_name(&input.data_source_name)
            .request_mapping_template(&input.request_mapping_template)
            .response_mapping_template(&input.response_mapping_template)
            .send()
            .await
            .map_err(|e| classify(e, resolver_target(input)))?;

        output
            .resolver()
            .map(remote_resolver)
            .ok_or_else(|| Self::missing_output("CreateResolver"))
    }

    async fn update_resolver(
        &self,
        api_id: &str,
        input: &ResolverInput,
    ) -> Result<RemoteResolver, ServiceError> {
        let output = self
            .client
            .update_resolver()
            .api_id(api_id)
            .type_name(&input.type_name)
            .field_name(&input.field_name)
            .data_source_name(&input.data_source_name)
            .request_mapping_template(&input.request_mapping_template)
            .response_mapping_template(&input.response_mapping_template)
            .send()
            .await
            .map_err(|e| classify(e, resolver_target(input)))?;

        output
            .resolver()
            .map(remote_resolver)
            .ok_or_else(|| Self::missing_output("UpdateResolver"))
    }

    async fn delete_resolver(
        &self,
        api_id: &str,
        type_name: &str,
        field_name: &str,
    ) -> Result<(), ServiceError> {
        self.client
            .delete_resolver()
            .api_id(api_id)
            .type_name(type_name)
            .field_name(field_name)
            .send()
            .await
            .map_err(|e| {
                classify(
                    e,
                    Target::Resolver {
                        type_name,
                        field_name,
                    },
                )
            })?;
        Ok(())
    }

    async fn list_data_sources(&self, api_id: &str) -> Result<Vec<RemoteDataSource>, ServiceError> {
        let mut data_sources = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let output = self
                .client
                .list_data_sources()
                .api_id(api_id)
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| classify(e, Target::Api(api_id)))?;

            data_sources.extend(output.data_sources().iter().map(remote_data_source));

            match output.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        Ok(data_sources)
    }

    async fn create_data_source(
        &self,
        api_id: &str,
        input: &DataSourceInput,
    ) -> Result<RemoteDataSource, ServiceError> {
        let payload = DataSourcePayload::from_config(&input.config)?;
        let output = self
            .client
            .create_data_source()
            .api_id(api_id)
            .name(&input.name)
            .service_role_arn(&input.service_role_arn)
            .set_type(payload.kind)
            .set_lambda_config(payload.lambda)
            .set_dynamodb_config(payload.dynamodb)
            .set_http_config(payload.http)
            .set_open_search_service_config(payload.open_search)
            .set_relational_database_config(payload.relational_database)
            .send()
            .await
            .map_err(|e| classify(e, Target::DataSource(&input.name)))?;

        output
            .data_source()
            .map(remote_data_source)
            .ok_or_else(|| Self::missing_output("CreateDataSource"))
    }

    async fn update_data_source(
        &self,
        api_id: &str,
        input: &DataSourceInput,
    ) -> Result<RemoteDataSource, ServiceError> {
        let payload = DataSourcePayload::from_config(&input.config)?;
        let output = self
            .client
            .update_data_source()
            .api_id(api_id)
            .name(&input.name)
            .service_role_arn(&input.service_role_arn)
            .set_type(payload.kind)
            .set_lambda_config(payload.lambda)
            .set_dynamodb_config(payload.dynamodb)
            .set_http_config(payload.http)
            .set_open_search_service_config(payload.open_search)
            .set_relational_database_config(payload.relational_database)
            .send()
            .await
            .map_err(|e| classify(e, Target::DataSource(&input.name)))?;

        output
            .data_source()
            .map(remote_data_source)
            .ok_or_else(|| Self::missing_output("UpdateDataSource"))
    }

    async fn delete_data_source(&self, api_id: &str, name: &str) -> Result<(), ServiceError> {
        self.client
            .delete_data_source()
            .api_id(api_id)
            .name(name)
            .send()
            .await
            .map_err(|e| classify(e, Target::DataSource(name)))?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "appsync"
    }
}

fn resolver_target(input: &ResolverInput) -> Target<'_> {
    Target::Resolver {
        type_name: &input.type_name,
        field_name: &input.field_name,
    }
}
