//! Conversions between gqlsync service types and AppSync SDK types.

use aws_sdk_appsync::types::{
    AuthorizationConfig, AuthorizationType, AwsIamConfig, DataSource, DataSourceType,
    DeltaSyncConfig, DynamodbDataSourceConfig, HttpDataSourceConfig, LambdaDataSourceConfig,
    OpenSearchServiceDataSourceConfig, RdsHttpEndpointConfig, RelationalDatabaseDataSourceConfig,
    RelationalDatabaseSourceType, Resolver,
};
use gqlsync_service::{DataSourceConfig, RemoteDataSource, RemoteResolver, ServiceError};

use crate::error::build_error;

/// Kind-specific create/update fields of a data source. Exactly one config
/// is set, matching `kind`.
#[derive(Debug, Clone, Default)]
pub(crate) struct DataSourcePayload {
    pub kind: Option<DataSourceType>,
    pub lambda: Option<LambdaDataSourceConfig>,
    pub dynamodb: Option<DynamodbDataSourceConfig>,
    pub http: Option<HttpDataSourceConfig>,
    pub open_search: Option<OpenSearchServiceDataSourceConfig>,
    pub relational_database: Option<RelationalDatabaseDataSourceConfig>,
}

impl DataSourcePayload {
    pub fn from_config(config: &DataSourceConfig) -> Result<Self, ServiceError> {
        let payload = match config {
            DataSourceConfig::Lambda { function_arn } => Self {
                kind: Some(DataSourceType::AwsLambda),
                lambda: Some(
                    LambdaDataSourceConfig::builder()
                        .lambda_function_arn(function_arn)
                        .build()
                        .map_err(build_error)?,
                ),
                ..Default::default()
            },
            DataSourceConfig::DynamoDb {
                table_name,
                region,
                versioned,
                delta_sync,
            } => {
                let delta_sync = delta_sync.as_ref().map(|sync| {
                    DeltaSyncConfig::builder()
                        .set_base_table_ttl(sync.base_table_ttl)
                        .set_delta_sync_table_name(sync.delta_sync_table_name.clone())
                        .set_delta_sync_table_ttl(sync.delta_sync_table_ttl)
                        .build()
                });
                Self {
                    kind: Some(DataSourceType::AmazonDynamodb),
                    dynamodb: Some(
                        DynamodbDataSourceConfig::builder()
                            .table_name(table_name)
                            .aws_region(region)
                            .versioned(*versioned)
                            .set_delta_sync_config(delta_sync)
                            .build()
                            .map_err(build_error)?,
                    ),
                    ..Default::default()
                }
            }
            DataSourceConfig::Http { endpoint, signing } => {
                let iam = AwsIamConfig::builder()
                    .signing_region(&signing.signing_region)
                    .set_signing_service_name(signing.signing_service_name.clone())
                    .build();
                let authorization = AuthorizationConfig::builder()
                    .authorization_type(AuthorizationType::AwsIam)
                    .aws_iam_config(iam)
                    .build()
                    .map_err(build_error)?;
                Self {
                    kind: Some(DataSourceType::Http),
                    http: Some(
                        HttpDataSourceConfig::builder()
                            .endpoint(endpoint)
                            .authorization_config(authorization)
                            .build(),
                    ),
                    ..Default::default()
                }
            }
            DataSourceConfig::OpenSearch { endpoint, region } => Self {
                kind: Some(DataSourceType::AmazonOpensearchService),
                open_search: Some(
                    OpenSearchServiceDataSourceConfig::builder()
                        .endpoint(endpoint)
                        .aws_region(region)
                        .build()
                        .map_err(build_error)?,
                ),
                ..Default::default()
            },
            DataSourceConfig::RelationalDatabase { rds } => {
                let endpoint = RdsHttpEndpointConfig::builder()
                    .aws_region(&rds.region)
                    .db_cluster_identifier(&rds.db_cluster_identifier)
                    .database_name(&rds.database_name)
                    .schema(&rds.schema)
                    .aws_secret_store_arn(&rds.aws_secret_store_arn)
                    .build();
                Self {
                    kind: Some(DataSourceType::RelationalDatabase),
                    relational_database: Some(
                        RelationalDatabaseDataSourceConfig::builder()
                            .relational_database_source_type(
                                RelationalDatabaseSourceType::RdsHttpEndpoint,
                            )
                            .rds_http_endpoint_config(endpoint)
                            .build(),
                    ),
                    ..Default::default()
                }
            }
        };
        Ok(payload)
    }
}

pub(crate) fn remote_resolver(resolver: &Resolver) -> RemoteResolver {
    RemoteResolver {
        type_name: resolver.type_name().unwrap_or_default().to_string(),
        field_name: resolver.field_name().unwrap_or_default().to_string(),
        data_source_name: resolver.data_source_name().map(str::to_string),
        resolver_arn: resolver.resolver_arn().map(str::to_string),
        request_mapping_template: resolver.request_mapping_template().map(str::to_string),
        response_mapping_template: resolver.response_mapping_template().map(str::to_string),
    }
}

pub(crate) fn remote_data_source(data_source: &DataSource) -> RemoteDataSource {
    RemoteDataSource {
        name: data_source.name().unwrap_or_default().to_string(),
        data_source_arn: data_source.data_source_arn().map(str::to_string),
        kind: data_source.r#type().map(|kind| kind.as_str().to_string()),
    }
}
