//! Data-source provisioning.

use gqlsync_core::DataSourceSpec;
use gqlsync_service::{
    DataSourceConfig, DataSourceInput, DeltaSyncConfig, DynFunctionResolver, DynService,
    HttpSigningConfig, KIND_DATA_SOURCE, RdsHttpEndpointConfig, ServiceError,
};
use serde::Serialize;

use crate::cache::ProvisionCache;
use crate::error::{ReconcileError, Result};

/// Settings shared by every provisioning call of one attempt.
#[derive(Debug, Clone)]
pub struct ProvisionContext {
    pub api_id: String,
    pub service_role_arn: String,
    /// Region used when a data source does not name its own.
    pub default_region: String,
}

/// A data source known to exist on the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionedDataSource {
    pub name: String,
    pub data_source_arn: Option<String>,
}

/// Creates or updates data sources, at most once per identity hash.
pub struct DataSourceProvisioner {
    service: DynService,
    functions: DynFunctionResolver,
    context: ProvisionContext,
    cache: ProvisionCache<ProvisionedDataSource>,
}

impl DataSourceProvisioner {
    pub fn new(service: DynService, functions: DynFunctionResolver, context: ProvisionContext) -> Self {
        Self {
            service,
            functions,
            context,
            cache: ProvisionCache::new(),
        }
    }

    pub fn context(&self) -> &ProvisionContext {
        &self.context
    }

    /// Ensure the data source described by `spec` exists with that configuration.
    ///
    /// Specs with equal identity hashes share one provisioning call; later
    /// and concurrent callers receive the first call's result.
    pub async fn provision(&self, spec: &DataSourceSpec) -> Result<ProvisionedDataSource> {
        let hash = spec.identity_hash();
        self.cache
            .get_or_provision(&hash, || self.upsert(spec))
            .await
    }

    /// Data sources provisioned successfully so far.
    pub async fn provisioned(&self) -> Vec<ProvisionedDataSource> {
        self.cache.settled().await
    }

    /// Update, falling back to create when the data source is missing, and
    /// back to update when a concurrent creator wins the create.
    async fn upsert(&self, spec: &DataSourceSpec) -> Result<ProvisionedDataSource> {
        let input = self.build_input(spec).await?;
        let api_id = &self.context.api_id;

        let remote = match self.service.update_data_source(api_id, &input).await {
            Ok(remote) => remote,
            Err(err) if err.is_missing(KIND_DATA_SOURCE) => {
                tracing::debug!(
                    api_id = %api_id,
                    data_source = %input.name,
                    "Data source not found, creating"
                );
                match self.service.create_data_source(api_id, &input).await {
                    Ok(remote) => remote,
                    Err(err) if err.is_already_exists() => {
                        tracing::debug!(
                            api_id = %api_id,
                            data_source = %input.name,
                            "Data source created concurrently, updating"
                        );
                        self.service.update_data_source(api_id, &input).await?
                    }
                    Err(err) => return Err(err.into()),
                }
            }
            Err(err) => return Err(err.into()),
        };

        tracing::info!(
            api_id = %api_id,
            data_source = %remote.name,
            kind = %input.kind(),
            "Provisioned data source"
        );

        Ok(ProvisionedDataSource {
            name: remote.name,
            data_source_arn: remote.data_source_arn,
        })
    }

    async fn build_input(&self, spec: &DataSourceSpec) -> Result<DataSourceInput> {
        let function_arn = match spec {
            DataSourceSpec::Lambda(source) => Some(
                self.functions
                    .function_arn(&source.lambda_name)
                    .await
                    .map_err(|e| ReconcileError::identity("function", &source.lambda_name, e))?,
            ),
            _ => None,
        };
        let config = build_config(spec, &self.context.default_region, function_arn).ok_or_else(
            || ServiceError::internal(format!("no function ARN for data source {}", spec.name())),
        )?;

        Ok(DataSourceInput {
            name: spec.name(),
            service_role_arn: self.context.service_role_arn.clone(),
            config,
        })
    }
}

/// Kind-specific payload for a data source.
///
/// Function-backed sources need their resolved `function_arn`; `None` is
/// returned when it is absent.
pub fn build_config(
    spec: &DataSourceSpec,
    default_region: &str,
    function_arn: Option<String>,
) -> Option<DataSourceConfig> {
    let config = match spec {
        DataSourceSpec::Lambda(_) => DataSourceConfig::Lambda {
            function_arn: function_arn?,
        },
        DataSourceSpec::DynamoDb(table) => DataSourceConfig::DynamoDb {
            table_name: table.table_name.clone(),
            region: table
                .table_region
                .clone()
                .unwrap_or_else(|| default_region.to_string()),
            versioned: table.is_versioned(),
            delta_sync: table.sync_table.as_ref().map(|sync_table| DeltaSyncConfig {
                base_table_ttl: table.ttl.map(i64::from),
                delta_sync_table_name: Some(sync_table.clone()),
                delta_sync_table_ttl: table.sync_table_ttl.map(i64::from),
            }),
        },
        DataSourceSpec::Http(http) => DataSourceConfig::Http {
            endpoint: http.endpoint.clone(),
            signing: HttpSigningConfig {
                signing_region: http.signing_region().unwrap_or(default_region).to_string(),
                signing_service_name: http.signing_service_name().map(str::to_string),
            },
        },
        DataSourceSpec::OpenSearch(search) => DataSourceConfig::OpenSearch {
            endpoint: search.endpoint.clone(),
            region: search
                .endpoint_region
                .clone()
                .unwrap_or_else(|| default_region.to_string()),
        },
        DataSourceSpec::RelationalDatabase(db) => DataSourceConfig::RelationalDatabase {
            rds: RdsHttpEndpointConfig {
                region: default_region.to_string(),
                db_cluster_identifier: db.db_cluster_identifier.clone(),
                database_name: db.database.clone(),
                schema: db.schema.clone(),
                aws_secret_store_arn: db.aws_secret_store_arn.clone(),
            },
        },
    };
    Some(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn spec(def: Value) -> DataSourceSpec {
        DataSourceSpec::classify("Query", "f", def.as_object().unwrap()).unwrap()
    }

    #[test]
    fn test_lambda_needs_function_arn() {
        let lambda = spec(json!({"lambdaName": "fn"}));
        assert!(build_config(&lambda, "us-east-1", None).is_none());
        assert_eq!(
            build_config(&lambda, "us-east-1", Some("arn:fn".to_string())),
            Some(DataSourceConfig::Lambda {
                function_arn: "arn:fn".to_string()
            })
        );
    }

    #[test]
    fn test_dynamodb_defaults_region() {
        let config = build_config(&spec(json!({"tableName": "Users"})), "eu-west-1", None).unwrap();
        assert_eq!(
            config,
            DataSourceConfig::DynamoDb {
                table_name: "Users".to_string(),
                region: "eu-west-1".to_string(),
                versioned: false,
                delta_sync: None,
            }
        );
    }

    #[test]
    fn test_dynamodb_delta_sync() {
        let config = build_config(
            &spec(json!({
                "tableName": "Users",
                "tableRegion": "us-west-2",
                "ttl": 60,
                "syncTable": "UsersDelta",
                "syncTableTtl": 1440
            })),
            "eu-west-1",
            None,
        )
        .unwrap();
        assert_eq!(
            config,
            DataSourceConfig::DynamoDb {
                table_name: "Users".to_string(),
                region: "us-west-2".to_string(),
                versioned: true,
                delta_sync: Some(DeltaSyncConfig {
                    base_table_ttl: Some(60),
                    delta_sync_table_name: Some("UsersDelta".to_string()),
                    delta_sync_table_ttl: Some(1440),
                }),
            }
        );
    }

    #[test]
    fn test_http_signing_defaults() {
        let config = build_config(
            &spec(json!({
                "authorizationConfig": {},
                "endpoint": "https://api.example.com",
                "signingServiceName": "execute-api",
                "name": "rest"
            })),
            "us-east-1",
            None,
        )
        .unwrap();
        assert_eq!(
            config,
            DataSourceConfig::Http {
                endpoint: "https://api.example.com".to_string(),
                signing: HttpSigningConfig {
                    signing_region: "us-east-1".to_string(),
                    signing_service_name: Some("execute-api".to_string()),
                },
            }
        );
    }

    #[test]
    fn test_search_region() {
        let config = build_config(
            &spec(json!({"endpoint": "https://search", "endpointRegion": "ap-south-1", "name": "posts"})),
            "us-east-1",
            None,
        )
        .unwrap();
        assert_eq!(
            config,
            DataSourceConfig::OpenSearch {
                endpoint: "https://search".to_string(),
                region: "ap-south-1".to_string(),
            }
        );
    }

    #[test]
    fn test_relational_database() {
        let config = build_config(
            &spec(json!({
                "relationalDatabaseSourceType": "RDS_HTTP_ENDPOINT",
                "database": "app",
                "dbClusterIdentifier": "cluster-arn",
                "schema": "public",
                "awsSecretStoreArn": "secret-arn",
                "name": "db"
            })),
            "us-east-1",
            None,
        )
        .unwrap();
        let DataSourceConfig::RelationalDatabase { rds } = config else {
            panic!("expected relational database config");
        };
        assert_eq!(rds.database_name, "app");
        assert_eq!(rds.region, "us-east-1");
    }
}
