//! Types exchanged with a remote GraphQL API-management service.

use gqlsync_core::DataSourceKind;
use serde::{Deserialize, Serialize};

/// Object kind label used in `NotFound` / `AlreadyExists` errors.
pub const KIND_RESOLVER: &str = "resolver";

/// Object kind label used in `NotFound` / `AlreadyExists` errors.
pub const KIND_DATA_SOURCE: &str = "data source";

/// A resolver binding as registered on the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteResolver {
    pub type_name: String,
    pub field_name: String,
    pub data_source_name: Option<String>,
    pub resolver_arn: Option<String>,
    pub request_mapping_template: Option<String>,
    pub response_mapping_template: Option<String>,
}

impl RemoteResolver {
    /// `Type.field` label used in logs and error messages.
    pub fn key(&self) -> String {
        format!("{}.{}", self.type_name, self.field_name)
    }
}

/// A data source as registered on the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteDataSource {
    pub name: String,
    pub data_source_arn: Option<String>,
    /// Kind tag as reported by the service; kinds this crate does not model
    /// are kept verbatim.
    pub kind: Option<String>,
}

/// Delta-sync settings for a versioned table. TTLs are minutes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeltaSyncConfig {
    pub base_table_ttl: Option<i64>,
    pub delta_sync_table_name: Option<String>,
    pub delta_sync_table_ttl: Option<i64>,
}

/// IAM request signing for HTTP data sources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpSigningConfig {
    pub signing_region: String,
    pub signing_service_name: Option<String>,
}

/// Aurora Data API settings for relational-database data sources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RdsHttpEndpointConfig {
    pub region: String,
    pub db_cluster_identifier: String,
    pub database_name: String,
    pub schema: String,
    pub aws_secret_store_arn: String,
}

/// Kind-specific data-source configuration payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DataSourceConfig {
    Lambda {
        function_arn: String,
    },
    DynamoDb {
        table_name: String,
        region: String,
        versioned: bool,
        delta_sync: Option<DeltaSyncConfig>,
    },
    Http {
        endpoint: String,
        signing: HttpSigningConfig,
    },
    OpenSearch {
        endpoint: String,
        region: String,
    },
    RelationalDatabase {
        rds: RdsHttpEndpointConfig,
    },
}

impl DataSourceConfig {
    pub fn kind(&self) -> DataSourceKind {
        match self {
            DataSourceConfig::Lambda { .. } => DataSourceKind::AwsLambda,
            DataSourceConfig::DynamoDb { .. } => DataSourceKind::AmazonDynamodb,
            DataSourceConfig::Http { .. } => DataSourceKind::Http,
            DataSourceConfig::OpenSearch { .. } => DataSourceKind::AmazonOpensearchService,
            DataSourceConfig::RelationalDatabase { .. } => DataSourceKind::RelationalDatabase,
        }
    }
}

/// Create/update payload for one data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceInput {
    pub name: String,
    pub service_role_arn: String,
    pub config: DataSourceConfig,
}

impl DataSourceInput {
    pub fn kind(&self) -> DataSourceKind {
        self.config.kind()
    }
}

/// Create/update payload for one resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolverInput {
    pub type_name: String,
    pub field_name: String,
    pub data_source_name: String,
    pub request_mapping_template: String,
    pub response_mapping_template: String,
}

impl ResolverInput {
    /// `Type.field` label used in logs and error messages.
    pub fn key(&self) -> String {
        format!("{}.{}", self.type_name, self.field_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_kind() {
        let config = DataSourceConfig::Lambda {
            function_arn: "arn:aws:lambda:us-east-1:1:function:usersFn".to_string(),
        };
        assert_eq!(config.kind(), DataSourceKind::AwsLambda);

        let config = DataSourceConfig::OpenSearch {
            endpoint: "https://search".to_string(),
            region: "us-east-1".to_string(),
        };
        assert_eq!(config.kind(), DataSourceKind::AmazonOpensearchService);
    }

    #[test]
    fn test_resolver_key() {
        let input = ResolverInput {
            type_name: "Query".to_string(),
            field_name: "getUser".to_string(),
            data_source_name: "usersFn".to_string(),
            request_mapping_template: String::new(),
            response_mapping_template: String::new(),
        };
        assert_eq!(input.key(), "Query.getUser");
    }
}
