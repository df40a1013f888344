//! Data-source classification.
//!
//! A resolver definition selects its backing store implicitly, through which
//! identifying fields it carries. Classification turns that implicit choice
//! into an explicit [`DataSourceSpec`] variant once, at the boundary; every
//! later stage matches on the variant instead of probing fields.
//!
//! Fields are probed in a fixed priority order:
//!
//! 1. `lambdaName` → [`DataSourceSpec::Lambda`]
//! 2. `tableName` → [`DataSourceSpec::DynamoDb`]
//! 3. `authorizationConfig` → [`DataSourceSpec::Http`]
//! 4. `endpoint` → [`DataSourceSpec::OpenSearch`]
//! 5. `relationalDatabaseSourceType` → [`DataSourceSpec::RelationalDatabase`]
//!
//! The first match wins, so a definition carrying both `lambdaName` and
//! `tableName` is function-backed.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::error::{CoreError, Result};

/// Kind tag of a data source, spelled the way the remote service spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataSourceKind {
    AwsLambda,
    AmazonDynamodb,
    Http,
    AmazonOpensearchService,
    RelationalDatabase,
}

impl DataSourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSourceKind::AwsLambda => "AWS_LAMBDA",
            DataSourceKind::AmazonDynamodb => "AMAZON_DYNAMODB",
            DataSourceKind::Http => "HTTP",
            DataSourceKind::AmazonOpensearchService => "AMAZON_OPENSEARCH_SERVICE",
            DataSourceKind::RelationalDatabase => "RELATIONAL_DATABASE",
        }
    }
}

impl fmt::Display for DataSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Function-backed data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LambdaSource {
    pub lambda_name: String,
}

/// Table-backed data source.
///
/// TTL values are minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamoDbSource {
    pub table_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_table_ttl: Option<u32>,
}

impl DynamoDbSource {
    /// A table with a sync table is registered as versioned.
    pub fn is_versioned(&self) -> bool {
        self.sync_table.is_some()
    }
}

/// Signing scheme for HTTP data sources. The remote service only knows IAM.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthorizationType {
    #[default]
    #[serde(rename = "AWS_IAM")]
    AwsIam,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsIamSigning {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_service_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpAuthorization {
    #[serde(default)]
    pub authorization_type: AuthorizationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_iam_config: Option<AwsIamSigning>,
}

/// HTTP-service data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpSource {
    pub endpoint: String,
    pub name: String,
    pub authorization_config: HttpAuthorization,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_service_name: Option<String>,
}

impl HttpSource {
    /// Top-level signing region, falling back to the nested IAM config.
    pub fn signing_region(&self) -> Option<&str> {
        self.signing_region.as_deref().or_else(|| {
            self.authorization_config
                .aws_iam_config
                .as_ref()
                .and_then(|iam| iam.signing_region.as_deref())
        })
    }

    /// Top-level signing service name, falling back to the nested IAM config.
    pub fn signing_service_name(&self) -> Option<&str> {
        self.signing_service_name.as_deref().or_else(|| {
            self.authorization_config
                .aws_iam_config
                .as_ref()
                .and_then(|iam| iam.signing_service_name.as_deref())
        })
    }
}

/// Search-index data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenSearchSource {
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_region: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationalDatabaseSourceType {
    #[serde(rename = "RDS_HTTP_ENDPOINT")]
    RdsHttpEndpoint,
}

/// Relational-database data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationalDatabaseSource {
    pub relational_database_source_type: RelationalDatabaseSourceType,
    pub database: String,
    pub db_cluster_identifier: String,
    pub schema: String,
    pub aws_secret_store_arn: String,
    pub name: String,
}

/// A classified data-source definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum DataSourceSpec {
    Lambda(LambdaSource),
    DynamoDb(DynamoDbSource),
    Http(HttpSource),
    OpenSearch(OpenSearchSource),
    RelationalDatabase(RelationalDatabaseSource),
}

impl DataSourceSpec {
    /// Classify a raw resolver definition.
    ///
    /// Fails with [`CoreError::UnresolvableDataSource`] when no identifying
    /// field is present, and with [`CoreError::InvalidField`] when the
    /// selected kind is missing a required field.
    pub fn classify(type_name: &str, field_name: &str, def: &Map<String, Value>) -> Result<Self> {
        let path = format!("resolvers.{type_name}.{field_name}");

        let spec = if has(def, "lambdaName") {
            DataSourceSpec::Lambda(parse_kind(&path, def)?)
        } else if has(def, "tableName") {
            DataSourceSpec::DynamoDb(parse_kind(&path, def)?)
        } else if has(def, "authorizationConfig") {
            DataSourceSpec::Http(parse_kind(&path, def)?)
        } else if has(def, "endpoint") {
            DataSourceSpec::OpenSearch(parse_kind(&path, def)?)
        } else if has(def, "relationalDatabaseSourceType") {
            DataSourceSpec::RelationalDatabase(parse_kind(&path, def)?)
        } else {
            return Err(CoreError::unresolvable_data_source(type_name, field_name));
        };

        if spec.name().is_empty() {
            return Err(CoreError::invalid_field(
                path,
                format!(
                    "data source identifier '{}' has no alphanumeric characters",
                    spec.identifier()
                ),
            ));
        }

        Ok(spec)
    }

    pub fn kind(&self) -> DataSourceKind {
        match self {
            DataSourceSpec::Lambda(_) => DataSourceKind::AwsLambda,
            DataSourceSpec::DynamoDb(_) => DataSourceKind::AmazonDynamodb,
            DataSourceSpec::Http(_) => DataSourceKind::Http,
            DataSourceSpec::OpenSearch(_) => DataSourceKind::AmazonOpensearchService,
            DataSourceSpec::RelationalDatabase(_) => DataSourceKind::RelationalDatabase,
        }
    }

    /// The raw identifying field the data-source name derives from.
    pub fn identifier(&self) -> &str {
        match self {
            DataSourceSpec::Lambda(source) => &source.lambda_name,
            DataSourceSpec::DynamoDb(source) => &source.table_name,
            DataSourceSpec::Http(source) => &source.name,
            DataSourceSpec::OpenSearch(source) => &source.name,
            DataSourceSpec::RelationalDatabase(source) => &source.name,
        }
    }

    /// Remote data-source name.
    ///
    /// Non-alphanumeric characters are stripped, so `users-fn` and `usersfn`
    /// both name the data source `usersfn` and are treated as one.
    pub fn name(&self) -> String {
        sanitize_name(self.identifier())
    }

    /// Stable content hash identifying one logical data source.
    ///
    /// Only the data-source fields contribute; resolver type, field and
    /// mapping templates never do.
    pub fn identity_hash(&self) -> String {
        // Struct fields serialize in declaration order, so the encoding is canonical.
        let encoded = serde_json::to_vec(self).unwrap_or_default();
        hex::encode(Sha256::digest(&encoded))
    }
}

/// Strip every character that is not an ASCII letter or digit.
pub fn sanitize_name(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

fn has(def: &Map<String, Value>, key: &str) -> bool {
    def.get(key).is_some_and(|v| !v.is_null())
}

fn parse_kind<T: DeserializeOwned>(path: &str, def: &Map<String, Value>) -> Result<T> {
    serde_json::from_value(Value::Object(def.clone()))
        .map_err(|e| CoreError::invalid_field(path, e.to_string()))
}
