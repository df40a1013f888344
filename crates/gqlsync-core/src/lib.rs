//! # gqlsync-core
//!
//! Desired-state model for gqlsync: resolver definitions, data-source
//! classification, data-source naming and identity hashing.
//!
//! Everything here is pure. Caller input is validated and classified into
//! typed values before any remote call is made.

pub mod data_source;
pub mod desired;
pub mod error;
pub mod resolver;
pub mod root_type;

pub use data_source::{
    AuthorizationType, AwsIamSigning, DataSourceKind, DataSourceSpec, DynamoDbSource,
    HttpAuthorization, HttpSource, LambdaSource, OpenSearchSource, RelationalDatabaseSource,
    RelationalDatabaseSourceType, sanitize_name,
};
pub use desired::DesiredState;
pub use error::{CoreError, ErrorCategory, Result};
pub use resolver::{DEFAULT_REQUEST_TEMPLATE, DEFAULT_RESPONSE_TEMPLATE, ResolverSpec};
pub use root_type::RootType;
