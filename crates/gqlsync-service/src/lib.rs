//! # gqlsync-service
//!
//! Abstraction over the remote GraphQL API-management service that gqlsync
//! reconciles against.
//!
//! This crate defines the traits and types every backend implements. It does
//! not contain any implementations; those are provided by separate crates
//! (`gqlsync-appsync` for AWS AppSync, `gqlsync-service-memory` for tests and
//! offline runs).
//!
//! ## Overview
//!
//! - [`GraphqlApiService`]: list/create/update/delete for resolvers and data sources
//! - [`RoleResolver`], [`FunctionResolver`]: name → ARN lookups the engine depends on
//! - [`ServiceError`]: the classified failure taxonomy the engine recovers from
//!
//! ## Example
//!
//! ```ignore
//! use gqlsync_service::{DynService, ServiceError};
//!
//! async fn data_source_names(service: &DynService, api_id: &str) -> Result<Vec<String>, ServiceError> {
//!     let sources = service.list_data_sources(api_id).await?;
//!     Ok(sources.into_iter().map(|ds| ds.name).collect())
//! }
//! ```

mod error;
mod traits;
mod types;

pub use error::{ErrorCategory, ServiceError};
pub use traits::{FunctionResolver, GraphqlApiService, RoleResolver};
pub use types::{
    DataSourceConfig, DataSourceInput, DeltaSyncConfig, HttpSigningConfig, KIND_DATA_SOURCE,
    KIND_RESOLVER, RdsHttpEndpointConfig, RemoteDataSource, RemoteResolver, ResolverInput,
};

/// Type alias for a service result.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Type alias for a shared service trait object.
pub type DynService = std::sync::Arc<dyn GraphqlApiService>;

/// Type alias for a shared role resolver.
pub type DynRoleResolver = std::sync::Arc<dyn RoleResolver>;

/// Type alias for a shared function resolver.
pub type DynFunctionResolver = std::sync::Arc<dyn FunctionResolver>;
