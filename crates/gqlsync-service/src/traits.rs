//! Service traits for the remote API-management abstraction layer.

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::types::{DataSourceInput, RemoteDataSource, RemoteResolver, ResolverInput};

/// The remote GraphQL API-management service.
///
/// Implementations must be thread-safe (`Send + Sync`) and must classify
/// their native failures into [`ServiceError`] variants, because the
/// reconciliation engine decides recoverability from the variant alone.
///
/// # Example
///
/// ```ignore
/// use gqlsync_service::{GraphqlApiService, ServiceError};
///
/// async fn resolver_count(service: &dyn GraphqlApiService, api_id: &str) -> Result<usize, ServiceError> {
///     let queries = service.list_resolvers(api_id, "Query").await?;
///     Ok(queries.len())
/// }
/// ```
#[async_trait]
pub trait GraphqlApiService: Send + Sync {
    // ==================== Resolvers ====================

    /// Lists every resolver attached to fields of `type_name`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::TypeNotFound` if the schema does not define the type.
    async fn list_resolvers(
        &self,
        api_id: &str,
        type_name: &str,
    ) -> Result<Vec<RemoteResolver>, ServiceError>;

    /// Creates a resolver.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::TypeNotFound` if the schema does not define the type.
    async fn create_resolver(
        &self,
        api_id: &str,
        input: &ResolverInput,
    ) -> Result<RemoteResolver, ServiceError>;

    /// Updates an existing resolver, addressed by type and field.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if no resolver is attached to the field.
    /// Returns `ServiceError::TypeNotFound` if the schema does not define the type.
    async fn update_resolver(
        &self,
        api_id: &str,
        input: &ResolverInput,
    ) -> Result<RemoteResolver, ServiceError>;

    /// Deletes the resolver attached to `type_name.field_name`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if no resolver is attached to the field.
    async fn delete_resolver(
        &self,
        api_id: &str,
        type_name: &str,
        field_name: &str,
    ) -> Result<(), ServiceError>;

    // ==================== Data sources ====================

    /// Lists every data source registered under the API.
    async fn list_data_sources(&self, api_id: &str) -> Result<Vec<RemoteDataSource>, ServiceError>;

    /// Registers a new data source.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::AlreadyExists` if the name is taken.
    async fn create_data_source(
        &self,
        api_id: &str,
        input: &DataSourceInput,
    ) -> Result<RemoteDataSource, ServiceError>;

    /// Updates an existing data source, addressed by name.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if no data source has that name.
    async fn update_data_source(
        &self,
        api_id: &str,
        input: &DataSourceInput,
    ) -> Result<RemoteDataSource, ServiceError>;

    /// Deletes a data source by name.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if no data source has that name.
    async fn delete_data_source(&self, api_id: &str, name: &str) -> Result<(), ServiceError>;

    // ==================== Metadata ====================

    /// Returns the name of this backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}

/// Resolves IAM role names to role ARNs.
#[async_trait]
pub trait RoleResolver: Send + Sync {
    async fn role_arn(&self, role_name: &str) -> Result<String, ServiceError>;
}

/// Resolves compute-function names to function ARNs.
#[async_trait]
pub trait FunctionResolver: Send + Sync {
    async fn function_arn(&self, function_name: &str) -> Result<String, ServiceError>;
}
