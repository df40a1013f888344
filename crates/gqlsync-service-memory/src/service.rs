use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use gqlsync_core::RootType;
use gqlsync_service::{
    DataSourceInput, GraphqlApiService, KIND_DATA_SOURCE, KIND_RESOLVER, RemoteDataSource,
    RemoteResolver, ResolverInput, ServiceError,
};
use tokio::sync::RwLock;

/// Remote calls recorded by [`InMemoryService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListResolvers,
    CreateResolver,
    UpdateResolver,
    DeleteResolver,
    ListDataSources,
    CreateDataSource,
    UpdateDataSource,
    DeleteDataSource,
}

impl Operation {
    /// Returns `true` for calls that mutate remote state.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Operation::ListResolvers | Operation::ListDataSources)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::ListResolvers => "ListResolvers",
            Operation::CreateResolver => "CreateResolver",
            Operation::UpdateResolver => "UpdateResolver",
            Operation::DeleteResolver => "DeleteResolver",
            Operation::ListDataSources => "ListDataSources",
            Operation::CreateDataSource => "CreateDataSource",
            Operation::UpdateDataSource => "UpdateDataSource",
            Operation::DeleteDataSource => "DeleteDataSource",
        };
        f.write_str(name)
    }
}

/// One journaled call: the operation and what it addressed
/// (`Type.field`, a data-source name, or a type name for listings).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCall {
    pub operation: Operation,
    pub target: String,
}

type ResolverKey = (String, String);

#[derive(Debug, Default)]
struct ApiState {
    resolvers: BTreeMap<ResolverKey, RemoteResolver>,
    data_sources: BTreeMap<String, StoredDataSource>,
}

#[derive(Debug, Clone)]
struct StoredDataSource {
    remote: RemoteDataSource,
    input: DataSourceInput,
}

#[derive(Debug, Default)]
struct Faults {
    /// Remaining schema conflicts to raise, per operation.
    schema_conflicts: HashMap<Operation, u32>,
    /// Data-source names whose next create loses a race to a concurrent creator.
    create_races: HashSet<String>,
}

/// In-memory GraphQL API-management service.
///
/// Behaves like the remote service for everything the reconciliation engine
/// relies on:
/// - listing resolvers of a type the schema lacks fails with `TypeNotFound`
/// - updating a missing resolver or data source fails with `NotFound`
/// - creating a taken data-source name fails with `AlreadyExists`
/// - deleting a data source still bound to a resolver fails with `BadRequest`
///
/// Every call is journaled, and schema-lock conflicts or create races can be
/// injected to exercise the engine's recovery paths.
#[derive(Debug, Clone)]
pub struct InMemoryService {
    schema_types: Arc<RwLock<BTreeSet<String>>>,
    apis: Arc<RwLock<HashMap<String, ApiState>>>,
    journal: Arc<RwLock<Vec<ServiceCall>>>,
    faults: Arc<RwLock<Faults>>,
}

impl Default for InMemoryService {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryService {
    /// Creates a service whose schema defines every managed root type.
    pub fn new() -> Self {
        Self::with_schema_types(RootType::ALL.iter().map(RootType::as_str))
    }

    /// Creates a service whose schema defines exactly `types`.
    pub fn with_schema_types<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            schema_types: Arc::new(RwLock::new(types.into_iter().map(Into::into).collect())),
            apis: Arc::new(RwLock::new(HashMap::new())),
            journal: Arc::new(RwLock::new(Vec::new())),
            faults: Arc::new(RwLock::new(Faults::default())),
        }
    }

    // ==================== Seeding ====================

    /// Registers a data source directly, bypassing the journal.
    pub async fn seed_data_source(&self, api_id: &str, input: DataSourceInput) {
        let stored = stored_data_source(api_id, input);
        let mut apis = self.apis.write().await;
        apis.entry(api_id.to_string())
            .or_default()
            .data_sources
            .insert(stored.remote.name.clone(), stored);
    }

    /// Registers a resolver directly, bypassing the journal.
    pub async fn seed_resolver(&self, api_id: &str, input: ResolverInput) {
        let remote = remote_resolver(api_id, &input);
        let mut apis = self.apis.write().await;
        apis.entry(api_id.to_string())
            .or_default()
            .resolvers
            .insert((input.type_name, input.field_name), remote);
    }

    // ==================== Fault injection ====================

    /// Makes the next `count` calls of `operation` fail with a schema conflict.
    pub async fn inject_schema_conflicts(&self, operation: Operation, count: u32) {
        let mut faults = self.faults.write().await;
        *faults.schema_conflicts.entry(operation).or_insert(0) += count;
    }

    /// Makes the next create of data source `name` lose a race: a concurrent
    /// creator registers it first and the create fails with `AlreadyExists`.
    pub async fn inject_create_race(&self, name: impl Into<String>) {
        self.faults.write().await.create_races.insert(name.into());
    }

    // ==================== Inspection ====================

    /// Every call received so far, in arrival order.
    pub async fn calls(&self) -> Vec<ServiceCall> {
        self.journal.read().await.clone()
    }

    /// Number of calls of `operation` received so far.
    pub async fn count(&self, operation: Operation) -> usize {
        self.journal
            .read()
            .await
            .iter()
            .filter(|call| call.operation == operation)
            .count()
    }

    /// Number of mutating calls received so far.
    pub async fn mutation_count(&self) -> usize {
        self.journal
            .read()
            .await
            .iter()
            .filter(|call| call.operation.is_mutation())
            .count()
    }

    pub async fn clear_calls(&self) {
        self.journal.write().await.clear();
    }

    /// `(type, field)` pairs of every registered resolver.
    pub async fn resolver_keys(&self, api_id: &str) -> BTreeSet<(String, String)> {
        let apis = self.apis.read().await;
        apis.get(api_id)
            .map(|api| api.resolvers.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub async fn resolver(
        &self,
        api_id: &str,
        type_name: &str,
        field_name: &str,
    ) -> Option<RemoteResolver> {
        let apis = self.apis.read().await;
        apis.get(api_id)?
            .resolvers
            .get(&(type_name.to_string(), field_name.to_string()))
            .cloned()
    }

    /// Names of every registered data source.
    pub async fn data_source_names(&self, api_id: &str) -> BTreeSet<String> {
        let apis = self.apis.read().await;
        apis.get(api_id)
            .map(|api| api.data_sources.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// The last payload a data source was registered with.
    pub async fn data_source_input(&self, api_id: &str, name: &str) -> Option<DataSourceInput> {
        let apis = self.apis.read().await;
        apis.get(api_id)?
            .data_sources
            .get(name)
            .map(|stored| stored.input.clone())
    }

    // ==================== Internals ====================

    async fn record(&self, operation: Operation, target: impl Into<String>) -> Result<(), ServiceError> {
        self.journal.write().await.push(ServiceCall {
            operation,
            target: target.into(),
        });

        let mut faults = self.faults.write().await;
        if let Some(remaining) = faults.schema_conflicts.get_mut(&operation) {
            if *remaining > 0 {
                *remaining -= 1;
                tracing::debug!(%operation, "Injected schema conflict");
                return Err(ServiceError::schema_conflict(
                    "Schema is currently being altered, please wait until that is complete.",
                ));
            }
        }
        Ok(())
    }

    async fn require_type(&self, type_name: &str) -> Result<(), ServiceError> {
        if self.schema_types.read().await.contains(type_name) {
            Ok(())
        } else {
            Err(ServiceError::type_not_found(type_name))
        }
    }
}

fn data_source_arn(api_id: &str, name: &str) -> String {
    format!("arn:aws:appsync:us-east-1:000000000000:apis/{api_id}/datasources/{name}")
}

fn resolver_arn(api_id: &str, type_name: &str, field_name: &str) -> String {
    format!(
        "arn:aws:appsync:us-east-1:000000000000:apis/{api_id}/types/{type_name}/resolvers/{field_name}"
    )
}

fn stored_data_source(api_id: &str, input: DataSourceInput) -> StoredDataSource {
    StoredDataSource {
        remote: RemoteDataSource {
            name: input.name.clone(),
            data_source_arn: Some(data_source_arn(api_id, &input.name)),
            kind: Some(input.kind().as_str().to_string()),
        },
        input,
    }
}

fn remote_resolver(api_id: &str, input: &ResolverInput) -> RemoteResolver {
    RemoteResolver {
        type_name: input.type_name.clone(),
        field_name: input.field_name.clone(),
        data_source_name: Some(input.data_source_name.clone()),
        resolver_arn: Some(resolver_arn(api_id, &input.type_name, &input.field_name)),
        request_mapping_template: Some(input.request_mapping_template.clone()),
        response_mapping_template: Some(input.response_mapping_template.clone()),
    }
}

#[async_trait]
impl GraphqlApiService for InMemoryService {
    async fn list_resolvers(
        &self,
        api_id: &str,
        type_name: &str,
    ) -> Result<Vec<RemoteResolver>, ServiceError> {
        self.record(Operation::ListResolvers, type_name).await?;
        self.require_type(type_name).await?;

        let apis = self.apis.read().await;
        Ok(apis
            .get(api_id)
            .map(|api| {
                api.resolvers
                    .values()
                    .filter(|r| r.type_name == type_name)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn create_resolver(
        &self,
        api_id: &str,
        input: &ResolverInput,
    ) -> Result<RemoteResolver, ServiceError> {
        self.record(Operation::CreateResolver, input.key()).await?;
        self.require_type(&input.type_name).await?;

        let mut apis = self.apis.write().await;
        let api = apis.entry(api_id.to_string()).or_default();
        if !api.data_sources.contains_key(&input.data_source_name) {
            return Err(ServiceError::not_found(
                KIND_DATA_SOURCE,
                &input.data_source_name,
            ));
        }
        let key = (input.type_name.clone(), input.field_name.clone());
        if api.resolvers.contains_key(&key) {
            return Err(ServiceError::already_exists(KIND_RESOLVER, input.key()));
        }

        let remote = remote_resolver(api_id, input);
        api.resolvers.insert(key, remote.clone());
        Ok(remote)
    }

    async fn update_resolver(
        &self,
        api_id: &str,
        input: &ResolverInput,
    ) -> Result<RemoteResolver, ServiceError> {
        self.record(Operation::UpdateResolver, input.key()).await?;
        self.require_type(&input.type_name).await?;

        let mut apis = self.apis.write().await;
        let api = apis.entry(api_id.to_string()).or_default();
        let key = (input.type_name.clone(), input.field_name.clone());
        if !api.resolvers.contains_key(&key) {
            return Err(ServiceError::not_found(KIND_RESOLVER, input.key()));
        }
        if !api.data_sources.contains_key(&input.data_source_name) {
            return Err(ServiceError::not_found(
                KIND_DATA_SOURCE,
                &input.data_source_name,
            ));
        }

        let remote = remote_resolver(api_id, input);
        api.resolvers.insert(key, remote.clone());
        Ok(remote)
    }

    async fn delete_resolver(
        &self,
        api_id: &str,
        type_name: &str,
        field_name: &str,
    ) -> Result<(), ServiceError> {
        let label = format!("{type_name}.{field_name}");
        self.record(Operation::DeleteResolver, label.clone()).await?;

        let mut apis = self.apis.write().await;
        let removed = apis
            .get_mut(api_id)
            .and_then(|api| {
                api.resolvers
                    .remove(&(type_name.to_string(), field_name.to_string()))
            });
        match removed {
            Some(_) => Ok(()),
            None => Err(ServiceError::not_found(KIND_RESOLVER, label)),
        }
    }

    async fn list_data_sources(&self, api_id: &str) -> Result<Vec<RemoteDataSource>, ServiceError> {
        self.record(Operation::ListDataSources, api_id).await?;

        let apis = self.apis.read().await;
        Ok(apis
            .get(api_id)
            .map(|api| {
                api.data_sources
                    .values()
                    .map(|stored| stored.remote.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn create_data_source(
        &self,
        api_id: &str,
        input: &DataSourceInput,
    ) -> Result<RemoteDataSource, ServiceError> {
        self.record(Operation::CreateDataSource, &input.name).await?;

        let raced = self.faults.write().await.create_races.remove(&input.name);

        let mut apis = self.apis.write().await;
        let api = apis.entry(api_id.to_string()).or_default();
        if raced {
            // A concurrent creator wins with the same payload.
            let stored = stored_data_source(api_id, input.clone());
            api.data_sources.insert(input.name.clone(), stored);
        }
        if api.data_sources.contains_key(&input.name) {
            return Err(ServiceError::already_exists(KIND_DATA_SOURCE, &input.name));
        }

        let stored = stored_data_source(api_id, input.clone());
        let remote = stored.remote.clone();
        api.data_sources.insert(input.name.clone(), stored);
        Ok(remote)
    }

    async fn update_data_source(
        &self,
        api_id: &str,
        input: &DataSourceInput,
    ) -> Result<RemoteDataSource, ServiceError> {
        self.record(Operation::UpdateDataSource, &input.name).await?;

        let mut apis = self.apis.write().await;
        let api = apis.entry(api_id.to_string()).or_default();
        if !api.data_sources.contains_key(&input.name) {
            return Err(ServiceError::not_found(KIND_DATA_SOURCE, &input.name));
        }

        let stored = stored_data_source(api_id, input.clone());
        let remote = stored.remote.clone();
        api.data_sources.insert(input.name.clone(), stored);
        Ok(remote)
    }

    async fn delete_data_source(&self, api_id: &str, name: &str) -> Result<(), ServiceError> {
        self.record(Operation::DeleteDataSource, name).await?;

        let mut apis = self.apis.write().await;
        let Some(api) = apis.get_mut(api_id) else {
            return Err(ServiceError::not_found(KIND_DATA_SOURCE, name));
        };
        if let Some(bound) = api
            .resolvers
            .values()
            .find(|r| r.data_source_name.as_deref() == Some(name))
        {
            return Err(ServiceError::bad_request(format!(
                "Data source {name} is still used by resolver {}",
                bound.key()
            )));
        }
        match api.data_sources.remove(name) {
            Some(_) => Ok(()),
            None => Err(ServiceError::not_found(KIND_DATA_SOURCE, name)),
        }
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gqlsync_service::DataSourceConfig;

    const API: &str = "api-1";

    fn lambda_input(name: &str) -> DataSourceInput {
        DataSourceInput {
            name: name.to_string(),
            service_role_arn: "arn:aws:iam::000000000000:role/appsync".to_string(),
            config: DataSourceConfig::Lambda {
                function_arn: format!("arn:aws:lambda:us-east-1:000000000000:function:{name}"),
            },
        }
    }

    fn resolver_input(type_name: &str, field_name: &str, data_source: &str) -> ResolverInput {
        ResolverInput {
            type_name: type_name.to_string(),
            field_name: field_name.to_string(),
            data_source_name: data_source.to_string(),
            request_mapping_template: "req".to_string(),
            response_mapping_template: "res".to_string(),
        }
    }

    #[tokio::test]
    async fn test_update_missing_data_source() {
        let service = InMemoryService::new();
        let err = service
            .update_data_source(API, &lambda_input("usersFn"))
            .await
            .unwrap_err();
        assert!(err.is_missing(KIND_DATA_SOURCE));
    }

    #[tokio::test]
    async fn test_create_then_create_again() {
        let service = InMemoryService::new();
        service
            .create_data_source(API, &lambda_input("usersFn"))
            .await
            .unwrap();
        let err = service
            .create_data_source(API, &lambda_input("usersFn"))
            .await
            .unwrap_err();
        assert!(err.is_already_exists());
        assert_eq!(service.count(Operation::CreateDataSource).await, 2);
    }

    #[tokio::test]
    async fn test_list_resolvers_unknown_type() {
        let service = InMemoryService::with_schema_types(["Query"]);
        let err = service.list_resolvers(API, "Mutation").await.unwrap_err();
        assert!(err.is_type_not_found());
        assert!(service.list_resolvers(API, "Query").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_resolver_requires_data_source() {
        let service = InMemoryService::new();
        let err = service
            .create_resolver(API, &resolver_input("Query", "getUser", "usersFn"))
            .await
            .unwrap_err();
        assert!(err.is_missing(KIND_DATA_SOURCE));
        assert!(!err.is_missing(KIND_RESOLVER));
    }

    #[tokio::test]
    async fn test_delete_bound_data_source_rejected() {
        let service = InMemoryService::new();
        service.seed_data_source(API, lambda_input("usersFn")).await;
        service
            .seed_resolver(API, resolver_input("Query", "getUser", "usersFn"))
            .await;

        let err = service.delete_data_source(API, "usersFn").await.unwrap_err();
        assert!(matches!(err, ServiceError::BadRequest { .. }));

        service.delete_resolver(API, "Query", "getUser").await.unwrap();
        service.delete_data_source(API, "usersFn").await.unwrap();
        assert!(service.data_source_names(API).await.is_empty());
    }

    #[tokio::test]
    async fn test_injected_schema_conflict() {
        let service = InMemoryService::new();
        service
            .inject_schema_conflicts(Operation::ListDataSources, 1)
            .await;

        let err = service.list_data_sources(API).await.unwrap_err();
        assert!(err.is_schema_conflict());
        assert!(service.list_data_sources(API).await.is_ok());
        assert_eq!(service.count(Operation::ListDataSources).await, 2);
        assert_eq!(service.mutation_count().await, 0);
    }

    #[tokio::test]
    async fn test_injected_create_race() {
        let service = InMemoryService::new();
        service.inject_create_race("usersFn").await;

        let err = service
            .create_data_source(API, &lambda_input("usersFn"))
            .await
            .unwrap_err();
        assert!(err.is_already_exists());
        assert!(service.data_source_names(API).await.contains("usersFn"));
        assert!(
            service
                .update_data_source(API, &lambda_input("usersFn"))
                .await
                .is_ok()
        );
    }
}
