//! In-memory GraphQL API-management service for gqlsync.
//!
//! This crate provides an in-memory implementation of the `GraphqlApiService`
//! trait from `gqlsync-service`, plus static ARN resolvers. It backs the
//! reconciliation engine's tests and offline dry runs.
//!
//! # Example
//!
//! ```ignore
//! use gqlsync_service_memory::{InMemoryService, Operation};
//!
//! let service = InMemoryService::new();
//! service.inject_schema_conflicts(Operation::UpdateResolver, 1).await;
//! // ... run a reconciliation against `service` ...
//! assert_eq!(service.count(Operation::CreateDataSource).await, 1);
//! ```

mod arn;
mod service;

pub use arn::StaticArnResolver;
pub use service::{InMemoryService, Operation, ServiceCall};

// Re-export the service trait for convenience
pub use gqlsync_service::{GraphqlApiService, ServiceError};

/// Creates a new in-memory service behind the shared trait object.
pub fn create_service() -> gqlsync_service::DynService {
    std::sync::Arc::new(InMemoryService::new())
}
