use gqlsync_core::CoreError;
use gqlsync_service::ServiceError;
use thiserror::Error;

/// Errors that abort a reconciliation run.
///
/// Errors are `Clone` so one settled data-source provisioning result can be
/// handed to every resolver that shares it.
#[derive(Debug, Clone, Error)]
pub enum ReconcileError {
    /// The request was malformed; nothing was sent to the remote service.
    #[error("Validation failed: {0}")]
    Validation(#[from] CoreError),

    /// A desired resolver targets a type the remote schema does not define.
    #[error("Schema mismatch: type {type_name} (field {field_name}) is not defined by the API schema")]
    SchemaMismatch {
        type_name: String,
        field_name: String,
    },

    /// A role or function name could not be resolved to an ARN.
    #[error("Cannot resolve {kind} '{name}': {source}")]
    Identity {
        kind: String,
        name: String,
        source: ServiceError,
    },

    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Schema-lock conflicts persisted through the configured number of attempts.
    #[error("Gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        last: Box<ReconcileError>,
    },
}

impl ReconcileError {
    pub fn schema_mismatch(type_name: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            type_name: type_name.into(),
            field_name: field_name.into(),
        }
    }

    pub fn identity(kind: impl Into<String>, name: impl Into<String>, source: ServiceError) -> Self {
        Self::Identity {
            kind: kind.into(),
            name: name.into(),
            source,
        }
    }

    /// Returns `true` if the run should be restarted from a fresh snapshot.
    pub fn is_schema_conflict(&self) -> bool {
        matches!(self, Self::Service(err) if err.is_schema_conflict())
    }

    /// Returns `true` if the error was raised before any remote call.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Convenience result type for reconciliation
pub type Result<T> = std::result::Result<T, ReconcileError>;
