//! Error types for the remote service abstraction layer.

use std::fmt;

/// Errors reported by a remote GraphQL API-management service.
///
/// Backends classify their native errors into these variants; the
/// reconciliation engine decides what is recoverable from the variant alone.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// The addressed resolver or data source does not exist.
    #[error("{kind} not found: {name}")]
    NotFound {
        /// Object kind, `resolver` or `data source`.
        kind: String,
        /// Name of the missing object.
        name: String,
    },

    /// The addressed type is not defined by the API schema.
    #[error("Type not found in schema: {type_name}")]
    TypeNotFound {
        /// The missing type.
        type_name: String,
    },

    /// Attempted to create an object whose name is taken.
    #[error("{kind} already exists: {name}")]
    AlreadyExists {
        /// Object kind, `resolver` or `data source`.
        kind: String,
        /// Name of the existing object.
        name: String,
    },

    /// The schema is being altered concurrently; the call may succeed later.
    #[error("Schema conflict: {message}")]
    SchemaConflict {
        /// Message reported by the service.
        message: String,
    },

    /// The service rejected the request.
    #[error("Bad request: {message}")]
    BadRequest {
        /// Message reported by the service.
        message: String,
    },

    /// The caller is not allowed to perform the call.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Message reported by the service.
        message: String,
    },

    /// The call did not reach the service or timed out.
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the failure.
        message: String,
    },

    /// Any other service failure.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the failure.
        message: String,
    },
}

impl ServiceError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Creates a new `TypeNotFound` error.
    #[must_use]
    pub fn type_not_found(type_name: impl Into<String>) -> Self {
        Self::TypeNotFound {
            type_name: type_name.into(),
        }
    }

    /// Creates a new `AlreadyExists` error.
    #[must_use]
    pub fn already_exists(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::AlreadyExists {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Creates a new `SchemaConflict` error.
    #[must_use]
    pub fn schema_conflict(message: impl Into<String>) -> Self {
        Self::SchemaConflict {
            message: message.into(),
        }
    }

    /// Creates a new `BadRequest` error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Creates a new `Unauthorized` error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates a new `Transport` error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if the addressed object does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if an object of the given kind does not exist.
    ///
    /// Resolver calls can also fail because the referenced data source is
    /// missing; this tells the two apart.
    #[must_use]
    pub fn is_missing(&self, object_kind: &str) -> bool {
        matches!(self, Self::NotFound { kind, .. } if kind == object_kind)
    }

    /// Returns `true` if the addressed type is absent from the schema.
    #[must_use]
    pub fn is_type_not_found(&self) -> bool {
        matches!(self, Self::TypeNotFound { .. })
    }

    /// Returns `true` if this is an already exists error.
    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    /// Returns `true` if the schema is locked by a concurrent alteration.
    #[must_use]
    pub fn is_schema_conflict(&self) -> bool {
        matches!(self, Self::SchemaConflict { .. })
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } | Self::TypeNotFound { .. } => ErrorCategory::NotFound,
            Self::AlreadyExists { .. } | Self::SchemaConflict { .. } => ErrorCategory::Conflict,
            Self::BadRequest { .. } => ErrorCategory::Validation,
            Self::Unauthorized { .. } => ErrorCategory::Authorization,
            Self::Transport { .. } => ErrorCategory::Infrastructure,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Categories of service errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Object or type not found.
    NotFound,
    /// Conflict (existence or schema lock).
    Conflict,
    /// Rejected request.
    Validation,
    /// Missing permissions.
    Authorization,
    /// Network or timeout failure.
    Infrastructure,
    /// Internal error.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Conflict => write!(f, "conflict"),
            Self::Validation => write!(f, "validation"),
            Self::Authorization => write!(f, "authorization"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ServiceError::not_found("data source", "usersFn");
        assert_eq!(err.to_string(), "data source not found: usersFn");

        let err = ServiceError::type_not_found("Mutation");
        assert_eq!(err.to_string(), "Type not found in schema: Mutation");

        let err = ServiceError::schema_conflict("Schema is currently being altered");
        assert_eq!(
            err.to_string(),
            "Schema conflict: Schema is currently being altered"
        );
    }

    #[test]
    fn test_error_predicates() {
        let err = ServiceError::not_found("resolver", "Query.getUser");
        assert!(err.is_not_found());
        assert!(!err.is_type_not_found());
        assert!(!err.is_schema_conflict());
        assert!(err.is_missing("resolver"));
        assert!(!err.is_missing("data source"));

        let err = ServiceError::already_exists("data source", "usersFn");
        assert!(err.is_already_exists());
        assert!(!err.is_not_found());

        assert!(ServiceError::schema_conflict("busy").is_schema_conflict());
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            ServiceError::type_not_found("Query").category(),
            ErrorCategory::NotFound
        );
        assert_eq!(
            ServiceError::schema_conflict("busy").category(),
            ErrorCategory::Conflict
        );
        assert_eq!(
            ServiceError::transport("timeout").category(),
            ErrorCategory::Infrastructure
        );
        assert_eq!(ErrorCategory::Authorization.to_string(), "authorization");
    }
}
