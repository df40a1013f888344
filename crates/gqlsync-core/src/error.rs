use thiserror::Error;

/// Errors raised while validating caller-supplied desired state.
///
/// Every variant is raised before any remote call is made, so a `CoreError`
/// always means zero side effects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid shape at {path}: expected {expected}")]
    InvalidShape { path: String, expected: String },

    #[error("Invalid value at {path}: {message}")]
    InvalidField { path: String, message: String },

    #[error("Cannot determine data source for {type_name}.{field_name}")]
    UnresolvableDataSource {
        type_name: String,
        field_name: String,
    },
}

impl CoreError {
    /// Create a new MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }

    /// Create a new InvalidShape error
    pub fn invalid_shape(path: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::InvalidShape {
            path: path.into(),
            expected: expected.into(),
        }
    }

    /// Create a new InvalidField error
    pub fn invalid_field(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new UnresolvableDataSource error
    pub fn unresolvable_data_source(
        type_name: impl Into<String>,
        field_name: impl Into<String>,
    ) -> Self {
        Self::UnresolvableDataSource {
            type_name: type_name.into(),
            field_name: field_name.into(),
        }
    }

    /// Path of the offending input, when the error points at one
    pub fn path(&self) -> Option<String> {
        match self {
            Self::MissingField(field) => Some(field.clone()),
            Self::InvalidShape { path, .. } | Self::InvalidField { path, .. } => {
                Some(path.clone())
            }
            Self::UnresolvableDataSource {
                type_name,
                field_name,
            } => Some(format!("resolvers.{type_name}.{field_name}")),
        }
    }

    /// Get error category for logging/monitoring
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingField(_) | Self::InvalidShape { .. } => ErrorCategory::Shape,
            Self::InvalidField { .. } => ErrorCategory::Validation,
            Self::UnresolvableDataSource { .. } => ErrorCategory::Classification,
        }
    }
}

/// Error categories for monitoring and classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Shape,
    Validation,
    Classification,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Shape => write!(f, "shape"),
            Self::Validation => write!(f, "validation"),
            Self::Classification => write!(f, "classification"),
        }
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_error() {
        let err = CoreError::missing_field("apiId");
        assert_eq!(err.to_string(), "Missing required field: apiId");
        assert_eq!(err.path().as_deref(), Some("apiId"));
        assert_eq!(err.category(), ErrorCategory::Shape);
    }

    #[test]
    fn test_unresolvable_data_source_error() {
        let err = CoreError::unresolvable_data_source("Query", "getUser");
        assert_eq!(
            err.to_string(),
            "Cannot determine data source for Query.getUser"
        );
        assert_eq!(err.path().as_deref(), Some("resolvers.Query.getUser"));
        assert_eq!(err.category(), ErrorCategory::Classification);
    }

    #[test]
    fn test_invalid_field_error() {
        let err = CoreError::invalid_field("resolvers.Query.search", "missing field `name`");
        assert_eq!(
            err.to_string(),
            "Invalid value at resolvers.Query.search: missing field `name`"
        );
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_category_display() {
        assert_eq!(ErrorCategory::Shape.to_string(), "shape");
        assert_eq!(ErrorCategory::Classification.to_string(), "classification");
    }
}
