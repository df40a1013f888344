//! Classification of AWS SDK failures into [`ServiceError`].

use aws_sdk_appsync::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_smithy_types::error::operation::BuildError;
use gqlsync_service::{KIND_DATA_SOURCE, KIND_RESOLVER, ServiceError};

/// The object a failed call addressed.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Target<'a> {
    Type(&'a str),
    Resolver {
        type_name: &'a str,
        field_name: &'a str,
    },
    DataSource(&'a str),
    Api(&'a str),
    Role(&'a str),
    Function(&'a str),
}

impl Target<'_> {
    fn not_found(&self) -> ServiceError {
        match *self {
            Target::Type(type_name) => ServiceError::type_not_found(type_name),
            Target::Resolver {
                type_name,
                field_name,
            } => ServiceError::not_found(KIND_RESOLVER, format!("{type_name}.{field_name}")),
            Target::DataSource(name) => ServiceError::not_found(KIND_DATA_SOURCE, name),
            Target::Api(api_id) => ServiceError::not_found("api", api_id),
            Target::Role(name) => ServiceError::not_found("role", name),
            Target::Function(name) => ServiceError::not_found("function", name),
        }
    }

    fn already_exists(&self) -> ServiceError {
        match *self {
            Target::Resolver {
                type_name,
                field_name,
            } => ServiceError::already_exists(KIND_RESOLVER, format!("{type_name}.{field_name}")),
            Target::DataSource(name) => ServiceError::already_exists(KIND_DATA_SOURCE, name),
            Target::Type(name) => ServiceError::already_exists("type", name),
            Target::Api(api_id) => ServiceError::already_exists("api", api_id),
            Target::Role(name) => ServiceError::already_exists("role", name),
            Target::Function(name) => ServiceError::already_exists("function", name),
        }
    }

    fn type_name(&self) -> Option<&str> {
        match *self {
            Target::Type(type_name) | Target::Resolver { type_name, .. } => Some(type_name),
            _ => None,
        }
    }
}

/// Map an SDK failure of a call against `target` to a [`ServiceError`].
pub(crate) fn classify<E, R>(err: SdkError<E, R>, target: Target<'_>) -> ServiceError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match &err {
        SdkError::ServiceError(service_err) => {
            let inner = service_err.err();
            let code = inner.code().map(str::to_string);
            let message = inner.message().map(str::to_string);
            let detail = DisplayErrorContext(&err).to_string();
            tracing::debug!(
                code = code.as_deref().unwrap_or("unknown"),
                error = %detail,
                "AWS service error"
            );
            classify_code(code.as_deref(), message.as_deref().unwrap_or(&detail), target)
        }
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) | SdkError::ResponseError(_) => {
            ServiceError::transport(DisplayErrorContext(&err).to_string())
        }
        _ => ServiceError::internal(DisplayErrorContext(&err).to_string()),
    }
}

/// Map a service error code and message to a [`ServiceError`].
pub(crate) fn classify_code(code: Option<&str>, message: &str, target: Target<'_>) -> ServiceError {
    let lower = message.to_ascii_lowercase();
    if lower.contains("currently being altered") {
        return ServiceError::schema_conflict(message);
    }

    match code.unwrap_or_default() {
        "ConcurrentModificationException" => ServiceError::schema_conflict(message),
        "NotFoundException" | "ResourceNotFoundException" | "NoSuchEntity" => {
            not_found(&lower, target)
        }
        "BadRequestException" | "ResourceConflictException" | "EntityAlreadyExists"
            if lower.contains("already exists") =>
        {
            target.already_exists()
        }
        "BadRequestException" | "InvalidParameterValueException" | "ValidationException" => {
            ServiceError::bad_request(message)
        }
        "UnauthorizedException" | "AccessDeniedException" | "AccessDenied" => {
            ServiceError::unauthorized(message)
        }
        "LimitExceededException" | "TooManyRequestsException" | "Throttling"
        | "ServiceUnavailableException" => ServiceError::transport(message),
        _ => ServiceError::internal(message),
    }
}

fn not_found(lower: &str, target: Target<'_>) -> ServiceError {
    if lower.contains("no resolver") || lower.contains("resolver not found") {
        if let Target::Resolver { .. } = target {
            return target.not_found();
        }
    }
    if lower.contains("data source") || lower.contains("datasource") {
        if let Target::Resolver { .. } = target {
            return ServiceError::not_found(KIND_DATA_SOURCE, "referenced by resolver");
        }
        return target.not_found();
    }
    if lower.contains("type") {
        if let Some(type_name) = target.type_name() {
            return ServiceError::type_not_found(type_name);
        }
    }
    target.not_found()
}

/// Map a payload that failed to build locally.
pub(crate) fn build_error(err: BuildError) -> ServiceError {
    ServiceError::bad_request(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESOLVER: Target<'static> = Target::Resolver {
        type_name: "Query",
        field_name: "getUser",
    };

    #[test]
    fn test_schema_lock_conflict() {
        let err = classify_code(
            Some("ConcurrentModificationException"),
            "Schema is currently being altered, please wait until that is complete.",
            RESOLVER,
        );
        assert!(err.is_schema_conflict());

        let err = classify_code(
            Some("BadRequestException"),
            "Schema is currently being altered, please wait until that is complete.",
            Target::DataSource("usersFn"),
        );
        assert!(err.is_schema_conflict());
    }

    #[test]
    fn test_missing_resolver() {
        let err = classify_code(Some("NotFoundException"), "No resolver found.", RESOLVER);
        assert!(err.is_missing(KIND_RESOLVER));
    }

    #[test]
    fn test_missing_type() {
        let err = classify_code(
            Some("NotFoundException"),
            "Type Mutation not found in schema.",
            RESOLVER,
        );
        assert_eq!(err, ServiceError::type_not_found("Query"));

        let err = classify_code(
            Some("NotFoundException"),
            "Type not found.",
            Target::Type("Mutation"),
        );
        assert!(err.is_type_not_found());
    }

    #[test]
    fn test_missing_data_source() {
        let err = classify_code(
            Some("NotFoundException"),
            "Data source usersFn not found.",
            Target::DataSource("usersFn"),
        );
        assert!(err.is_missing(KIND_DATA_SOURCE));

        let err = classify_code(
            Some("NotFoundException"),
            "No data source found named usersFn.",
            RESOLVER,
        );
        assert!(err.is_missing(KIND_DATA_SOURCE));
        assert!(!err.is_missing(KIND_RESOLVER));
    }

    #[test]
    fn test_already_exists() {
        let err = classify_code(
            Some("BadRequestException"),
            "Data source with name usersFn already exists",
            Target::DataSource("usersFn"),
        );
        assert_eq!(
            err,
            ServiceError::already_exists(KIND_DATA_SOURCE, "usersFn")
        );
    }

    #[test]
    fn test_bad_request() {
        let err = classify_code(
            Some("BadRequestException"),
            "Invalid endpoint",
            Target::DataSource("rest"),
        );
        assert_eq!(err, ServiceError::bad_request("Invalid endpoint"));
    }

    #[test]
    fn test_identity_lookups() {
        let err = classify_code(
            Some("NoSuchEntity"),
            "The role with name appsync cannot be found.",
            Target::Role("appsync"),
        );
        assert_eq!(err, ServiceError::not_found("role", "appsync"));

        let err = classify_code(
            Some("ResourceNotFoundException"),
            "Function not found: arn:aws:lambda:us-east-1:000000000000:function:usersFn",
            Target::Function("usersFn"),
        );
        assert_eq!(err, ServiceError::not_found("function", "usersFn"));
    }

    #[test]
    fn test_access_and_throttling() {
        assert!(matches!(
            classify_code(Some("UnauthorizedException"), "nope", RESOLVER),
            ServiceError::Unauthorized { .. }
        ));
        assert!(matches!(
            classify_code(Some("TooManyRequestsException"), "slow down", RESOLVER),
            ServiceError::Transport { .. }
        ));
        assert!(matches!(
            classify_code(None, "mystery", RESOLVER),
            ServiceError::Internal { .. }
        ));
    }
}
