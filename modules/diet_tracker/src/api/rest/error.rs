use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;

use crate::api::rest::problem::{Problem, ProblemResponse};
use crate::domain::error::DomainError;

/// Helper to create a ProblemResponse with less boilerplate
pub fn from_parts(
    status: StatusCode,
    code: &str,
    title: &str,
    detail: impl Into<String>,
    instance: &str,
) -> ProblemResponse {
    let problem = Problem::new(status, title, detail)
        .with_type(format!("https://errors.diet-tracker.dev/{}", code))
        .with_code(code)
        .with_instance(instance);

    let problem = if let Some(id) = tracing::Span::current().id() {
        problem.with_trace_id(id.into_u64().to_string())
    } else {
        problem
    };

    ProblemResponse(problem)
}

/// Map domain error to RFC 9457 ProblemResponse
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    match e {
        DomainError::FeedNotFound { id } => feed_not_found(&id.to_string(), instance),
        DomainError::Unauthenticated => unauthenticated(instance),
        DomainError::InvalidEmail { email } => from_parts(
            StatusCode::BAD_REQUEST,
            "USERS_INVALID_EMAIL",
            "Invalid email",
            format!("Email '{}' is invalid", email),
            instance,
        ),
        DomainError::Validation { .. } => from_parts(
            StatusCode::BAD_REQUEST,
            "FEEDS_VALIDATION",
            "Validation error",
            format!("{}", e),
            instance,
        ),
        DomainError::Database { .. } => {
            // Details stay in the logs
            tracing::error!(error = ?e, "Database error occurred");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_DB",
                "Internal error",
                "An internal database error occurred",
                instance,
            )
        }
    }
}

pub fn feed_not_found(raw_id: &str, instance: &str) -> ProblemResponse {
    from_parts(
        StatusCode::NOT_FOUND,
        "FEEDS_NOT_FOUND",
        "Feed not found",
        format!("Feed with id {} was not found", raw_id),
        instance,
    )
}

pub fn unauthenticated(instance: &str) -> ProblemResponse {
    from_parts(
        StatusCode::UNAUTHORIZED,
        "SESSION_REQUIRED",
        "Unauthorized",
        "A valid session cookie is required",
        instance,
    )
}

/// Malformed or mistyped JSON bodies are validation failures, reported
/// before any storage access.
pub fn map_json_rejection(rejection: &JsonRejection, instance: &str) -> ProblemResponse {
    tracing::debug!(error = %rejection, "Rejected request body");
    from_parts(
        StatusCode::BAD_REQUEST,
        "REQUEST_VALIDATION",
        "Validation error",
        rejection.body_text(),
        instance,
    )
}

pub fn internal(detail: &str, instance: &str) -> ProblemResponse {
    tracing::error!(detail, "Internal wiring error");
    from_parts(
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL",
        "Internal error",
        "An internal error occurred",
        instance,
    )
}
