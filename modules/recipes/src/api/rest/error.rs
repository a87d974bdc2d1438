use axum::http::StatusCode;
use modkit::api::problem::{Problem, ProblemResponse, ValidationError};

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
        .with_code(code)
        .with_instance(instance);
    ProblemResponse(problem)
}

fn validation_problem(field: &str, detail: impl Into<String>, instance: &str) -> ProblemResponse {
    let detail = detail.into();
    let problem = Problem::new(StatusCode::BAD_REQUEST, "Validation error", detail.clone())
        .with_code("RECIPES_VALIDATION")
        .with_instance(instance)
        .with_errors(vec![ValidationError {
            detail,
            pointer: format!("/{field}"),
        }]);
    ProblemResponse(problem)
}

/// Map domain error to RFC9457 ProblemResponse
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    match e {
        DomainError::UserNotFound { .. }
        | DomainError::TagNotFound { .. }
        | DomainError::IngredientNotFound { .. }
        | DomainError::RecipeNotFound { .. } => from_parts(
            StatusCode::NOT_FOUND,
            "RECIPES_NOT_FOUND",
            "Not found",
            format!("{e}"),
            instance,
        ),
        DomainError::EmailAlreadyExists { email } => from_parts(
            StatusCode::CONFLICT,
            "RECIPES_EMAIL_CONFLICT",
            "Email already exists",
            format!("Email '{email}' is already in use"),
            instance,
        ),
        DomainError::EmailRequired => {
            validation_problem("email", "Users must have an email address", instance)
        }
        DomainError::InvalidEmail { email } => {
            validation_problem("email", format!("Email '{email}' is invalid"), instance)
        }
        DomainError::PasswordTooShort { min } => validation_problem(
            "password",
            format!("Ensure this field has at least {min} characters."),
            instance,
        ),
        DomainError::InvalidCredentials => from_parts(
            StatusCode::BAD_REQUEST,
            "RECIPES_INVALID_CREDENTIALS",
            "Invalid credentials",
            "Unable to authenticate with provided credentials",
            instance,
        ),
        DomainError::Validation { field, message } => {
            validation_problem(field, message.clone(), instance)
        }
        DomainError::Database { .. } => {
            // Log the internal error details but don't expose them to the client
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
