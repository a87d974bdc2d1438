use thiserror::Error;
use uuid::Uuid;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone)]
pub enum RecipesError {
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: Uuid },

    #[error("User with email '{email}' already exists")]
    Conflict { email: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Unable to authenticate with provided credentials")]
    Unauthorized,

    #[error("Internal error")]
    Internal,
}

impl RecipesError {
    pub fn not_found(resource: &'static str, id: Uuid) -> Self {
        Self::NotFound { resource, id }
    }

    pub fn conflict(email: String) -> Self {
        Self::Conflict { email }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self::Unauthorized
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}

impl From<crate::domain::error::DomainError> for RecipesError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            UserNotFound { id } => Self::not_found("User", id),
            TagNotFound { id } => Self::not_found("Tag", id),
            IngredientNotFound { id } => Self::not_found("Ingredient", id),
            RecipeNotFound { id } => Self::not_found("Recipe", id),
            EmailAlreadyExists { email } => Self::conflict(email),
            EmailRequired => Self::validation("Users must have an email address"),
            InvalidEmail { email } => Self::validation(format!("Invalid email: {email}")),
            PasswordTooShort { min } => {
                Self::validation(format!("Password must be at least {min} characters"))
            }
            InvalidCredentials => Self::unauthorized(),
            Validation { field, message } => Self::validation(format!("{field}: {message}")),
            Database { .. } => Self::internal(),
        }
    }
}
