use thiserror::Error;
use uuid::Uuid;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("User not found: {id}")]
    UserNotFound { id: Uuid },

    #[error("Tag not found: {id}")]
    TagNotFound { id: Uuid },

    #[error("Ingredient not found: {id}")]
    IngredientNotFound { id: Uuid },

    #[error("Recipe not found: {id}")]
    RecipeNotFound { id: Uuid },

    #[error("User must have an email address")]
    EmailRequired,

    #[error("Invalid email format: '{email}'")]
    InvalidEmail { email: String },

    #[error("User with email '{email}' already exists")]
    EmailAlreadyExists { email: String },

    #[error("Password too short: minimum length is {min} characters")]
    PasswordTooShort { min: usize },

    #[error("Unable to authenticate with provided credentials")]
    InvalidCredentials,

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn user_not_found(id: Uuid) -> Self {
        Self::UserNotFound { id }
    }

    pub fn tag_not_found(id: Uuid) -> Self {
        Self::TagNotFound { id }
    }

    pub fn ingredient_not_found(id: Uuid) -> Self {
        Self::IngredientNotFound { id }
    }

    pub fn recipe_not_found(id: Uuid) -> Self {
        Self::RecipeNotFound { id }
    }

    pub fn invalid_email(email: impl Into<String>) -> Self {
        Self::InvalidEmail {
            email: email.into(),
        }
    }

    pub fn email_already_exists(email: impl Into<String>) -> Self {
        Self::EmailAlreadyExists {
            email: email.into(),
        }
    }

    pub fn password_too_short(min: usize) -> Self {
        Self::PasswordTooShort { min }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for DomainError {
    fn from(e: anyhow::Error) -> Self {
        // `{:#}` keeps the context chain from the repository layer
        Self::database(format!("{e:#}"))
    }
}
