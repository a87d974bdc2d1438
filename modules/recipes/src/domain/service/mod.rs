//! Domain service with the business rules for accounts, tags, ingredients and
//! recipes. Depends only on the repository ports, not on infra types.
//!
//! Every record operation takes the caller's id as `owner`; records of other
//! users are reported as not found.

use std::sync::Arc;

use crate::domain::error::DomainError;
use crate::domain::password::Passwords;
use crate::domain::repo::{
    IngredientsRepository, RecipesRepository, TagsRepository, UsersRepository,
};

mod ingredients;
mod recipes;
mod tags;
mod users;

pub use users::normalize_email;

#[derive(Clone)]
pub struct Service {
    users: Arc<dyn UsersRepository>,
    tags: Arc<dyn TagsRepository>,
    ingredients: Arc<dyn IngredientsRepository>,
    recipes: Arc<dyn RecipesRepository>,
    passwords: Passwords,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub min_password_length: usize,
    pub max_name_length: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            min_password_length: 5,
            max_name_length: 255,
        }
    }
}

/// Repository ports the service needs; usually one storage object behind all four.
pub struct Repositories {
    pub users: Arc<dyn UsersRepository>,
    pub tags: Arc<dyn TagsRepository>,
    pub ingredients: Arc<dyn IngredientsRepository>,
    pub recipes: Arc<dyn RecipesRepository>,
}

impl Repositories {
    pub fn from_single<R>(repo: Arc<R>) -> Self
    where
        R: UsersRepository + TagsRepository + IngredientsRepository + RecipesRepository + 'static,
    {
        Self {
            users: repo.clone(),
            tags: repo.clone(),
            ingredients: repo.clone(),
            recipes: repo,
        }
    }
}

impl Service {
    pub fn new(repos: Repositories, passwords: Passwords, config: ServiceConfig) -> Self {
        Self {
            users: repos.users,
            tags: repos.tags,
            ingredients: repos.ingredients,
            recipes: repos.recipes,
            passwords,
            config,
        }
    }

    // --- shared validation helpers ---

    /// Trim and check a tag/ingredient name or recipe title.
    fn clean_name(&self, field: &str, raw: &str) -> Result<String, DomainError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(DomainError::validation(field, "This field may not be blank."));
        }
        let len = name.chars().count();
        if len > self.config.max_name_length {
            return Err(DomainError::validation(
                field,
                format!(
                    "Ensure this field has no more than {} characters (got {len}).",
                    self.config.max_name_length
                ),
            ));
        }
        Ok(name.to_string())
    }
}
