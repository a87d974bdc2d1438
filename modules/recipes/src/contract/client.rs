use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::{
    error::RecipesError,
    model::{AuthToken, Ingredient, NewUser, Recipe, RecipeFilter, RelationFilter, Tag, User},
};

/// Public API trait for the recipes module that other modules can use
#[async_trait]
pub trait RecipesApi: Send + Sync {
    async fn create_user(&self, new_user: NewUser) -> Result<User, RecipesError>;

    async fn create_superuser(&self, new_user: NewUser) -> Result<User, RecipesError>;

    /// Exchange credentials for the user's API token.
    async fn issue_token(&self, email: &str, password: &str) -> Result<AuthToken, RecipesError>;

    /// Resolve a token key to an active user.
    async fn authenticate(&self, key: &str) -> Result<Option<User>, RecipesError>;

    async fn list_tags(&self, owner: Uuid, filter: RelationFilter)
        -> Result<Vec<Tag>, RecipesError>;

    async fn list_ingredients(
        &self,
        owner: Uuid,
        filter: RelationFilter,
    ) -> Result<Vec<Ingredient>, RecipesError>;

    async fn list_recipes(
        &self,
        owner: Uuid,
        filter: RecipeFilter,
    ) -> Result<Vec<Recipe>, RecipesError>;

    async fn get_recipe(&self, owner: Uuid, id: Uuid) -> Result<Recipe, RecipesError>;
}
