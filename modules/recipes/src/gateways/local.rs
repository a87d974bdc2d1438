use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::contract::{
    client::RecipesApi,
    error::RecipesError,
    model::{AuthToken, Ingredient, NewUser, Recipe, RecipeFilter, RelationFilter, Tag, User},
};
use crate::domain::service::Service;

/// Local implementation of the RecipesApi trait that delegates to the domain service
pub struct RecipesLocalClient {
    service: Arc<Service>,
}

impl RecipesLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl RecipesApi for RecipesLocalClient {
    async fn create_user(&self, new_user: NewUser) -> Result<User, RecipesError> {
        self.service.create_user(new_user).await.map_err(Into::into)
    }

    async fn create_superuser(&self, new_user: NewUser) -> Result<User, RecipesError> {
        self.service
            .create_superuser(new_user)
            .await
            .map_err(Into::into)
    }

    async fn issue_token(&self, email: &str, password: &str) -> Result<AuthToken, RecipesError> {
        self.service
            .issue_token(email, password)
            .await
            .map_err(Into::into)
    }

    async fn authenticate(&self, key: &str) -> Result<Option<User>, RecipesError> {
        self.service.authenticate(key).await.map_err(Into::into)
    }

    async fn list_tags(
        &self,
        owner: Uuid,
        filter: RelationFilter,
    ) -> Result<Vec<Tag>, RecipesError> {
        self.service
            .list_tags(owner, filter)
            .await
            .map_err(Into::into)
    }

    async fn list_ingredients(
        &self,
        owner: Uuid,
        filter: RelationFilter,
    ) -> Result<Vec<Ingredient>, RecipesError> {
        self.service
            .list_ingredients(owner, filter)
            .await
            .map_err(Into::into)
    }

    async fn list_recipes(
        &self,
        owner: Uuid,
        filter: RecipeFilter,
    ) -> Result<Vec<Recipe>, RecipesError> {
        self.service
            .list_recipes(owner, filter)
            .await
            .map_err(Into::into)
    }

    async fn get_recipe(&self, owner: Uuid, id: Uuid) -> Result<Recipe, RecipesError> {
        self.service
            .get_recipe(owner, id)
            .await
            .map_err(Into::into)
    }
}
