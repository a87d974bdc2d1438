use crate::contract::model::{AuthToken, Ingredient, Recipe, RecipeFilter, Tag, User};
use async_trait::async_trait;
use uuid::Uuid;

/// Port for the domain layer: persistence of accounts and their tokens.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn email_exists(&self, email: &str) -> anyhow::Result<bool>;
    /// Service computes id/timestamps/hash; repo persists.
    /// `Ok(false)` when the unique email index rejects the row.
    async fn insert(&self, u: User) -> anyhow::Result<bool>;
    /// Same email contract as [`UsersRepository::insert`].
    async fn update(&self, u: User) -> anyhow::Result<bool>;
    async fn find_token_for_user(&self, user_id: Uuid) -> anyhow::Result<Option<AuthToken>>;
    async fn insert_token(&self, token: AuthToken) -> anyhow::Result<()>;
    async fn find_user_by_token(&self, key: &str) -> anyhow::Result<Option<User>>;
}

/// Every read and write is scoped to `owner`.
#[async_trait]
pub trait TagsRepository: Send + Sync {
    /// Ordered by name, descending. `assigned_only` keeps tags used by at least
    /// one of the owner's recipes, each tag once.
    async fn list_tags(&self, owner: Uuid, assigned_only: bool) -> anyhow::Result<Vec<Tag>>;
    async fn find_tag(&self, owner: Uuid, id: Uuid) -> anyhow::Result<Option<Tag>>;
    async fn find_tag_by_name(&self, owner: Uuid, name: &str) -> anyhow::Result<Option<Tag>>;
    async fn insert_tag(&self, tag: Tag) -> anyhow::Result<()>;
    async fn update_tag(&self, tag: Tag) -> anyhow::Result<()>;
    /// Also detaches the tag from recipes. Returns true if a row was deleted.
    async fn delete_tag(&self, owner: Uuid, id: Uuid) -> anyhow::Result<bool>;
}

/// Same contract as [`TagsRepository`], for ingredients.
#[async_trait]
pub trait IngredientsRepository: Send + Sync {
    async fn list_ingredients(
        &self,
        owner: Uuid,
        assigned_only: bool,
    ) -> anyhow::Result<Vec<Ingredient>>;
    async fn find_ingredient(&self, owner: Uuid, id: Uuid) -> anyhow::Result<Option<Ingredient>>;
    async fn find_ingredient_by_name(
        &self,
        owner: Uuid,
        name: &str,
    ) -> anyhow::Result<Option<Ingredient>>;
    async fn insert_ingredient(&self, ingredient: Ingredient) -> anyhow::Result<()>;
    async fn update_ingredient(&self, ingredient: Ingredient) -> anyhow::Result<()>;
    async fn delete_ingredient(&self, owner: Uuid, id: Uuid) -> anyhow::Result<bool>;
}

#[async_trait]
pub trait RecipesRepository: Send + Sync {
    /// Newest first, relations loaded.
    async fn list_recipes(&self, owner: Uuid, filter: &RecipeFilter) -> anyhow::Result<Vec<Recipe>>;
    async fn find_recipe(&self, owner: Uuid, id: Uuid) -> anyhow::Result<Option<Recipe>>;
    /// Persists the row, its not yet stored tags/ingredients and the links,
    /// in one transaction.
    async fn insert_recipe(&self, recipe: Recipe) -> anyhow::Result<()>;
    /// Updates the row and replaces its tag/ingredient links, storing new
    /// tags/ingredients in the same transaction.
    async fn update_recipe(&self, recipe: Recipe) -> anyhow::Result<()>;
    async fn delete_recipe(&self, owner: Uuid, id: Uuid) -> anyhow::Result<bool>;
}
