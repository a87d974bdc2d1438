pub mod client;
pub mod error;
pub mod model;

pub use client::RecipesApi;
pub use error::RecipesError;
pub use model::{
    AuthToken, Ingredient, IngredientPatch, NewIngredient, NewRecipe, NewTag, NewUser, Recipe,
    RecipeFilter, RecipePatch, RelationFilter, Tag, TagPatch, User, UserPatch,
};
