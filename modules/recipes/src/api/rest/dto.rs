use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::contract::model::{
    AuthToken, Ingredient, IngredientPatch, NewIngredient, NewRecipe, NewTag, NewUser, Recipe,
    RecipeFilter, RecipePatch, RelationFilter, Tag, TagPatch, User, UserPatch,
};

// --- users ---

/// REST DTO for user representation; the password hash never leaves the service
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

/// REST DTO for creating a new user
#[derive(Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateUserReq {
    #[serde(default)]
    pub email: String,
    #[schema(write_only, format = Password)]
    pub password: String,
    #[serde(default)]
    pub name: String,
}

/// REST DTO for updating the caller's account (partial)
#[derive(Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct UpdateUserReq {
    pub email: Option<String>,
    pub name: Option<String>,
    #[schema(write_only, format = Password)]
    pub password: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenReq {
    pub email: String,
    #[schema(format = Password)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenDto {
    pub token: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
        }
    }
}

impl From<CreateUserReq> for NewUser {
    fn from(req: CreateUserReq) -> Self {
        Self {
            email: req.email,
            password: req.password,
            name: req.name,
        }
    }
}

impl From<UpdateUserReq> for UserPatch {
    fn from(req: UpdateUserReq) -> Self {
        Self {
            email: req.email,
            name: req.name,
            password: req.password,
        }
    }
}

impl From<AuthToken> for TokenDto {
    fn from(token: AuthToken) -> Self {
        Self { token: token.key }
    }
}

// --- tags and ingredients ---

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TagDto {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateTagReq {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct UpdateTagReq {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IngredientDto {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateIngredientReq {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct UpdateIngredientReq {
    pub name: Option<String>,
}

impl From<Tag> for TagDto {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
        }
    }
}

impl From<CreateTagReq> for NewTag {
    fn from(req: CreateTagReq) -> Self {
        Self { name: req.name }
    }
}

impl From<UpdateTagReq> for TagPatch {
    fn from(req: UpdateTagReq) -> Self {
        Self { name: req.name }
    }
}

impl From<Ingredient> for IngredientDto {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name,
        }
    }
}

impl From<CreateIngredientReq> for NewIngredient {
    fn from(req: CreateIngredientReq) -> Self {
        Self { name: req.name }
    }
}

impl From<UpdateIngredientReq> for IngredientPatch {
    fn from(req: UpdateIngredientReq) -> Self {
        Self { name: req.name }
    }
}

/// Query for tag and ingredient lists.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AssignedOnlyQuery {
    /// `1`/`true` keeps only records used by at least one recipe.
    #[param(example = "1")]
    pub assigned_only: Option<String>,
}

impl AssignedOnlyQuery {
    pub fn to_filter(&self) -> Result<RelationFilter, String> {
        let assigned_only = match self.assigned_only.as_deref().map(str::trim) {
            None | Some("") | Some("0") => false,
            Some("1") => true,
            Some(v) if v.eq_ignore_ascii_case("false") => false,
            Some(v) if v.eq_ignore_ascii_case("true") => true,
            Some(v) => return Err(format!("assigned_only must be 0 or 1, got '{v}'")),
        };
        Ok(RelationFilter { assigned_only })
    }
}

// --- recipes ---

/// Recipe as shown in lists
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecipeDto {
    pub id: Uuid,
    pub title: String,
    pub time_minutes: i32,
    #[schema(value_type = String, example = "5.50")]
    pub price: Decimal,
    pub link: String,
    pub tags: Vec<TagDto>,
    pub ingredients: Vec<IngredientDto>,
}

/// Recipe detail: the list shape plus `description`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecipeDetailDto {
    pub id: Uuid,
    pub title: String,
    pub time_minutes: i32,
    #[schema(value_type = String, example = "5.50")]
    pub price: Decimal,
    pub link: String,
    pub tags: Vec<TagDto>,
    pub ingredients: Vec<IngredientDto>,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateRecipeReq {
    pub title: String,
    pub time_minutes: i32,
    /// Decimal string or number, at most two decimal places.
    #[schema(value_type = String, example = "5.50")]
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub tags: Vec<CreateTagReq>,
    #[serde(default)]
    pub ingredients: Vec<CreateIngredientReq>,
}

/// Partial recipe update; a supplied `tags`/`ingredients` list replaces the set.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct UpdateRecipeReq {
    pub title: Option<String>,
    pub time_minutes: Option<i32>,
    #[schema(value_type = Option<String>, example = "5.50")]
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub tags: Option<Vec<CreateTagReq>>,
    pub ingredients: Option<Vec<CreateIngredientReq>>,
}

/// Comma-separated id lists; a recipe matches when it has any of the ids.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecipeListQuery {
    pub tags: Option<String>,
    pub ingredients: Option<String>,
}

fn parse_id_list(field: &str, raw: Option<&str>) -> Result<Vec<Uuid>, String> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| Uuid::parse_str(s).map_err(|_| format!("{field}: '{s}' is not a valid id")))
        .collect()
}

impl RecipeListQuery {
    pub fn to_filter(&self) -> Result<RecipeFilter, String> {
        Ok(RecipeFilter {
            tags: parse_id_list("tags", self.tags.as_deref())?,
            ingredients: parse_id_list("ingredients", self.ingredients.as_deref())?,
        })
    }
}

impl From<Recipe> for RecipeDto {
    fn from(r: Recipe) -> Self {
        Self {
            id: r.id,
            title: r.title,
            time_minutes: r.time_minutes,
            price: r.price,
            link: r.link,
            tags: r.tags.into_iter().map(TagDto::from).collect(),
            ingredients: r.ingredients.into_iter().map(IngredientDto::from).collect(),
        }
    }
}

impl From<Recipe> for RecipeDetailDto {
    fn from(r: Recipe) -> Self {
        Self {
            id: r.id,
            title: r.title,
            time_minutes: r.time_minutes,
            price: r.price,
            link: r.link,
            tags: r.tags.into_iter().map(TagDto::from).collect(),
            ingredients: r.ingredients.into_iter().map(IngredientDto::from).collect(),
            description: r.description,
        }
    }
}

impl From<CreateRecipeReq> for NewRecipe {
    fn from(req: CreateRecipeReq) -> Self {
        Self {
            title: req.title,
            time_minutes: req.time_minutes,
            price: req.price,
            description: req.description,
            link: req.link,
            tags: req.tags.into_iter().map(|t| t.name).collect(),
            ingredients: req.ingredients.into_iter().map(|i| i.name).collect(),
        }
    }
}

impl From<UpdateRecipeReq> for RecipePatch {
    fn from(req: UpdateRecipeReq) -> Self {
        Self {
            title: req.title,
            time_minutes: req.time_minutes,
            price: req.price,
            description: req.description,
            link: req.link,
            tags: req.tags.map(|v| v.into_iter().map(|t| t.name).collect()),
            ingredients: req
                .ingredients
                .map(|v| v.into_iter().map(|i| i.name).collect()),
        }
    }
}
