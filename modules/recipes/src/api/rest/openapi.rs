use modkit::api::problem::{Problem, ValidationError};
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};

use crate::api::rest::dto::{
    CreateIngredientReq, CreateRecipeReq, CreateTagReq, CreateUserReq, IngredientDto,
    RecipeDetailDto, RecipeDto, TagDto, TokenDto, TokenReq, UpdateIngredientReq,
    UpdateRecipeReq, UpdateTagReq, UpdateUserReq, UserDto,
};
use crate::api::rest::handlers::{ingredients, recipes, tags, users};

/// OpenAPI fragment for the recipes module, merged into the host document.
#[derive(OpenApi)]
#[openapi(
    paths(
        users::create_user,
        users::issue_token,
        users::get_me,
        users::update_me,
        tags::list_tags,
        tags::create_tag,
        tags::get_tag,
        tags::update_tag,
        tags::delete_tag,
        ingredients::list_ingredients,
        ingredients::create_ingredient,
        ingredients::get_ingredient,
        ingredients::update_ingredient,
        ingredients::delete_ingredient,
        recipes::list_recipes,
        recipes::create_recipe,
        recipes::get_recipe,
        recipes::update_recipe,
        recipes::delete_recipe,
    ),
    components(schemas(
        Problem,
        ValidationError,
        UserDto,
        CreateUserReq,
        UpdateUserReq,
        TokenReq,
        TokenDto,
        TagDto,
        CreateTagReq,
        UpdateTagReq,
        IngredientDto,
        CreateIngredientReq,
        UpdateIngredientReq,
        RecipeDto,
        RecipeDetailDto,
        CreateRecipeReq,
        UpdateRecipeReq,
    )),
    modifiers(&TokenSecurity),
    tags(
        (name = "user", description = "Accounts and API tokens"),
        (name = "recipe", description = "Recipes, tags and ingredients owned by the caller"),
    )
)]
pub struct RecipesApiDoc;

/// `Authorization: Token <key>` header scheme referenced by protected operations.
struct TokenSecurity;

impl Modify for TokenSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "token",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "Authorization",
                "Token <key>",
            ))),
        );
    }
}
