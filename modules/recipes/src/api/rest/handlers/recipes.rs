use std::sync::Arc;

use axum::{
    extract::Query,
    http::{StatusCode, Uri},
    response::Json,
    Extension,
};
use modkit::api::problem::{Problem, ProblemResponse};
use tracing::{error, info};

use crate::api::rest::auth::CurrentUser;
use crate::api::rest::dto::{
    CreateRecipeReq, RecipeDetailDto, RecipeDto, RecipeListQuery, UpdateRecipeReq,
};
use crate::api::rest::error::{from_parts, map_domain_error};
use crate::api::rest::extract::{JsonBody, RecordId};
use crate::domain::service::Service;

/// List the caller's recipes, newest first
#[utoipa::path(
    get,
    path = "/api/recipe/recipes/",
    tag = "recipe",
    security(("token" = [])),
    params(RecipeListQuery),
    responses(
        (status = 200, description = "Recipes owned by the caller", body = [RecipeDto]),
        (status = 400, description = "Bad Request", body = Problem),
        (status = 401, description = "Unauthorized", body = Problem),
    )
)]
pub async fn list_recipes(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<RecipeListQuery>,
) -> Result<Json<Vec<RecipeDto>>, ProblemResponse> {
    let filter = query.to_filter().map_err(|msg| {
        from_parts(
            StatusCode::BAD_REQUEST,
            "RECIPES_INVALID_QUERY",
            "Invalid query parameter",
            msg,
            uri.path(),
        )
    })?;

    match svc.list_recipes(user.id, filter).await {
        Ok(recipes) => Ok(Json(recipes.into_iter().map(RecipeDto::from).collect())),
        Err(e) => {
            error!("Failed to list recipes: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Create a recipe; tags and ingredients are matched by name or created
#[utoipa::path(
    post,
    path = "/api/recipe/recipes/",
    tag = "recipe",
    security(("token" = [])),
    request_body = CreateRecipeReq,
    responses(
        (status = 201, description = "Created recipe", body = RecipeDetailDto),
        (status = 400, description = "Bad Request", body = Problem),
        (status = 401, description = "Unauthorized", body = Problem),
    )
)]
pub async fn create_recipe(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
    JsonBody(req_body): JsonBody<CreateRecipeReq>,
) -> Result<(StatusCode, Json<RecipeDetailDto>), ProblemResponse> {
    info!(user_id = %user.id, title = %req_body.title, "Creating recipe");

    match svc.create_recipe(user.id, req_body.into()).await {
        Ok(recipe) => Ok((StatusCode::CREATED, Json(RecipeDetailDto::from(recipe)))),
        Err(e) => {
            error!("Failed to create recipe: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Get one of the caller's recipes
#[utoipa::path(
    get,
    path = "/api/recipe/recipes/{id}/",
    tag = "recipe",
    security(("token" = [])),
    params(("id" = uuid::Uuid, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe found", body = RecipeDetailDto),
        (status = 401, description = "Unauthorized", body = Problem),
        (status = 404, description = "Not Found", body = Problem),
    )
)]
pub async fn get_recipe(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
    RecordId(id): RecordId,
) -> Result<Json<RecipeDetailDto>, ProblemResponse> {
    match svc.get_recipe(user.id, id).await {
        Ok(recipe) => Ok(Json(RecipeDetailDto::from(recipe))),
        Err(e) => {
            error!("Failed to get recipe {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Partially update one of the caller's recipes
#[utoipa::path(
    patch,
    path = "/api/recipe/recipes/{id}/",
    tag = "recipe",
    security(("token" = [])),
    params(("id" = uuid::Uuid, Path, description = "Recipe id")),
    request_body = UpdateRecipeReq,
    responses(
        (status = 200, description = "Updated recipe", body = RecipeDetailDto),
        (status = 400, description = "Bad Request", body = Problem),
        (status = 401, description = "Unauthorized", body = Problem),
        (status = 404, description = "Not Found", body = Problem),
    )
)]
pub async fn update_recipe(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
    RecordId(id): RecordId,
    JsonBody(req_body): JsonBody<UpdateRecipeReq>,
) -> Result<Json<RecipeDetailDto>, ProblemResponse> {
    info!("Updating recipe {} with: {:?}", id, req_body);

    match svc.update_recipe(user.id, id, req_body.into()).await {
        Ok(recipe) => Ok(Json(RecipeDetailDto::from(recipe))),
        Err(e) => {
            error!("Failed to update recipe {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Delete one of the caller's recipes
#[utoipa::path(
    delete,
    path = "/api/recipe/recipes/{id}/",
    tag = "recipe",
    security(("token" = [])),
    params(("id" = uuid::Uuid, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthorized", body = Problem),
        (status = 404, description = "Not Found", body = Problem),
    )
)]
pub async fn delete_recipe(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
    RecordId(id): RecordId,
) -> Result<StatusCode, ProblemResponse> {
    info!("Deleting recipe: {}", id);

    match svc.delete_recipe(user.id, id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!("Failed to delete recipe {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}
