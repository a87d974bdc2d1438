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
use crate::api::rest::dto::{AssignedOnlyQuery, CreateIngredientReq, IngredientDto, UpdateIngredientReq};
use crate::api::rest::error::{from_parts, map_domain_error};
use crate::api::rest::extract::{JsonBody, RecordId};
use crate::domain::service::Service;

/// List the caller's ingredients, ordered by name descending
#[utoipa::path(
    get,
    path = "/api/recipe/ingredients/",
    tag = "recipe",
    security(("token" = [])),
    params(AssignedOnlyQuery),
    responses(
        (status = 200, description = "Ingredients owned by the caller", body = [IngredientDto]),
        (status = 400, description = "Bad Request", body = Problem),
        (status = 401, description = "Unauthorized", body = Problem),
    )
)]
pub async fn list_ingredients(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<AssignedOnlyQuery>,
) -> Result<Json<Vec<IngredientDto>>, ProblemResponse> {
    let filter = query.to_filter().map_err(|msg| {
        from_parts(
            StatusCode::BAD_REQUEST,
            "RECIPES_INVALID_QUERY",
            "Invalid query parameter",
            msg,
            uri.path(),
        )
    })?;

    match svc.list_ingredients(user.id, filter).await {
        Ok(items) => Ok(Json(items.into_iter().map(IngredientDto::from).collect())),
        Err(e) => {
            error!("Failed to list ingredients: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Create an ingredient owned by the caller
#[utoipa::path(
    post,
    path = "/api/recipe/ingredients/",
    tag = "recipe",
    security(("token" = [])),
    request_body = CreateIngredientReq,
    responses(
        (status = 201, description = "Created ingredient", body = IngredientDto),
        (status = 400, description = "Bad Request", body = Problem),
        (status = 401, description = "Unauthorized", body = Problem),
    )
)]
pub async fn create_ingredient(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
    JsonBody(req_body): JsonBody<CreateIngredientReq>,
) -> Result<(StatusCode, Json<IngredientDto>), ProblemResponse> {
    info!(user_id = %user.id, "Creating ingredient: {:?}", req_body);

    match svc.create_ingredient(user.id, req_body.into()).await {
        Ok(item) => Ok((StatusCode::CREATED, Json(IngredientDto::from(item)))),
        Err(e) => {
            error!("Failed to create ingredient: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Get one of the caller's ingredients
#[utoipa::path(
    get,
    path = "/api/recipe/ingredients/{id}/",
    tag = "recipe",
    security(("token" = [])),
    params(("id" = uuid::Uuid, Path, description = "Ingredient id")),
    responses(
        (status = 200, description = "Ingredient found", body = IngredientDto),
        (status = 401, description = "Unauthorized", body = Problem),
        (status = 404, description = "Not Found", body = Problem),
    )
)]
pub async fn get_ingredient(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
    RecordId(id): RecordId,
) -> Result<Json<IngredientDto>, ProblemResponse> {
    match svc.get_ingredient(user.id, id).await {
        Ok(item) => Ok(Json(IngredientDto::from(item))),
        Err(e) => {
            error!("Failed to get ingredient {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Partially update one of the caller's ingredients
#[utoipa::path(
    patch,
    path = "/api/recipe/ingredients/{id}/",
    tag = "recipe",
    security(("token" = [])),
    params(("id" = uuid::Uuid, Path, description = "Ingredient id")),
    request_body = UpdateIngredientReq,
    responses(
        (status = 200, description = "Updated ingredient", body = IngredientDto),
        (status = 400, description = "Bad Request", body = Problem),
        (status = 401, description = "Unauthorized", body = Problem),
        (status = 404, description = "Not Found", body = Problem),
    )
)]
pub async fn update_ingredient(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
    RecordId(id): RecordId,
    JsonBody(req_body): JsonBody<UpdateIngredientReq>,
) -> Result<Json<IngredientDto>, ProblemResponse> {
    info!("Updating ingredient {} with: {:?}", id, req_body);

    match svc.update_ingredient(user.id, id, req_body.into()).await {
        Ok(item) => Ok(Json(IngredientDto::from(item))),
        Err(e) => {
            error!("Failed to update ingredient {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Delete one of the caller's ingredients; it is detached from every recipe
#[utoipa::path(
    delete,
    path = "/api/recipe/ingredients/{id}/",
    tag = "recipe",
    security(("token" = [])),
    params(("id" = uuid::Uuid, Path, description = "Ingredient id")),
    responses(
        (status = 204, description = "Ingredient deleted"),
        (status = 401, description = "Unauthorized", body = Problem),
        (status = 404, description = "Not Found", body = Problem),
    )
)]
pub async fn delete_ingredient(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
    RecordId(id): RecordId,
) -> Result<StatusCode, ProblemResponse> {
    info!("Deleting ingredient: {}", id);

    match svc.delete_ingredient(user.id, id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!("Failed to delete ingredient {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}
