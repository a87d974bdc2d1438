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
use crate::api::rest::dto::{AssignedOnlyQuery, CreateTagReq, TagDto, UpdateTagReq};
use crate::api::rest::error::{from_parts, map_domain_error};
use crate::api::rest::extract::{JsonBody, RecordId};
use crate::domain::service::Service;

/// List the caller's tags, ordered by name descending
#[utoipa::path(
    get,
    path = "/api/recipe/tags/",
    tag = "recipe",
    security(("token" = [])),
    params(AssignedOnlyQuery),
    responses(
        (status = 200, description = "Tags owned by the caller", body = [TagDto]),
        (status = 400, description = "Bad Request", body = Problem),
        (status = 401, description = "Unauthorized", body = Problem),
    )
)]
pub async fn list_tags(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<AssignedOnlyQuery>,
) -> Result<Json<Vec<TagDto>>, ProblemResponse> {
    let filter = query.to_filter().map_err(|msg| {
        from_parts(
            StatusCode::BAD_REQUEST,
            "RECIPES_INVALID_QUERY",
            "Invalid query parameter",
            msg,
            uri.path(),
        )
    })?;

    match svc.list_tags(user.id, filter).await {
        Ok(items) => Ok(Json(items.into_iter().map(TagDto::from).collect())),
        Err(e) => {
            error!("Failed to list tags: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Create a tag owned by the caller
#[utoipa::path(
    post,
    path = "/api/recipe/tags/",
    tag = "recipe",
    security(("token" = [])),
    request_body = CreateTagReq,
    responses(
        (status = 201, description = "Created tag", body = TagDto),
        (status = 400, description = "Bad Request", body = Problem),
        (status = 401, description = "Unauthorized", body = Problem),
    )
)]
pub async fn create_tag(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
    JsonBody(req_body): JsonBody<CreateTagReq>,
) -> Result<(StatusCode, Json<TagDto>), ProblemResponse> {
    info!(user_id = %user.id, "Creating tag: {:?}", req_body);

    match svc.create_tag(user.id, req_body.into()).await {
        Ok(item) => Ok((StatusCode::CREATED, Json(TagDto::from(item)))),
        Err(e) => {
            error!("Failed to create tag: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Get one of the caller's tags
#[utoipa::path(
    get,
    path = "/api/recipe/tags/{id}/",
    tag = "recipe",
    security(("token" = [])),
    params(("id" = uuid::Uuid, Path, description = "Tag id")),
    responses(
        (status = 200, description = "Tag found", body = TagDto),
        (status = 401, description = "Unauthorized", body = Problem),
        (status = 404, description = "Not Found", body = Problem),
    )
)]
pub async fn get_tag(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
    RecordId(id): RecordId,
) -> Result<Json<TagDto>, ProblemResponse> {
    match svc.get_tag(user.id, id).await {
        Ok(item) => Ok(Json(TagDto::from(item))),
        Err(e) => {
            error!("Failed to get tag {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Partially update one of the caller's tags
#[utoipa::path(
    patch,
    path = "/api/recipe/tags/{id}/",
    tag = "recipe",
    security(("token" = [])),
    params(("id" = uuid::Uuid, Path, description = "Tag id")),
    request_body = UpdateTagReq,
    responses(
        (status = 200, description = "Updated tag", body = TagDto),
        (status = 400, description = "Bad Request", body = Problem),
        (status = 401, description = "Unauthorized", body = Problem),
        (status = 404, description = "Not Found", body = Problem),
    )
)]
pub async fn update_tag(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
    RecordId(id): RecordId,
    JsonBody(req_body): JsonBody<UpdateTagReq>,
) -> Result<Json<TagDto>, ProblemResponse> {
    info!("Updating tag {} with: {:?}", id, req_body);

    match svc.update_tag(user.id, id, req_body.into()).await {
        Ok(item) => Ok(Json(TagDto::from(item))),
        Err(e) => {
            error!("Failed to update tag {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Delete one of the caller's tags; it is detached from every recipe
#[utoipa::path(
    delete,
    path = "/api/recipe/tags/{id}/",
    tag = "recipe",
    security(("token" = [])),
    params(("id" = uuid::Uuid, Path, description = "Tag id")),
    responses(
        (status = 204, description = "Tag deleted"),
        (status = 401, description = "Unauthorized", body = Problem),
        (status = 404, description = "Not Found", body = Problem),
    )
)]
pub async fn delete_tag(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
    RecordId(id): RecordId,
) -> Result<StatusCode, ProblemResponse> {
    info!("Deleting tag: {}", id);

    match svc.delete_tag(user.id, id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!("Failed to delete tag {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}
