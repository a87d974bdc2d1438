use std::sync::Arc;

use axum::{
    http::{StatusCode, Uri},
    response::Json,
    Extension,
};
use modkit::api::problem::{Problem, ProblemResponse};
use tracing::{error, info};

use crate::api::rest::auth::CurrentUser;
use crate::api::rest::dto::{CreateUserReq, TokenDto, TokenReq, UpdateUserReq, UserDto};
use crate::api::rest::error::map_domain_error;
use crate::api::rest::extract::JsonBody;
use crate::domain::error::DomainError;
use crate::domain::service::Service;

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/user/create/",
    tag = "user",
    request_body = CreateUserReq,
    responses(
        (status = 201, description = "Created user", body = UserDto),
        (status = 400, description = "Bad Request", body = Problem),
        (status = 409, description = "Conflict", body = Problem),
    )
)]
pub async fn create_user(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    JsonBody(req_body): JsonBody<CreateUserReq>,
) -> Result<(StatusCode, Json<UserDto>), ProblemResponse> {
    info!(email = %req_body.email, "Registering user");

    match svc.create_user(req_body.into()).await {
        Ok(user) => Ok((StatusCode::CREATED, Json(UserDto::from(user)))),
        Err(e) => {
            error!("Failed to create user: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Exchange email and password for the account's API token
#[utoipa::path(
    post,
    path = "/api/user/token/",
    tag = "user",
    request_body = TokenReq,
    responses(
        (status = 200, description = "Token for the account", body = TokenDto),
        (status = 400, description = "Unable to authenticate with provided credentials", body = Problem),
    )
)]
pub async fn issue_token(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    JsonBody(req_body): JsonBody<TokenReq>,
) -> Result<Json<TokenDto>, ProblemResponse> {
    match svc.issue_token(&req_body.email, &req_body.password).await {
        Ok(token) => Ok(Json(TokenDto::from(token))),
        Err(e @ DomainError::InvalidCredentials) => {
            info!("Token request rejected");
            Err(map_domain_error(&e, uri.path()))
        }
        Err(e) => {
            error!("Failed to issue token: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// The caller's own account
#[utoipa::path(
    get,
    path = "/api/user/me/",
    tag = "user",
    security(("token" = [])),
    responses(
        (status = 200, description = "Authenticated user", body = UserDto),
        (status = 401, description = "Unauthorized", body = Problem),
    )
)]
pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<UserDto> {
    Json(UserDto::from(user))
}

/// Partially update the caller's own account
#[utoipa::path(
    patch,
    path = "/api/user/me/",
    tag = "user",
    security(("token" = [])),
    request_body = UpdateUserReq,
    responses(
        (status = 200, description = "Updated user", body = UserDto),
        (status = 400, description = "Bad Request", body = Problem),
        (status = 401, description = "Unauthorized", body = Problem),
        (status = 409, description = "Conflict", body = Problem),
    )
)]
pub async fn update_me(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
    JsonBody(req_body): JsonBody<UpdateUserReq>,
) -> Result<Json<UserDto>, ProblemResponse> {
    info!(user_id = %user.id, "Updating own account");

    match svc.update_user(user.id, req_body.into()).await {
        Ok(user) => Ok(Json(UserDto::from(user))),
        Err(e) => {
            error!("Failed to update user {}: {}", user.id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}
