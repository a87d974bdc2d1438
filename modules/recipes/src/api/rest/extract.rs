//! Extractors that reject with Problem responses instead of axum's plain-text ones.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Path, Request},
    http::{request::Parts, StatusCode},
    Json,
};
use modkit::api::problem::ProblemResponse;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::api::rest::error::from_parts;

/// `Json<T>` whose rejection is a 400 Problem.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ProblemResponse;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let instance = req.uri().path().to_owned();
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_problem(&rejection, &instance)),
        }
    }
}

fn json_problem(rejection: &JsonRejection, instance: &str) -> ProblemResponse {
    from_parts(
        StatusCode::BAD_REQUEST,
        "RECIPES_INVALID_BODY",
        "Invalid request body",
        rejection.body_text(),
        instance,
    )
}

/// `{id}` path segment. Anything that is not a UUID cannot name a record, so it is a 404.
pub struct RecordId(pub Uuid);

impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = ProblemResponse;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let not_found = |instance: &str| {
            from_parts(
                StatusCode::NOT_FOUND,
                "RECIPES_NOT_FOUND",
                "Not found",
                "No record matches the given id",
                instance,
            )
        };
        let instance = parts.uri.path().to_owned();
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| not_found(&instance))?;
        Uuid::parse_str(&raw)
            .map(Self)
            .map_err(|_| not_found(&instance))
    }
}
