//! Token authentication gate for the resource routes.
//!
//! Accepts `Authorization: Token <key>` and `Authorization: Bearer <key>`.
//! Installed with `route_layer`, so it runs only for matched routes and
//! before any handler or storage access for the resource.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use modkit::api::problem::ProblemResponse;
use tracing::{debug, warn};

use crate::api::rest::error::{from_parts, map_domain_error};
use crate::contract::model::User;
use crate::domain::service::Service;

const AUTH_SCHEMES: [&str; 2] = ["Token", "Bearer"];

/// The authenticated caller, placed in request extensions by [`require_auth`].
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

fn unauthorized(detail: &str, headers: &HeaderMap, instance: &str) -> ProblemResponse {
    let mut resp = from_parts(
        StatusCode::UNAUTHORIZED,
        "RECIPES_UNAUTHORIZED",
        "Unauthorized",
        detail,
        instance,
    );
    if let Some(rid) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
        resp.0 = resp.0.with_request_id(rid);
    }
    resp
}

/// Extract the key from an `Authorization` header value.
fn parse_credentials(value: &str) -> Option<&str> {
    let (scheme, key) = value.trim().split_once(' ')?;
    if !AUTH_SCHEMES.iter().any(|s| s.eq_ignore_ascii_case(scheme)) {
        return None;
    }
    let key = key.trim();
    (!key.is_empty() && !key.contains(' ')).then_some(key)
}

pub async fn require_auth(
    State(svc): State<Arc<Service>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ProblemResponse> {
    let instance = req.uri().path().to_owned();

    let Some(header) = req.headers().get(AUTHORIZATION) else {
        debug!("Missing Authorization header");
        return Err(unauthorized(
            "Authentication credentials were not provided.",
            req.headers(),
            &instance,
        ));
    };
    let Some(key) = header.to_str().ok().and_then(parse_credentials) else {
        return Err(unauthorized(
            "Invalid token header.",
            req.headers(),
            &instance,
        ));
    };

    match svc.authenticate(key).await {
        Ok(Some(user)) => {
            debug!(user_id = %user.id, "Authenticated request");
            req.extensions_mut().insert(CurrentUser(user));
            Ok(next.run(req).await)
        }
        Ok(None) => {
            warn!("Rejected unknown or inactive token");
            Err(unauthorized("Invalid token.", req.headers(), &instance))
        }
        Err(e) => Err(map_domain_error(&e, &instance)),
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ProblemResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<CurrentUser>().cloned().ok_or_else(|| {
            unauthorized(
                "Authentication credentials were not provided.",
                &parts.headers,
                parts.uri.path(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_parsing() {
        assert_eq!(parse_credentials("Token abc123"), Some("abc123"));
        assert_eq!(parse_credentials("Bearer abc123"), Some("abc123"));
        assert_eq!(parse_credentials("token   abc123 "), Some("abc123"));
        assert_eq!(parse_credentials("Basic abc123"), None);
        assert_eq!(parse_credentials("Token"), None);
        assert_eq!(parse_credentials("Token a b"), None);
    }
}
