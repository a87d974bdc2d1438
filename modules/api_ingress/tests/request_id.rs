//! Request id handling through the ingress middleware stack.

use api_ingress::{request_id::XRequestId, ApiIngress, ApiIngressConfig};
use axum::{
    body::Body,
    extract::Extension,
    http::{Request, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower::util::ServiceExt;

fn app() -> Router {
    let router = Router::new()
        .route("/whoami", get(echo_request_id))
        .route("/broken", get(failing_handler));
    ApiIngress::new(ApiIngressConfig::default(), "127.0.0.1:0").apply_middleware(router)
}

async fn echo_request_id(Extension(XRequestId(id)): Extension<XRequestId>) -> Json<Value> {
    Json(json!({ "request_id": id }))
}

async fn failing_handler() -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "detail": "storage unavailable" })),
    )
}

fn response_id(resp: &axum::response::Response) -> Option<String> {
    resp.headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

#[tokio::test]
async fn missing_id_is_generated_and_visible_to_handlers() {
    let resp = app()
        .oneshot(Request::builder().uri("/whoami").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let id = response_id(&resp).expect("x-request-id should be generated");
    assert_eq!(id.len(), 21, "nanoid default length");

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["request_id"], id);
}

#[tokio::test]
async fn generated_ids_differ_per_request() {
    let app = app();
    let first = app
        .clone()
        .oneshot(Request::builder().uri("/whoami").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let second = app
        .oneshot(Request::builder().uri("/whoami").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_ne!(response_id(&first), response_id(&second));
}

#[tokio::test]
async fn incoming_id_is_kept_on_success_and_error() {
    for (uri, status) in [
        ("/whoami", StatusCode::OK),
        ("/broken", StatusCode::INTERNAL_SERVER_ERROR),
    ] {
        let resp = app()
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .header("x-request-id", "recipes-abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), status);
        assert_eq!(response_id(&resp).as_deref(), Some("recipes-abc-123"));
    }
}

#[tokio::test]
async fn unmatched_routes_still_carry_an_id() {
    let resp = app()
        .oneshot(Request::builder().uri("/nowhere").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(response_id(&resp).is_some());
}
