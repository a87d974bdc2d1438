use async_trait::async_trait;
use std::sync::Arc;

use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use axum::{http::StatusCode, middleware::from_fn, routing::get, Router};
use modkit::contracts::RestHostModule;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};
use utoipa::openapi::OpenApi;

mod config;
pub mod request_id;
mod web;

pub use config::ApiIngressConfig;

/// Title stamped onto the merged OpenAPI document.
pub const API_TITLE: &str = "Recipe API";

/// API ingress: owns the HTTP listener, host-level routes and global middleware.
pub struct ApiIngress {
    config: ArcSwap<ApiIngressConfig>,
    bind_addr: String,
}

impl ApiIngress {
    pub fn new(config: ApiIngressConfig, bind_addr: impl Into<String>) -> Self {
        Self {
            config: ArcSwap::from_pointee(config),
            bind_addr: bind_addr.into(),
        }
    }

    /// Get the current configuration (cheap clone from ArcSwap)
    pub fn get_config(&self) -> ApiIngressConfig {
        (**self.config.load()).clone()
    }

    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }

    /// Wrap `router` with the global middleware stack.
    ///
    /// Order (outermost to innermost):
    /// SetRequestId -> PropagateRequestId -> Trace -> push_req_id_to_extensions -> Timeout -> CORS -> BodyLimit
    pub fn apply_middleware(&self, mut router: Router) -> Router {
        let config = self.get_config();
        let x_request_id = request_id::header();

        router = router.layer(RequestBodyLimitLayer::new(config.body_limit_bytes));

        if config.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }

        if config.request_timeout_secs > 0 {
            router = router.layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(config.request_timeout_secs),
            ));
        }

        router = router.layer(from_fn(request_id::push_req_id_to_extensions));
        router = router.layer(request_id::create_trace_layer());
        router = router.layer(PropagateRequestIdLayer::new(x_request_id.clone()));
        router.layer(SetRequestIdLayer::new(x_request_id, request_id::MakeReqId))
    }
}

/// Serve `router` on an already bound listener until `cancel` fires.
pub async fn serve_on(
    listener: TcpListener,
    router: Router,
    cancel: CancellationToken,
) -> Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("HTTP server bound on {}", addr);
    }

    let shutdown = async move {
        cancel.cancelled().await;
        tracing::info!("HTTP server shutting down gracefully (cancellation)");
    };

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| anyhow::anyhow!(e))
}

#[async_trait]
impl RestHostModule for ApiIngress {
    fn rest_prepare(&self, router: Router) -> Result<Router> {
        tracing::debug!("REST host prepared base router with health check");
        Ok(router.route("/health", get(web::health_check)))
    }

    fn rest_finalize(&self, mut router: Router, mut openapi: OpenApi) -> Result<Router> {
        let config = self.get_config();

        if config.enable_docs {
            openapi.info.title = API_TITLE.to_string();
            openapi.info.version = env!("CARGO_PKG_VERSION").to_string();
            let path_count = openapi.paths.paths.len();
            tracing::info!(paths = path_count, "rest_finalize: emitting OpenAPI document");

            // Build once, serve as static JSON (no per-request serialization)
            let doc = Arc::new(
                serde_json::to_value(&openapi).context("failed to serialize OpenAPI document")?,
            );
            router = router
                .route(
                    "/openapi.json",
                    get(move || web::openapi_json(doc.clone())),
                )
                .route("/docs", get(web::serve_docs));
        }

        Ok(self.apply_middleware(router))
    }

    async fn serve(&self, router: Router, cancel: CancellationToken) -> Result<()> {
        let listener = TcpListener::bind(&self.bind_addr)
            .await
            .with_context(|| format!("failed to bind {}", self.bind_addr))?;
        serve_on(listener, router, cancel).await
    }
}
