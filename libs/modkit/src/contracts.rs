use async_trait::async_trait;
use axum::Router;
use sea_orm::DatabaseConnection;
use tokio_util::sync::CancellationToken;
use utoipa::openapi::OpenApi;

#[async_trait]
pub trait DbModule: Send + Sync {
    /// Runs BEFORE any router is built.
    async fn migrate(&self, db: &DatabaseConnection) -> anyhow::Result<()>;
}

/// Pure wiring; must be sync. Runs AFTER DB migrations.
pub trait RestfulModule: Send + Sync {
    /// Attach the module's routes and merge its paths/schemas into `openapi`.
    fn register_rest(&self, router: Router, openapi: &mut OpenApi) -> anyhow::Result<Router>;
}

/// REST host: owns the outer router and the listener.
#[async_trait]
pub trait RestHostModule: Send + Sync {
    /// Base router before modules register (e.g. /health).
    fn rest_prepare(&self, router: Router) -> anyhow::Result<Router>;

    /// Attach /openapi.json, /docs and global middleware once every module is in.
    fn rest_finalize(&self, router: Router, openapi: OpenApi) -> anyhow::Result<Router>;

    /// Serve until `cancel` fires.
    async fn serve(&self, router: Router, cancel: CancellationToken) -> anyhow::Result<()>;
}
