use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use modkit::{DbModule, RestfulModule};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};
use utoipa::OpenApi as _;

use crate::api::rest::{openapi::RecipesApiDoc, routes};
use crate::config::RecipesConfig;
use crate::contract::client::RecipesApi;
use crate::domain::password::Passwords;
use crate::domain::service::{Repositories, Service, ServiceConfig};
use crate::gateways::local::RecipesLocalClient;
use crate::infra::storage::SeaOrmRecipesRepository;

/// Recipes module: accounts, tokens, tags, ingredients and recipes.
#[derive(Default)]
pub struct Recipes {
    // Keep the domain service behind ArcSwap for cheap read-mostly access.
    service: ArcSwapOption<Service>,
}

impl Clone for Recipes {
    fn clone(&self) -> Self {
        Self {
            service: ArcSwapOption::new(self.service.load_full()),
        }
    }
}

impl Recipes {
    /// Wire the SeaORM repository into the domain service.
    pub fn init(&self, db: DatabaseConnection, cfg: RecipesConfig) -> anyhow::Result<()> {
        info!("Initializing recipes module");
        debug!(
            "Loaded recipes config: min_password_length={}, max_name_length={}",
            cfg.min_password_length, cfg.max_name_length
        );

        let repo = Arc::new(SeaOrmRecipesRepository::new(db));
        let passwords = Passwords::new(cfg.password_memory_kib, cfg.password_iterations)?;
        let service_config = ServiceConfig {
            min_password_length: cfg.min_password_length,
            max_name_length: cfg.max_name_length,
        };
        let service = Service::new(Repositories::from_single(repo), passwords, service_config);

        self.service.store(Some(Arc::new(service)));
        Ok(())
    }

    fn service(&self) -> anyhow::Result<Arc<Service>> {
        self.service
            .load_full()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))
    }

    /// In-process client for other modules.
    pub fn client(&self) -> anyhow::Result<Arc<dyn RecipesApi>> {
        Ok(Arc::new(RecipesLocalClient::new(self.service()?)))
    }
}

#[async_trait]
impl DbModule for Recipes {
    async fn migrate(&self, db: &DatabaseConnection) -> anyhow::Result<()> {
        info!("Running recipes database migrations");
        crate::infra::storage::migrations::Migrator::up(db, None).await?;
        info!("Recipes database migrations completed successfully");
        Ok(())
    }
}

impl RestfulModule for Recipes {
    fn register_rest(
        &self,
        router: axum::Router,
        openapi: &mut utoipa::openapi::OpenApi,
    ) -> anyhow::Result<axum::Router> {
        info!("Registering recipes REST routes");

        let router = routes::register_routes(router, self.service()?)?;
        openapi.merge(RecipesApiDoc::openapi());

        info!("Recipes REST routes registered successfully");
        Ok(router)
    }
}
