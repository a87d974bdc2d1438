//! ModKit runtime runner.
//!
//! Phases: db (migrate) → rest (router composition) → serve → stop.
//! Shutdown can be driven by OS signals, an external `CancellationToken`,
//! or an arbitrary future.

use crate::contracts::{DbModule, RestHostModule, RestfulModule};
use crate::runtime::shutdown;
use sea_orm::DatabaseConnection;
use std::{future::Future, pin::Pin, sync::Arc};
use tokio_util::sync::CancellationToken;

/// How the runtime should decide when to stop.
pub enum ShutdownOptions {
    /// Listen for OS signals (Ctrl+C / SIGTERM).
    Signals,
    /// An external `CancellationToken` controls the lifecycle.
    Token(CancellationToken),
    /// An arbitrary future; when it completes, we initiate shutdown.
    Future(Pin<Box<dyn Future<Output = ()> + Send>>),
}

pub struct RunOptions {
    /// Connection handed to every `DbModule`; `None` skips the db phase.
    pub db: Option<DatabaseConnection>,
    pub db_modules: Vec<Arc<dyn DbModule>>,
    pub rest_modules: Vec<Arc<dyn RestfulModule>>,
    pub host: Arc<dyn RestHostModule>,
    pub shutdown: ShutdownOptions,
}

/// Full cycle: db → rest (sync) → serve → stop.
pub async fn run(opts: RunOptions) -> anyhow::Result<()> {
    let cancel = match &opts.shutdown {
        ShutdownOptions::Token(t) => t.clone(),
        _ => CancellationToken::new(),
    };

    match opts.shutdown {
        ShutdownOptions::Signals => {
            let c = cancel.clone();
            tokio::spawn(async move {
                match shutdown::wait_for_shutdown().await {
                    Ok(()) => tracing::info!("shutdown: signal received"),
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            "shutdown: primary waiter failed; falling back to ctrl_c()"
                        );
                        let _ = tokio::signal::ctrl_c().await;
                    }
                }
                c.cancel();
            });
        }
        ShutdownOptions::Future(waiter) => {
            let c = cancel.clone();
            tokio::spawn(async move {
                waiter.await;
                tracing::info!("shutdown: external future completed");
                c.cancel();
            });
        }
        ShutdownOptions::Token(_) => {
            tracing::info!("shutdown: external token will control lifecycle");
        }
    }

    // DB MIGRATION phase
    match &opts.db {
        Some(db) => {
            tracing::info!(modules = opts.db_modules.len(), "Phase: db");
            for module in &opts.db_modules {
                module.migrate(db).await?;
            }
        }
        None if !opts.db_modules.is_empty() => {
            anyhow::bail!("database modules registered but no database configured");
        }
        None => {}
    }

    // REST phase (synchronous router composition against the host).
    tracing::info!("Phase: rest (sync)");
    let mut openapi = utoipa::openapi::OpenApiBuilder::new().build();
    let mut router = opts.host.rest_prepare(axum::Router::new())?;
    for module in &opts.rest_modules {
        router = module.register_rest(router, &mut openapi)?;
    }
    let router = opts.host.rest_finalize(router, openapi)?;

    // SERVE until cancelled
    tracing::info!("Phase: serve");
    opts.host.serve(router, cancel.clone()).await?;

    tracing::info!("Phase: stop");
    Ok(())
}
