use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use modkit::db::{ConnectOpts, SQLITE_MEMORY_DSN};
use modkit::{run, DbModule, RestfulModule, RunOptions, ShutdownOptions};
use runtime::{AppConfig, CliArgs, DatabaseConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use api_ingress::{ApiIngress, ApiIngressConfig};
use recipes::{config::RecipesConfig, Recipes};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const RECIPES_MODULE: &str = "recipes";
const API_INGRESS_MODULE: &str = "api_ingress";

/// Recipe Server - recipe API with per-user tags and ingredients
#[derive(Parser)]
#[command(name = "recipe-server")]
#[command(about = "Recipe Server - recipe API with per-user tags and ingredients")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory SQLite database instead of the configured one
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backend {
    Sqlite,
    Postgres,
}

/// Detect DB backend from URL scheme. Only the drivers compiled into sea-orm are accepted.
fn detect_from_dsn(cfg: &DatabaseConfig) -> Result<Backend> {
    let raw = cfg.url.trim();
    if raw.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }

    let url = Url::parse(raw).map_err(|e| anyhow!("Invalid database DSN '{}': {}", raw, e))?;

    match url.scheme() {
        "sqlite" => Ok(Backend::Sqlite),
        "postgres" | "postgresql" => Ok(Backend::Postgres),
        other => Err(anyhow!("Unsupported database type: {}", other)),
    }
}

/// Typed module sections; fails on unknown keys or wrong types.
fn module_configs(config: &AppConfig) -> Result<(RecipesConfig, ApiIngressConfig)> {
    let recipes: RecipesConfig = config.module_config(RECIPES_MODULE)?;
    let mut ingress: ApiIngressConfig = config.module_config(API_INGRESS_MODULE)?;
    if config.server.timeout_sec > 0 {
        ingress.request_timeout_secs = config.server.timeout_sec;
    }
    Ok((recipes, ingress))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("Recipe Server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, args).await,
        Commands::Check => check_config(config, args),
    }
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Initializing modules...");
    let (recipes_cfg, ingress_cfg) = module_configs(&config)?;

    // Base dir for resolving relative sqlite paths (already absolute & created)
    let base_dir = PathBuf::from(&config.server.home_dir);

    let (dsn, connect_opts) = if args.mock {
        tracing::info!("Mock mode: using in-memory SQLite");
        (SQLITE_MEMORY_DSN.to_string(), ConnectOpts::default())
    } else {
        let db_config = config
            .database
            .clone()
            .context("database section is required (or pass --mock)")?;
        let backend = detect_from_dsn(&db_config)?;
        tracing::info!(?backend, "Database backend detected");

        let opts = ConnectOpts {
            max_conns: db_config.max_conns,
            acquire_timeout: Some(Duration::from_secs(5)),
            busy_timeout: db_config
                .busy_timeout_ms
                .map(|ms| Duration::from_millis(u64::from(ms))),
            ..Default::default()
        };
        (db_config.url.trim().to_string(), opts)
    };

    let db = modkit::db::connect(&dsn, &base_dir, &connect_opts).await?;

    let recipes = Arc::new(Recipes::default());
    recipes.init(db.clone(), recipes_cfg)?;

    let host = Arc::new(ApiIngress::new(ingress_cfg, config.server.bind_addr()));
    tracing::info!(bind_addr = %host.bind_addr(), "REST host configured");

    let run_options = RunOptions {
        db: Some(db),
        db_modules: vec![recipes.clone() as Arc<dyn DbModule>],
        rest_modules: vec![recipes as Arc<dyn RestfulModule>],
        host,
        shutdown: ShutdownOptions::Signals,
    };

    run(run_options).await
}

fn check_config(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Checking configuration...");

    module_configs(&config)?;
    if !args.mock {
        if let Some(db_config) = &config.database {
            let backend = detect_from_dsn(db_config)?;
            println!("Database backend: {backend:?}");
        }
    }

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("Server config:");
    println!("{}", config.to_yaml()?);

    Ok(())
}
