use std::net::SocketAddr;

use axum::Router;
use common::utils::logging::init_logging_from_env;
use configs::AppConfig;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use crate::errors::StartupError;
use crate::{observability, routes, state::AppState};
use service::Store;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Open the database once for the whole process.
///
/// With `database.required = false` a missing/invalid URL, a failed connect or
/// a failed migration yields an unavailable `Store`: the server still starts
/// and every request answers 503. With `required = true` startup aborts.
pub async fn connect_store(cfg: &configs::DatabaseConfig) -> Result<Store, StartupError> {
    if let Err(e) = cfg.validate() {
        return unavailable_or_fail(cfg, StartupError::InvalidConfig(e.to_string()));
    }

    let db_cfg = models::db::DatabaseConfig::from(cfg);
    let db = match models::db::connect_with_config(&db_cfg).await {
        Ok(db) => db,
        Err(e) => return unavailable_or_fail(cfg, StartupError::Database(e.to_string())),
    };

    if cfg.run_migrations {
        if let Err(e) = migration::Migrator::up(&db, None).await {
            return unavailable_or_fail(cfg, StartupError::Database(format!("migrate up failed: {e}")));
        }
        info!(event = "migrations_applied", "database schema up to date");
    }

    let store = Store::connected(db);
    match store.ping().await {
        Ok(()) => info!(event = "db_ready", "database connection configured"),
        Err(e) => warn!(event = "db_ping_failed", error = %e, "database ping failed after connect"),
    }
    Ok(store)
}

fn unavailable_or_fail(cfg: &configs::DatabaseConfig, err: StartupError) -> Result<Store, StartupError> {
    if cfg.required {
        return Err(err);
    }
    error!(event = "db_unavailable", error = %err, "database could not be initialized; requests will fail with 503");
    Ok(Store::unavailable(err.to_string()))
}

/// Build the application router over a ready state.
pub fn build_app(state: AppState) -> Router {
    observability::init_metrics();
    routes::build_router(state, build_cors())
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(cfg.server.bind_addr().parse()?)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, shutting down");
}

/// Public entry: build the app and run the HTTP server until Ctrl+C.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_from_env();

    let cfg = AppConfig::load()?;
    let store = connect_store(&cfg.database).await?;
    let app = build_app(AppState::seaorm(store.clone()));

    let addr = bind_addr(&cfg)?;
    info!(%addr, "starting feature voting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Err(e) = store.close().await {
        warn!(error = %e, "closing database pool failed");
    }
    Ok(())
}
