use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use fitcoach_api::auth::SessionManager;
use fitcoach_api::config::config;
use fitcoach_api::database::{DatabaseManager, MemoryStore, PgStore, Store};
use fitcoach_api::{catalog, is_production, routes, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SECURITY_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fitcoach_api=info,tower_http=info")),
        )
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config();
    tracing::info!("Starting FitCoach API in {:?} mode", config.environment);

    if is_production!() && std::env::var("SECURITY_JWT_SECRET").map_or(true, |s| s.trim().is_empty()) {
        anyhow::bail!("SECURITY_JWT_SECRET must be set in production");
    }
    let sessions = SessionManager::from_config(&config.security).context("session signing key")?;

    let (store, manager) = open_store().await?;
    let state = AppState::new(store, sessions);
    let app = routes::app_with_layers(state, &config.security, config.api.enable_request_logging);

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("FitCoach API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server")?;

    if let Some(manager) = manager {
        manager.close().await;
    }
    Ok(())
}

/// Postgres when a database URL is configured, otherwise an in-memory store
/// seeded with the built-in catalog.
async fn open_store() -> anyhow::Result<(Arc<dyn Store>, Option<DatabaseManager>)> {
    let database = &config().database;

    if database.url.is_some() {
        let manager = DatabaseManager::connect(database).await?;
        if database.run_migrations {
            manager.migrate().await?;
        }
        let store = PgStore::new(manager.pool().clone());
        return Ok((Arc::new(store), Some(manager)));
    }

    if is_production!() {
        anyhow::bail!("DATABASE_URL must be set in production");
    }

    tracing::warn!("DATABASE_URL not set, using in-memory store (data is lost on exit)");
    let store = MemoryStore::new();
    let report = catalog::import(&store, catalog::builtin()?).await?;
    tracing::info!("Seeded {} catalog exercises", report.inserted);
    Ok((Arc::new(store), None))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
