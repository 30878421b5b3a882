//! MGNREGA Tracker API Server Entry Point
//!
//! Loads configuration, selects the record store, and starts the Axum
//! HTTP server.

use std::sync::Arc;

use mgnrega_api::telemetry::{init_tracing, TelemetryConfig};
use mgnrega_api::{
    create_api_router, ApiError, ApiResult, AppConfig, AppState, DataGovClient, FreshnessPolicy,
    StoreConfig,
};
use mgnrega_storage::{InMemoryRecordStore, PgRecordStore, PgStoreConfig, RecordStore};

#[tokio::main]
async fn main() -> ApiResult<()> {
    // A missing .env file is normal outside development.
    let dotenv = dotenvy::dotenv();

    let telemetry_config = TelemetryConfig::default();
    init_tracing(&telemetry_config)?;
    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    let config = AppConfig::from_env()?;
    let store = connect_store(&config.store).await?;

    let policy_config = config.policy_config();
    if policy_config.credentials.is_none() {
        tracing::warn!(
            "DATA_GOV_API_KEY / DATA_GOV_RESOURCE_ID not configured, serving cached or demo data"
        );
    }

    let upstream = Arc::new(DataGovClient::new(&config.upstream)?);
    let policy = FreshnessPolicy::new(store, upstream, policy_config);
    let app = create_api_router(AppState::new(policy), &config.api);

    let addr = config.api.bind_addr()?;
    tracing::info!(%addr, "Starting MGNREGA tracker API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn connect_store(config: &StoreConfig) -> ApiResult<Arc<dyn RecordStore>> {
    match &config.database_url {
        Some(url) => {
            let pg_config = PgStoreConfig::new(url.clone()).with_max_size(config.pool_size);
            let store = PgRecordStore::connect(&pg_config).await?;
            tracing::info!(pool_size = config.pool_size, "Connected to PostgreSQL record store");
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory record store; cache is lost on restart");
            Ok(Arc::new(InMemoryRecordStore::new()))
        }
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
