//! # txdoc-api — Binary Entry Point
//!
//! Starts the Axum HTTP server. Binds to a configurable port (default 8080).

use std::sync::Arc;

use txdoc_api::db::records::PgRecordStore;
use txdoc_api::state::{AppConfig, AppState, LogFormat};
use txdoc_directory::{DirectoryConfig, HttpDirectory, InMemoryDirectory, OrganizationDirectory};
use txdoc_records::{MemoryRecordStore, RecordStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    // Initialize database pool (optional; absent means in-memory only).
    let db_pool = txdoc_api::db::init_pool().await.map_err(|e| {
        tracing::error!("Database initialization failed: {e}");
        e
    })?;
    let store: Arc<dyn RecordStore> = match &db_pool {
        Some(pool) => Arc::new(PgRecordStore::new(pool.clone())),
        None => Arc::new(MemoryRecordStore::new()),
    };

    let directory: Arc<dyn OrganizationDirectory> = match DirectoryConfig::from_env()? {
        Some(dir_config) => {
            tracing::info!(base_url = %dir_config.base_url, "organization directory client configured");
            Arc::new(HttpDirectory::new(dir_config).map_err(|e| {
                tracing::error!("Failed to create organization directory client: {e}");
                e
            })?)
        }
        None => {
            tracing::warn!(
                "ORG_DIRECTORY_URL not set, using an empty in-memory organization directory. \
                 Record creation will fail until organizations are registered."
            );
            Arc::new(InMemoryDirectory::new())
        }
    };

    let port = config.port;
    let state = AppState::with_backends(config, store, directory, db_pool);

    let workflow = state.records.workflow();
    tracing::info!(
        status_policy = %workflow.policy(),
        enabled_statuses = ?workflow.enabled().collect::<Vec<_>>(),
        "request status workflow configured"
    );

    let app = txdoc_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("txdoc API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
