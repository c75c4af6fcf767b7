#![recursion_limit = "512"]

pub mod api;
pub mod config;
pub mod logic;
pub mod model;
pub mod seed;
pub mod store;

// Export API types
pub use api::handlers;
pub use api::routes;

// Export logic types
pub use logic::{
    Classification, Counters, DailyReport, Rejection, RequestClassifier, Verdict,
};

// Export all model types
pub use model::*;

// Export seed module
pub use seed::*;

// Export store types
pub use store::{MemoryStore, PostgresStore, Store};

use crate::config::{AppConfig, StoreBackend};
use std::sync::Arc;

/// Router with its store attached, ready to be served
pub fn build_app<S: Store + 'static>(store: Arc<S>) -> axum::Router {
    crate::api::routes::create_router().with_state(store)
}

/// Connect the configured store and serve until the listener fails
pub async fn run_server(config: &AppConfig) -> anyhow::Result<()> {
    let load_seed = std::env::var("LOAD_SEED_DATA").unwrap_or_default() == "true";

    match config.store.backend {
        StoreBackend::Postgres => {
            log::info!("Connecting to PostgreSQL...");
            let database_url = config.database_url()?;
            let store = PostgresStore::new(&database_url, config.max_connections()).await?;

            log::info!("Running database migrations...");
            store.migrate().await?;

            serve(Arc::new(store), config, load_seed).await
        }
        StoreBackend::Memory => {
            log::warn!("Using in-memory store, statistics are lost on restart");
            serve(Arc::new(MemoryStore::new()), config, load_seed).await
        }
    }
}

async fn serve<S: Store + 'static>(
    store: Arc<S>,
    config: &AppConfig,
    load_seed: bool,
) -> anyhow::Result<()> {
    use tokio::net::TcpListener;

    if load_seed {
        log::info!("Loading seed data...");
        seed::load_seed_data(&*store).await?;
    }

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    log::info!("Gatekeeper running on http://{}", bind_address);
    log::info!("API documentation available at http://{}/docs", bind_address);

    axum::serve(listener, build_app(store)).await?;

    Ok(())
}
