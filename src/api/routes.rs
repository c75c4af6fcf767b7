use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::handlers;
use crate::store::traits::Store;

pub fn create_router<S: Store + 'static>() -> Router<Arc<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // API Documentation
        .route("/", get(handlers::redirect_to_docs))
        .route("/docs", get(handlers::get_api_docs))
        // Request processing
        .route("/api/v1/process", post(handlers::process_request::<S>))
        // Statistics
        .route("/api/v1/stats", get(handlers::get_statistics::<S>))
}
