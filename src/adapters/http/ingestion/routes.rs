//! HTTP routes for ingestion endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{health, parse_sheets, IngestionHandlers};

/// Creates the ingestion router with all endpoints.
pub fn ingestion_routes(handlers: IngestionHandlers) -> Router {
    Router::new()
        .route("/api/parsing-sheets/parse", post(parse_sheets))
        .route("/health", get(health))
        .with_state(handlers)
}
