//! HTTP adapters - REST API implementations.

pub mod ingestion;
mod router;

pub use ingestion::{ingestion_routes, IngestionHandlers};
pub use router::{build_router, RouterConfig};
