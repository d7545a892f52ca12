//! HTTP adapter for the synchronous ingestion endpoint.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    AssessmentResponse, ErrorResponse, ModuleResponse, OptionResponse, ParseSheetsRequest,
    QuestionResponse,
};
pub use handlers::IngestionHandlers;
pub use routes::ingestion_routes;
