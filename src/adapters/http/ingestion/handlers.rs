//! HTTP handlers for ingestion endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

use crate::application::handlers::{ParseSheetsCommand, ParseSheetsHandler};
use crate::domain::assessment::IngestError;

use super::dto::{AssessmentResponse, ErrorResponse, ParseSheetsRequest};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct IngestionHandlers {
    parse_handler: Arc<ParseSheetsHandler>,
}

impl IngestionHandlers {
    pub fn new(parse_handler: Arc<ParseSheetsHandler>) -> Self {
        Self { parse_handler }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/parsing-sheets/parse - Build and store an assessment from a sheet
pub async fn parse_sheets(
    State(handlers): State<IngestionHandlers>,
    payload: Result<Json<ParseSheetsRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return handle_ingest_error(IngestError::InvalidPayload(rejection.body_text()))
        }
    };

    match handlers
        .parse_handler
        .handle(ParseSheetsCommand::from(req))
        .await
    {
        Ok(record) => {
            let response: AssessmentResponse = record.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_ingest_error(e),
    }
}

/// GET /health - Liveness probe
pub async fn health() -> Response {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" }))).into_response()
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_ingest_error(e: IngestError) -> Response {
    let status = if e.is_client_error() {
        warn!(code = e.code(), error = %e, "Rejected ingestion request");
        StatusCode::BAD_REQUEST
    } else {
        error!(code = e.code(), error = %e, "Ingestion request failed");
        StatusCode::INTERNAL_SERVER_ERROR
    };

    (status, Json(ErrorResponse::from(&e))).into_response()
}
