//! Ingestion error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ValidationError};
use crate::domain::sheet::SheetFormatError;

/// Why an ingestion run failed.
///
/// Caller-input problems (`is_client_error`) are never retried by this
/// service; collaborator failures carry the port's `DomainError`.
#[derive(Debug, Clone, Error)]
pub enum IngestError {
    #[error("Validation failed for '{field}': {message}")]
    InvalidRequest { field: String, message: String },

    #[error("Invalid message payload: {0}")]
    InvalidPayload(String),

    #[error("{0}")]
    Format(#[from] SheetFormatError),

    #[error("sheet {sheet:?}: {source}")]
    SheetFormat {
        sheet: String,
        #[source]
        source: SheetFormatError,
    },

    #[error("Spreadsheet provider error: {0}")]
    Provider(DomainError),

    #[error("Persistence error: {0}")]
    Persistence(DomainError),

    #[error("Forwarding error: {0}")]
    Forwarding(DomainError),
}

impl IngestError {
    /// Wraps a grid error with the page it came from.
    pub fn in_sheet(sheet: impl Into<String>, source: SheetFormatError) -> Self {
        IngestError::SheetFormat {
            sheet: sheet.into(),
            source,
        }
    }

    /// True when the caller's input is at fault rather than a collaborator.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            IngestError::InvalidRequest { .. }
                | IngestError::InvalidPayload(_)
                | IngestError::Format(_)
                | IngestError::SheetFormat { .. }
        )
    }

    /// Stable machine-readable code for error payloads.
    pub fn code(&self) -> &'static str {
        match self {
            IngestError::InvalidRequest { .. } => "VALIDATION_FAILED",
            IngestError::InvalidPayload(_) => "INVALID_PAYLOAD",
            IngestError::Format(_) | IngestError::SheetFormat { .. } => "INVALID_SHEET_FORMAT",
            IngestError::Provider(_) => "SPREADSHEET_PROVIDER_ERROR",
            IngestError::Persistence(_) => "DATABASE_ERROR",
            IngestError::Forwarding(_) => "FORWARDING_ERROR",
        }
    }
}

impl From<ValidationError> for IngestError {
    fn from(err: ValidationError) -> Self {
        IngestError::InvalidRequest {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    #[test]
    fn format_errors_are_client_errors() {
        let err: IngestError = SheetFormatError::InvalidSpreadsheetUrl {
            url: "x".to_string(),
        }
        .into();
        assert!(err.is_client_error());
        assert_eq!(err.code(), "INVALID_SHEET_FORMAT");

        let err = IngestError::in_sheet(
            "Math",
            SheetFormatError::EmptySheet {
                sheet: "Math".to_string(),
            },
        );
        assert!(err.is_client_error());
        assert!(err.to_string().starts_with("sheet \"Math\""));
    }

    #[test]
    fn validation_errors_keep_their_field() {
        let err: IngestError = ValidationError::invalid_format("startedAt", "bad").into();
        match &err {
            IngestError::InvalidRequest { field, .. } => assert_eq!(field, "startedAt"),
            other => panic!("Expected InvalidRequest, got {:?}", other),
        }
        assert!(err.is_client_error());
    }

    #[test]
    fn collaborator_errors_are_not_client_errors() {
        let cause = DomainError::new(ErrorCode::DatabaseError, "connection reset");
        let err = IngestError::Persistence(cause);
        assert!(!err.is_client_error());
        assert_eq!(err.code(), "DATABASE_ERROR");
        assert!(err.to_string().contains("connection reset"));
    }
}
