//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps and error types that form the
//! vocabulary of the ingestion domain.

mod errors;
mod ids;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{AssessmentId, ChoiceId, ItemId, SectionId, SpreadsheetId};
pub use timestamp::Timestamp;
