//! Assessment metadata supplied by the caller.

use crate::domain::foundation::{Timestamp, ValidationError};

/// Caller-supplied attributes of the assessment being created.
///
/// Price and status are opaque to this service and stored as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentDetails {
    pub title: String,
    pub price: String,
    pub status: String,
    pub started_at: Timestamp,
    pub ended_at: Timestamp,
}

impl AssessmentDetails {
    /// Builds details from raw request fields, parsing both RFC 3339 timestamps.
    pub fn parse(
        title: impl Into<String>,
        price: impl Into<String>,
        status: impl Into<String>,
        started_at: &str,
        ended_at: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            title: title.into(),
            price: price.into(),
            status: status.into(),
            started_at: Timestamp::parse_rfc3339("startedAt", started_at)?,
            ended_at: Timestamp::parse_rfc3339("endedAt", ended_at)?,
        })
    }
}
