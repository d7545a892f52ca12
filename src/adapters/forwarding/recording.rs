//! Recording forwarder for tests.
//!
//! # Panics
//!
//! Methods may panic if the internal lock is poisoned. This adapter should
//! NOT be used in production.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::domain::assessment::AssessmentDraft;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::AssessmentForwarder;

/// Forwarder that keeps every draft it is handed.
#[derive(Debug, Default)]
pub struct RecordingForwarder {
    forwarded: Mutex<Vec<AssessmentDraft>>,
    fail: bool,
}

impl RecordingForwarder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A forwarder whose remote side rejects everything.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Drafts accepted so far, in call order.
    pub fn forwarded(&self) -> Vec<AssessmentDraft> {
        self.forwarded
            .lock()
            .expect("RecordingForwarder: lock poisoned")
            .clone()
    }
}

#[async_trait]
impl AssessmentForwarder for RecordingForwarder {
    async fn forward(&self, draft: &AssessmentDraft) -> Result<(), DomainError> {
        if self.fail {
            return Err(DomainError::new(
                ErrorCode::ForwardingError,
                "failed to send assessment: remote returned 500",
            ));
        }
        self.forwarded
            .lock()
            .expect("RecordingForwarder: lock poisoned")
            .push(draft.clone());
        Ok(())
    }
}
