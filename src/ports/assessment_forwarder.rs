//! AssessmentForwarder port - hands a finished draft tree to the storage service.

use async_trait::async_trait;

use crate::domain::assessment::AssessmentDraft;
use crate::domain::foundation::DomainError;

/// Port for delivering a complete draft to a remote persistence endpoint.
#[async_trait]
pub trait AssessmentForwarder: Send + Sync {
    /// Delivers the draft. Fails with `ErrorCode::ForwardingError` unless the
    /// remote side accepted it.
    async fn forward(&self, draft: &AssessmentDraft) -> Result<(), DomainError>;
}
