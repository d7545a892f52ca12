//! AssessmentStore port - persistence of the assessment tree.

use async_trait::async_trait;

use crate::domain::assessment::{
    AssessmentDetails, AssessmentRecord, ChoiceDraft, ChoiceRecord, ItemRecord, SectionRecord,
};
use crate::domain::foundation::{AssessmentId, DomainError, ItemId, SectionId};

/// Port for creating assessment rows one at a time.
///
/// Each create returns the stored row with its generated id and timestamps.
/// Returned records have empty child lists; callers attach children
/// themselves. Nothing is ever updated or deleted through this port.
#[async_trait]
pub trait AssessmentStore: Send + Sync {
    async fn create_assessment(
        &self,
        details: &AssessmentDetails,
    ) -> Result<AssessmentRecord, DomainError>;

    async fn create_section(
        &self,
        assessment_id: &AssessmentId,
        title: &str,
        order: i32,
    ) -> Result<SectionRecord, DomainError>;

    async fn create_item(
        &self,
        section_id: &SectionId,
        content: &str,
        order: i32,
    ) -> Result<ItemRecord, DomainError>;

    async fn create_choice(
        &self,
        item_id: &ItemId,
        choice: &ChoiceDraft,
    ) -> Result<ChoiceRecord, DomainError>;
}
