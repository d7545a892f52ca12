//! Persisted assessment tree, as returned by the store.

use super::AssessmentDetails;
use crate::domain::foundation::{AssessmentId, ChoiceId, ItemId, SectionId, Timestamp};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceRecord {
    pub id: ChoiceId,
    pub item_id: ItemId,
    pub content: String,
    pub is_correct: bool,
    pub order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRecord {
    pub id: ItemId,
    pub section_id: SectionId,
    pub content: String,
    pub order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub choices: Vec<ChoiceRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRecord {
    pub id: SectionId,
    pub assessment_id: AssessmentId,
    pub title: String,
    pub order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub items: Vec<ItemRecord>,
}

/// Root of the persisted tree. Sections are appended as they are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentRecord {
    pub id: AssessmentId,
    pub details: AssessmentDetails,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub sections: Vec<SectionRecord>,
}
