//! Validated, not-yet-persisted assessment tree.
//!
//! Drafts are what the sheet parser produces. The synchronous path turns them
//! into records one create at a time; the queue path forwards the whole draft
//! tree to the storage service.

use super::AssessmentDetails;

/// One answer option of an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceDraft {
    pub content: String,
    pub is_correct: bool,
    /// 1-based position within the item.
    pub order: i32,
}

/// One question with its options, in sheet order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    pub content: String,
    /// Question number as written in the sheet.
    pub order: i32,
    pub choices: Vec<ChoiceDraft>,
}

impl ItemDraft {
    /// The option marked correct, if any.
    pub fn correct_choice(&self) -> Option<&ChoiceDraft> {
        self.choices.iter().find(|c| c.is_correct)
    }
}

/// One sheet page worth of items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionDraft {
    pub title: String,
    pub order: i32,
    pub items: Vec<ItemDraft>,
}

/// Full tree ready to be handed to the storage service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentDraft {
    pub details: AssessmentDetails,
    pub sections: Vec<SectionDraft>,
}

impl AssessmentDraft {
    /// Starts an assessment with no sections.
    pub fn new(details: AssessmentDetails) -> Self {
        Self {
            details,
            sections: Vec::new(),
        }
    }

    /// Total number of items across all sections.
    pub fn item_count(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }
}
