//! Wire shape of a forwarded draft tree.

use serde::{Deserialize, Serialize};

use crate::domain::assessment::{AssessmentDraft, ChoiceDraft, ItemDraft, SectionDraft};
use crate::domain::foundation::Timestamp;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftPayload {
    pub title: String,
    pub price: String,
    pub status: String,
    pub started_at: Timestamp,
    pub ended_at: Timestamp,
    pub modules: Vec<ModulePayload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModulePayload {
    pub title: String,
    pub module_order: i32,
    pub questions: Vec<QuestionPayload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPayload {
    pub content: String,
    pub question_order: i32,
    pub options: Vec<OptionPayload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionPayload {
    pub content: String,
    pub is_true: bool,
    pub option_order: i32,
}

impl From<&AssessmentDraft> for DraftPayload {
    fn from(draft: &AssessmentDraft) -> Self {
        Self {
            title: draft.details.title.clone(),
            price: draft.details.price.clone(),
            status: draft.details.status.clone(),
            started_at: draft.details.started_at,
            ended_at: draft.details.ended_at,
            modules: draft.sections.iter().map(ModulePayload::from).collect(),
        }
    }
}

impl From<&SectionDraft> for ModulePayload {
    fn from(section: &SectionDraft) -> Self {
        Self {
            title: section.title.clone(),
            module_order: section.order,
            questions: section.items.iter().map(QuestionPayload::from).collect(),
        }
    }
}

impl From<&ItemDraft> for QuestionPayload {
    fn from(item: &ItemDraft) -> Self {
        Self {
            content: item.content.clone(),
            question_order: item.order,
            options: item.choices.iter().map(OptionPayload::from).collect(),
        }
    }
}

impl From<&ChoiceDraft> for OptionPayload {
    fn from(choice: &ChoiceDraft) -> Self {
        Self {
            content: choice.content.clone(),
            is_true: choice.is_correct,
            option_order: choice.order,
        }
    }
}
