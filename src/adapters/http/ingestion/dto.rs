//! HTTP DTOs for ingestion endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::ParseSheetsCommand;
use crate::domain::assessment::{
    AssessmentRecord, ChoiceRecord, IngestError, ItemRecord, SectionRecord,
};
use crate::domain::foundation::{AssessmentId, ChoiceId, ItemId, SectionId, Timestamp};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request body for `POST /api/parsing-sheets/parse`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseSheetsRequest {
    pub title: String,
    pub price: String,
    pub status: String,
    pub started_at: String,
    pub ended_at: String,
    pub url: String,
}

impl From<ParseSheetsRequest> for ParseSheetsCommand {
    fn from(req: ParseSheetsRequest) -> Self {
        Self {
            title: req.title,
            price: req.price,
            status: req.status,
            started_at: req.started_at,
            ended_at: req.ended_at,
            url: req.url,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResponse {
    pub id: AssessmentId,
    pub title: String,
    pub price: String,
    pub status: String,
    pub started_at: Timestamp,
    pub ended_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_at: Timestamp,
    pub modules: Vec<ModuleResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleResponse {
    pub id: SectionId,
    pub title: String,
    pub tryout_id: AssessmentId,
    pub module_order: i32,
    pub updated_at: Timestamp,
    pub created_at: Timestamp,
    pub questions: Vec<QuestionResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponse {
    pub id: ItemId,
    pub content: String,
    pub module_id: SectionId,
    pub question_order: i32,
    pub updated_at: Timestamp,
    pub created_at: Timestamp,
    pub options: Vec<OptionResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionResponse {
    pub id: ChoiceId,
    pub question_id: ItemId,
    pub content: String,
    pub is_true: bool,
    pub option_order: i32,
    pub updated_at: Timestamp,
    pub created_at: Timestamp,
}

impl From<AssessmentRecord> for AssessmentResponse {
    fn from(record: AssessmentRecord) -> Self {
        Self {
            id: record.id,
            title: record.details.title,
            price: record.details.price,
            status: record.details.status,
            started_at: record.details.started_at,
            ended_at: record.details.ended_at,
            updated_at: record.updated_at,
            created_at: record.created_at,
            modules: record.sections.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<SectionRecord> for ModuleResponse {
    fn from(record: SectionRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            tryout_id: record.assessment_id,
            module_order: record.order,
            updated_at: record.updated_at,
            created_at: record.created_at,
            questions: record.items.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<ItemRecord> for QuestionResponse {
    fn from(record: ItemRecord) -> Self {
        Self {
            id: record.id,
            content: record.content,
            module_id: record.section_id,
            question_order: record.order,
            updated_at: record.updated_at,
            created_at: record.created_at,
            options: record.choices.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<ChoiceRecord> for OptionResponse {
    fn from(record: ChoiceRecord) -> Self {
        Self {
            id: record.id,
            question_id: record.item_id,
            content: record.content,
            is_true: record.is_correct,
            option_order: record.order,
            updated_at: record.updated_at,
            created_at: record.created_at,
        }
    }
}

/// Standard error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<&IngestError> for ErrorResponse {
    fn from(err: &IngestError) -> Self {
        let response = Self::new(err.code(), err.to_string());
        match err {
            IngestError::SheetFormat { sheet, .. } => {
                response.with_details(serde_json::json!({ "sheet": sheet }))
            }
            _ => response,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::assessment::AssessmentDetails;
    use crate::domain::sheet::SheetFormatError;

    fn record() -> AssessmentRecord {
        let now = Timestamp::now();
        let assessment_id = AssessmentId::new();
        let section_id = SectionId::new();
        let item_id = ItemId::new();
        AssessmentRecord {
            id: assessment_id,
            details: AssessmentDetails::parse(
                "Tryout 1",
                "50000",
                "draft",
                "2024-05-01T08:00:00Z",
                "2024-05-01T10:00:00Z",
            )
            .unwrap(),
            created_at: now,
            updated_at: now,
            sections: vec![SectionRecord {
                id: section_id,
                assessment_id,
                title: "Geography".to_string(),
                order: 1,
                created_at: now,
                updated_at: now,
                items: vec![ItemRecord {
                    id: item_id,
                    section_id,
                    content: "Capital of France?".to_string(),
                    order: 1,
                    created_at: now,
                    updated_at: now,
                    choices: vec![ChoiceRecord {
                        id: ChoiceId::new(),
                        item_id,
                        content: "Paris".to_string(),
                        is_correct: true,
                        order: 1,
                        created_at: now,
                        updated_at: now,
                    }],
                }],
            }],
        }
    }

    #[test]
    fn request_reads_camel_case_fields() {
        let req: ParseSheetsRequest = serde_json::from_str(
            r#"{"title":"t","price":"0","status":"s","startedAt":"a","endedAt":"b","url":"u"}"#,
        )
        .unwrap();

        let cmd = ParseSheetsCommand::from(req);

        assert_eq!(cmd.started_at, "a");
        assert_eq!(cmd.ended_at, "b");
    }

    #[test]
    fn response_links_children_to_parents() {
        let record = record();
        let assessment_id = record.id.to_string();

        let value = serde_json::to_value(AssessmentResponse::from(record)).unwrap();

        assert_eq!(value["title"], "Tryout 1");
        assert_eq!(value["startedAt"], "2024-05-01T08:00:00Z");
        let module = &value["modules"][0];
        assert_eq!(module["tryoutId"], assessment_id.as_str());
        assert_eq!(module["moduleOrder"], 1);
        let question = &module["questions"][0];
        assert_eq!(question["moduleId"], module["id"]);
        let option = &question["options"][0];
        assert_eq!(option["questionId"], question["id"]);
        assert_eq!(option["isTrue"], true);
        assert_eq!(option["optionOrder"], 1);
        assert!(option.get("createdAt").is_some());
    }

    #[test]
    fn error_response_names_the_sheet() {
        let err = IngestError::in_sheet(
            "Math",
            SheetFormatError::EmptySheet {
                sheet: "Math".to_string(),
            },
        );

        let value = serde_json::to_value(ErrorResponse::from(&err)).unwrap();

        assert_eq!(value["code"], "INVALID_SHEET_FORMAT");
        assert_eq!(value["details"]["sheet"], "Math");
    }

    #[test]
    fn error_response_omits_empty_details() {
        let value = serde_json::to_value(ErrorResponse::new("X", "m")).unwrap();
        assert!(value.get("details").is_none());
    }
}
