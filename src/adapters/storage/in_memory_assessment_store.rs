//! In-Memory Assessment Store
//!
//! Keeps created rows in process memory. Useful for tests and local runs
//! without a database.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::domain::assessment::{
    AssessmentDetails, AssessmentRecord, ChoiceDraft, ChoiceRecord, ItemRecord, SectionRecord,
};
use crate::domain::foundation::{
    AssessmentId, ChoiceId, DomainError, ErrorCode, ItemId, SectionId, Timestamp,
};
use crate::ports::AssessmentStore;

#[derive(Debug, Default)]
struct Tables {
    assessments: Vec<AssessmentRecord>,
    sections: Vec<SectionRecord>,
    items: Vec<ItemRecord>,
    choices: Vec<ChoiceRecord>,
}

impl Tables {
    fn total(&self) -> usize {
        self.assessments.len() + self.sections.len() + self.items.len() + self.choices.len()
    }
}

/// In-memory implementation of `AssessmentStore`.
#[derive(Debug, Default)]
pub struct InMemoryAssessmentStore {
    tables: Mutex<Tables>,
    fail_after: Option<usize>,
}

impl InMemoryAssessmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lets the first `creates` inserts succeed and fails every later one.
    pub fn failing_after(mut self, creates: usize) -> Self {
        self.fail_after = Some(creates);
        self
    }

    /// Row counts as `(assessments, sections, items, choices)`.
    pub fn counts(&self) -> (usize, usize, usize, usize) {
        let tables = self.lock();
        (
            tables.assessments.len(),
            tables.sections.len(),
            tables.items.len(),
            tables.choices.len(),
        )
    }

    /// Every stored section, in creation order.
    pub fn sections(&self) -> Vec<SectionRecord> {
        self.lock().sections.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables
            .lock()
            .expect("InMemoryAssessmentStore: tables lock poisoned")
    }

    fn insert<T, F>(&self, table: &str, write: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut Tables) -> T,
    {
        let mut tables = self.lock();
        if let Some(limit) = self.fail_after {
            if tables.total() >= limit {
                return Err(DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to insert into {}: store unavailable", table),
                ));
            }
        }
        Ok(write(&mut tables))
    }
}

#[async_trait]
impl AssessmentStore for InMemoryAssessmentStore {
    async fn create_assessment(
        &self,
        details: &AssessmentDetails,
    ) -> Result<AssessmentRecord, DomainError> {
        self.insert("tryouts", |tables| {
            let now = Timestamp::now();
            let record = AssessmentRecord {
                id: AssessmentId::new(),
                details: details.clone(),
                created_at: now,
                updated_at: now,
                sections: Vec::new(),
            };
            tables.assessments.push(record.clone());
            record
        })
    }

    async fn create_section(
        &self,
        assessment_id: &AssessmentId,
        title: &str,
        order: i32,
    ) -> Result<SectionRecord, DomainError> {
        self.insert("modules", |tables| {
            let now = Timestamp::now();
            let record = SectionRecord {
                id: SectionId::new(),
                assessment_id: *assessment_id,
                title: title.to_string(),
                order,
                created_at: now,
                updated_at: now,
                items: Vec::new(),
            };
            tables.sections.push(record.clone());
            record
        })
    }

    async fn create_item(
        &self,
        section_id: &SectionId,
        content: &str,
        order: i32,
    ) -> Result<ItemRecord, DomainError> {
        self.insert("questions", |tables| {
            let now = Timestamp::now();
            let record = ItemRecord {
                id: ItemId::new(),
                section_id: *section_id,
                content: content.to_string(),
                order,
                created_at: now,
                updated_at: now,
                choices: Vec::new(),
            };
            tables.items.push(record.clone());
            record
        })
    }

    async fn create_choice(
        &self,
        item_id: &ItemId,
        choice: &ChoiceDraft,
    ) -> Result<ChoiceRecord, DomainError> {
        self.insert("options", |tables| {
            let now = Timestamp::now();
            let record = ChoiceRecord {
                id: ChoiceId::new(),
                item_id: *item_id,
                content: choice.content.clone(),
                is_correct: choice.is_correct,
                order: choice.order,
                created_at: now,
                updated_at: now,
            };
            tables.choices.push(record.clone());
            record
        })
    }
}
