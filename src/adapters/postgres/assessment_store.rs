//! PostgreSQL implementation of AssessmentStore.
//!
//! The schema is owned by the storage service; column names are the quoted
//! camelCase identifiers it defines.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row};

use crate::domain::assessment::{
    AssessmentDetails, AssessmentRecord, ChoiceDraft, ChoiceRecord, ItemRecord, SectionRecord,
};
use crate::domain::foundation::{
    AssessmentId, ChoiceId, DomainError, ErrorCode, ItemId, SectionId, Timestamp,
};
use crate::ports::AssessmentStore;

/// PostgreSQL implementation of AssessmentStore.
#[derive(Clone)]
pub struct PostgresAssessmentStore {
    pool: PgPool,
}

impl PostgresAssessmentStore {
    /// Creates a new PostgresAssessmentStore.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssessmentStore for PostgresAssessmentStore {
    async fn create_assessment(
        &self,
        details: &AssessmentDetails,
    ) -> Result<AssessmentRecord, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO tryouts (title, price, status, "startedAt", "endedAt")
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, "updatedAt", "createdAt"
            "#,
        )
        .bind(&details.title)
        .bind(&details.price)
        .bind(&details.status)
        .bind(details.started_at.as_datetime())
        .bind(details.ended_at.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| insert_failed("tryout", e))?;

        Ok(AssessmentRecord {
            id: AssessmentId::from_uuid(column(&row, "id")?),
            details: details.clone(),
            created_at: timestamp(&row, "createdAt")?,
            updated_at: timestamp(&row, "updatedAt")?,
            sections: Vec::new(),
        })
    }

    async fn create_section(
        &self,
        assessment_id: &AssessmentId,
        title: &str,
        order: i32,
    ) -> Result<SectionRecord, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO modules (title, "tryoutId", "moduleOrder")
            VALUES ($1, $2, $3)
            RETURNING id, "updatedAt", "createdAt"
            "#,
        )
        .bind(title)
        .bind(assessment_id.as_uuid())
        .bind(order)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| insert_failed("module", e))?;

        Ok(SectionRecord {
            id: SectionId::from_uuid(column(&row, "id")?),
            assessment_id: *assessment_id,
            title: title.to_string(),
            order,
            created_at: timestamp(&row, "createdAt")?,
            updated_at: timestamp(&row, "updatedAt")?,
            items: Vec::new(),
        })
    }

    async fn create_item(
        &self,
        section_id: &SectionId,
        content: &str,
        order: i32,
    ) -> Result<ItemRecord, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO questions (content, "moduleId", "questionOrder")
            VALUES ($1, $2, $3)
            RETURNING id, "updatedAt", "createdAt"
            "#,
        )
        .bind(content)
        .bind(section_id.as_uuid())
        .bind(order)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| insert_failed("question", e))?;

        Ok(ItemRecord {
            id: ItemId::from_uuid(column(&row, "id")?),
            section_id: *section_id,
            content: content.to_string(),
            order,
            created_at: timestamp(&row, "createdAt")?,
            updated_at: timestamp(&row, "updatedAt")?,
            choices: Vec::new(),
        })
    }

    async fn create_choice(
        &self,
        item_id: &ItemId,
        choice: &ChoiceDraft,
    ) -> Result<ChoiceRecord, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO options ("questionId", content, "isTrue", "optionOrder")
            VALUES ($1, $2, $3, $4)
            RETURNING id, "updatedAt", "createdAt"
            "#,
        )
        .bind(item_id.as_uuid())
        .bind(&choice.content)
        .bind(choice.is_correct)
        .bind(choice.order)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| insert_failed("option", e))?;

        Ok(ChoiceRecord {
            id: ChoiceId::from_uuid(column(&row, "id")?),
            item_id: *item_id,
            content: choice.content.clone(),
            is_correct: choice.is_correct,
            order: choice.order,
            created_at: timestamp(&row, "createdAt")?,
            updated_at: timestamp(&row, "updatedAt")?,
        })
    }
}

fn insert_failed(entity: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Failed to insert {}: {}", entity, e),
    )
}

fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get(name).map_err(|e| read_failed(name, e))
}

fn read_failed(column: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Failed to get {}: {}", column, e),
    )
    .with_detail("column", column)
}

fn timestamp(row: &PgRow, name: &str) -> Result<Timestamp, DomainError> {
    column::<DateTime<Utc>>(row, name).map(Timestamp::from_datetime)
}
