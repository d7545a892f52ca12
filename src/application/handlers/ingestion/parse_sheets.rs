//! ParseSheetsHandler - synchronous ingestion that persists as it goes.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::application::assembler::{SectionSink, TreeAssembler};
use crate::domain::assessment::{
    AssessmentDetails, AssessmentRecord, IngestError, SectionDraft,
};
use crate::domain::sheet::spreadsheet_id_from_url;
use crate::ports::AssessmentStore;

/// Command to build and store an assessment from a spreadsheet.
#[derive(Debug, Clone)]
pub struct ParseSheetsCommand {
    pub title: String,
    pub price: String,
    pub status: String,
    /// RFC 3339 date-time.
    pub started_at: String,
    /// RFC 3339 date-time.
    pub ended_at: String,
    pub url: String,
}

/// Handler for the request/response entry point.
///
/// Rows are created depth first: the assessment, then per page the section,
/// its items and each item's choices. A failure part way leaves whatever was
/// already created in place.
pub struct ParseSheetsHandler {
    assembler: Arc<TreeAssembler>,
    store: Arc<dyn AssessmentStore>,
}

impl ParseSheetsHandler {
    pub fn new(assembler: Arc<TreeAssembler>, store: Arc<dyn AssessmentStore>) -> Self {
        Self { assembler, store }
    }

    pub async fn handle(&self, cmd: ParseSheetsCommand) -> Result<AssessmentRecord, IngestError> {
        // 1. Validate caller input before touching any collaborator
        let details = AssessmentDetails::parse(
            cmd.title,
            cmd.price,
            cmd.status,
            &cmd.started_at,
            &cmd.ended_at,
        )?;
        let spreadsheet = spreadsheet_id_from_url(&cmd.url)?;

        // 2. Create the assessment root
        let assessment = self
            .store
            .create_assessment(&details)
            .await
            .map_err(IngestError::Persistence)?;

        // 3. Persist every section as it is assembled
        let mut sink = PersistingSink {
            store: self.store.as_ref(),
            assessment,
        };
        if let Err(e) = self.assembler.assemble(&spreadsheet, &mut sink).await {
            warn!(
                assessment_id = %sink.assessment.id,
                sections = sink.assessment.sections.len(),
                error = %e,
                "Ingestion aborted; stored rows are kept"
            );
            return Err(e);
        }

        info!(
            assessment_id = %sink.assessment.id,
            spreadsheet = %spreadsheet,
            sections = sink.assessment.sections.len(),
            "Assessment created from spreadsheet"
        );

        Ok(sink.assessment)
    }
}

/// Stores each section, then its items, then each item's choices.
struct PersistingSink<'a> {
    store: &'a dyn AssessmentStore,
    assessment: AssessmentRecord,
}

#[async_trait]
impl SectionSink for PersistingSink<'_> {
    async fn accept(&mut self, section: SectionDraft) -> Result<(), IngestError> {
        let mut section_record = self
            .store
            .create_section(&self.assessment.id, &section.title, section.order)
            .await
            .map_err(IngestError::Persistence)?;

        for item in section.items {
            let mut item_record = self
                .store
                .create_item(&section_record.id, &item.content, item.order)
                .await
                .map_err(IngestError::Persistence)?;

            for choice in &item.choices {
                let choice_record = self
                    .store
                    .create_choice(&item_record.id, choice)
                    .await
                    .map_err(IngestError::Persistence)?;
                item_record.choices.push(choice_record);
            }

            section_record.items.push(item_record);
        }

        self.assessment.sections.push(section_record);
        Ok(())
    }
}
