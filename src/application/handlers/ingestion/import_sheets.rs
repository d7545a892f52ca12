//! ImportSheetsHandler - queue-driven ingestion that forwards the finished tree.

use std::sync::Arc;
use tracing::info;

use crate::application::assembler::{CollectingSink, TreeAssembler};
use crate::domain::assessment::{AssessmentDetails, AssessmentDraft, IngestError};
use crate::domain::sheet::spreadsheet_id_from_url;
use crate::ports::AssessmentForwarder;

/// Command carried by a queue message.
#[derive(Debug, Clone)]
pub struct ImportSheetsCommand {
    /// Caller's correlation id, logged but not interpreted.
    pub process_id: String,
    pub title: String,
    pub price: String,
    pub status: String,
    pub started_at: String,
    pub ended_at: String,
    pub url: String,
}

/// Handler for the message-driven entry point.
///
/// Nothing is stored locally: the complete draft is assembled first and then
/// forwarded in a single call, so a failure before forwarding has no side
/// effects.
pub struct ImportSheetsHandler {
    assembler: Arc<TreeAssembler>,
    forwarder: Arc<dyn AssessmentForwarder>,
}

impl ImportSheetsHandler {
    pub fn new(assembler: Arc<TreeAssembler>, forwarder: Arc<dyn AssessmentForwarder>) -> Self {
        Self {
            assembler,
            forwarder,
        }
    }

    pub async fn handle(&self, cmd: ImportSheetsCommand) -> Result<AssessmentDraft, IngestError> {
        let details = AssessmentDetails::parse(
            cmd.title,
            cmd.price,
            cmd.status,
            &cmd.started_at,
            &cmd.ended_at,
        )?;
        let spreadsheet = spreadsheet_id_from_url(&cmd.url)?;

        let mut sink = CollectingSink::default();
        self.assembler.assemble(&spreadsheet, &mut sink).await?;

        let mut draft = AssessmentDraft::new(details);
        draft.sections = sink.sections;

        self.forwarder
            .forward(&draft)
            .await
            .map_err(IngestError::Forwarding)?;

        info!(
            process_id = %cmd.process_id,
            spreadsheet = %spreadsheet,
            sections = draft.sections.len(),
            items = draft.item_count(),
            "Assessment draft forwarded"
        );

        Ok(draft)
    }
}
