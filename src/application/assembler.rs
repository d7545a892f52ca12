//! TreeAssembler - walks a spreadsheet page by page and emits sections.
//!
//! Both entry points share this walk. What happens to each finished section
//! is decided by the `SectionSink` they pass in: the HTTP path persists it
//! immediately, the queue path collects it for forwarding.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::assessment::{IngestError, SectionDraft};
use crate::domain::foundation::SpreadsheetId;
use crate::domain::sheet::{data_range, scan_items, SheetFormatError, README_SHEET};
use crate::ports::SpreadsheetProvider;

/// Receives sections in page order as they are assembled.
///
/// An error from the sink aborts the walk; sections already accepted stay
/// accepted.
#[async_trait]
pub trait SectionSink: Send {
    async fn accept(&mut self, section: SectionDraft) -> Result<(), IngestError>;
}

/// Sink that keeps every section in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub sections: Vec<SectionDraft>,
}

#[async_trait]
impl SectionSink for CollectingSink {
    async fn accept(&mut self, section: SectionDraft) -> Result<(), IngestError> {
        self.sections.push(section);
        Ok(())
    }
}

/// Builds sections from the pages of a spreadsheet.
pub struct TreeAssembler {
    provider: Arc<dyn SpreadsheetProvider>,
}

impl TreeAssembler {
    pub fn new(provider: Arc<dyn SpreadsheetProvider>) -> Self {
        Self { provider }
    }

    /// Walks every page in document order and hands each section to `sink`.
    ///
    /// The `README` page is skipped. A section's order is the page's index in
    /// the provider's page list, counting skipped pages, so a leading README
    /// makes the first section order 1. Returns the number of sections
    /// accepted.
    pub async fn assemble(
        &self,
        spreadsheet: &SpreadsheetId,
        sink: &mut dyn SectionSink,
    ) -> Result<usize, IngestError> {
        let sheets = self
            .provider
            .list_sheets(spreadsheet)
            .await
            .map_err(IngestError::Provider)?;

        let mut accepted = 0;
        for (index, sheet) in sheets.iter().enumerate() {
            if sheet.title == README_SHEET {
                debug!(spreadsheet = %spreadsheet, index, "Skipping README sheet");
                continue;
            }

            let range = data_range(sheet.row_count, sheet.column_count);
            let rows = self
                .provider
                .fetch_rows(spreadsheet, &sheet.title, &range)
                .await
                .map_err(|e| IngestError::Provider(e.with_detail("sheet", sheet.title.as_str())))?;

            if rows.is_empty() {
                return Err(IngestError::in_sheet(
                    sheet.title.as_str(),
                    SheetFormatError::EmptySheet {
                        sheet: sheet.title.clone(),
                    },
                ));
            }

            let row_count = rows.len();
            let items =
                scan_items(rows).map_err(|e| IngestError::in_sheet(sheet.title.as_str(), e))?;

            info!(
                spreadsheet = %spreadsheet,
                sheet = %sheet.title,
                order = index,
                rows = row_count,
                items = items.len(),
                "Assembled section"
            );

            sink.accept(SectionDraft {
                title: sheet.title.clone(),
                order: index as i32,
                items,
            })
            .await?;
            accepted += 1;
        }

        Ok(accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sheets::InMemorySpreadsheetProvider;
    use crate::domain::foundation::ErrorCode;
    use crate::domain::sheet::SheetRow;

    fn header(number: &str, question: &str, answer: &str, option: &str) -> SheetRow {
        SheetRow::new([number, question, answer, option])
    }

    fn option(text: &str) -> SheetRow {
        SheetRow::new(["", "", "", text])
    }

    fn spreadsheet() -> SpreadsheetId {
        SpreadsheetId::new("doc-1").unwrap()
    }

    fn assembler(provider: InMemorySpreadsheetProvider) -> TreeAssembler {
        TreeAssembler::new(Arc::new(provider))
    }

    #[tokio::test]
    async fn assembles_one_section_per_page_in_order() {
        let provider = InMemorySpreadsheetProvider::new()
            .with_sheet(
                "doc-1",
                "Math",
                vec![header("1", "2 + 2?", "B", "3"), option("4")],
            )
            .with_sheet(
                "doc-1",
                "Physics",
                vec![header("1", "Unit of force?", "A", "Newton"), option("Joule")],
            );
        let mut sink = CollectingSink::default();

        let count = assembler(provider)
            .assemble(&spreadsheet(), &mut sink)
            .await
            .unwrap();

        assert_eq!(count, 2);
        let titles: Vec<&str> = sink.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Math", "Physics"]);
        let orders: Vec<i32> = sink.sections.iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![0, 1]);
        assert_eq!(sink.sections[0].items[0].correct_choice().unwrap().content, "4");
    }

    #[tokio::test]
    async fn readme_is_skipped_but_keeps_its_index() {
        let provider = InMemorySpreadsheetProvider::new()
            .with_sheet("doc-1", "README", vec![SheetRow::new(["anything", "goes"])])
            .with_sheet("doc-1", "Math", vec![header("1", "Q", "A", "a")])
            .with_sheet("doc-1", "Biology", vec![header("1", "Q", "A", "a")]);
        let mut sink = CollectingSink::default();

        assembler(provider)
            .assemble(&spreadsheet(), &mut sink)
            .await
            .unwrap();

        assert!(sink.sections.iter().all(|s| s.title != "README"));
        let orders: Vec<i32> = sink.sections.iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![1, 2]);
    }

    #[tokio::test]
    async fn readme_in_the_middle_leaves_a_gap() {
        let provider = InMemorySpreadsheetProvider::new()
            .with_sheet("doc-1", "Math", vec![header("1", "Q", "A", "a")])
            .with_sheet("doc-1", "README", Vec::new())
            .with_sheet("doc-1", "Biology", vec![header("1", "Q", "A", "a")]);
        let mut sink = CollectingSink::default();

        assembler(provider)
            .assemble(&spreadsheet(), &mut sink)
            .await
            .unwrap();

        let orders: Vec<i32> = sink.sections.iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![0, 2]);
    }

    #[tokio::test]
    async fn fetches_the_data_range_from_grid_dimensions() {
        let provider = Arc::new(InMemorySpreadsheetProvider::new().with_sized_sheet(
            "doc-1",
            "Math",
            120,
            6,
            vec![header("1", "Q", "A", "a")],
        ));
        let assembler = TreeAssembler::new(provider.clone());

        assembler
            .assemble(&spreadsheet(), &mut CollectingSink::default())
            .await
            .unwrap();

        assert_eq!(
            provider.fetched_ranges(),
            vec![("Math".to_string(), "A2:F120".to_string())]
        );
    }

    #[tokio::test]
    async fn empty_page_fails_the_run() {
        let provider = InMemorySpreadsheetProvider::new()
            .with_sheet("doc-1", "Math", vec![header("1", "Q", "A", "a")])
            .with_sheet("doc-1", "Empty", Vec::new());
        let mut sink = CollectingSink::default();

        let err = assembler(provider)
            .assemble(&spreadsheet(), &mut sink)
            .await
            .unwrap_err();

        match err {
            IngestError::SheetFormat { sheet, source } => {
                assert_eq!(sheet, "Empty");
                assert!(matches!(source, SheetFormatError::EmptySheet { .. }));
            }
            other => panic!("Expected SheetFormat error, got {:?}", other),
        }
        assert_eq!(sink.sections.len(), 1, "earlier sections stay accepted");
    }

    #[tokio::test]
    async fn format_error_stops_before_later_pages() {
        let provider = Arc::new(
            InMemorySpreadsheetProvider::new()
                .with_sheet("doc-1", "Broken", vec![header("1", "Q", "Z", "a")])
                .with_sheet("doc-1", "Never", vec![header("1", "Q", "A", "a")]),
        );
        let assembler = TreeAssembler::new(provider.clone());

        let err = assembler
            .assemble(&spreadsheet(), &mut CollectingSink::default())
            .await
            .unwrap_err();

        assert!(err.is_client_error());
        assert_eq!(provider.fetched_ranges().len(), 1);
    }

    #[tokio::test]
    async fn unknown_spreadsheet_is_a_provider_error() {
        let provider = InMemorySpreadsheetProvider::new();

        let err = assembler(provider)
            .assemble(&spreadsheet(), &mut CollectingSink::default())
            .await
            .unwrap_err();

        match err {
            IngestError::Provider(cause) => {
                assert_eq!(cause.code, ErrorCode::SpreadsheetProviderError)
            }
            other => panic!("Expected Provider error, got {:?}", other),
        }
    }

    struct FailingSink;

    #[async_trait]
    impl SectionSink for FailingSink {
        async fn accept(&mut self, _section: SectionDraft) -> Result<(), IngestError> {
            Err(IngestError::Persistence(crate::domain::foundation::DomainError::new(
                ErrorCode::DatabaseError,
                "disk full",
            )))
        }
    }

    #[tokio::test]
    async fn sink_errors_abort_the_walk() {
        let provider = Arc::new(
            InMemorySpreadsheetProvider::new()
                .with_sheet("doc-1", "A", vec![header("1", "Q", "A", "a")])
                .with_sheet("doc-1", "B", vec![header("1", "Q", "A", "a")]),
        );
        let assembler = TreeAssembler::new(provider.clone());

        let err = assembler
            .assemble(&spreadsheet(), &mut FailingSink)
            .await
            .unwrap_err();

        assert!(matches!(err, IngestError::Persistence(_)));
        assert_eq!(provider.fetched_ranges().len(), 1);
    }
}
