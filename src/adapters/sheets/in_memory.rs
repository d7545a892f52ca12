//! In-memory spreadsheet provider for tests and local runs.
//!
//! # Panics
//!
//! Methods may panic if internal locks are poisoned. This adapter should
//! NOT be used in production.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::foundation::{DomainError, ErrorCode, SpreadsheetId};
use crate::domain::sheet::SheetRow;
use crate::ports::{SheetProperties, SpreadsheetProvider};

#[derive(Debug, Clone)]
struct StoredSheet {
    properties: SheetProperties,
    rows: Vec<SheetRow>,
}

/// Spreadsheet provider backed by in-process data.
///
/// Records every range requested so tests can assert on fetch behaviour.
#[derive(Debug, Default)]
pub struct InMemorySpreadsheetProvider {
    documents: HashMap<String, Vec<StoredSheet>>,
    fetched: Mutex<Vec<(String, String)>>,
}

impl InMemorySpreadsheetProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a page sized to fit its rows (four columns).
    pub fn with_sheet(self, document: &str, title: &str, rows: Vec<SheetRow>) -> Self {
        let row_count = rows.len() as u32 + 1;
        self.with_sized_sheet(document, title, row_count, 4, rows)
    }

    /// Adds a page with explicit grid dimensions.
    pub fn with_sized_sheet(
        mut self,
        document: &str,
        title: &str,
        row_count: u32,
        column_count: u32,
        rows: Vec<SheetRow>,
    ) -> Self {
        self.documents
            .entry(document.to_string())
            .or_default()
            .push(StoredSheet {
                properties: SheetProperties::new(title, row_count, column_count),
                rows,
            });
        self
    }

    /// Every `(sheet, range)` fetched so far, in call order.
    pub fn fetched_ranges(&self) -> Vec<(String, String)> {
        self.fetched
            .lock()
            .expect("InMemorySpreadsheetProvider: fetched lock poisoned")
            .clone()
    }

    fn document(&self, spreadsheet: &SpreadsheetId) -> Result<&Vec<StoredSheet>, DomainError> {
        self.documents.get(spreadsheet.as_str()).ok_or_else(|| {
            DomainError::new(
                ErrorCode::SpreadsheetProviderError,
                format!("unable to retrieve spreadsheet: {} not found", spreadsheet),
            )
        })
    }
}

#[async_trait]
impl SpreadsheetProvider for InMemorySpreadsheetProvider {
    async fn list_sheets(
        &self,
        spreadsheet: &SpreadsheetId,
    ) -> Result<Vec<SheetProperties>, DomainError> {
        Ok(self
            .document(spreadsheet)?
            .iter()
            .map(|s| s.properties.clone())
            .collect())
    }

    async fn fetch_rows(
        &self,
        spreadsheet: &SpreadsheetId,
        sheet: &str,
        range: &str,
    ) -> Result<Vec<SheetRow>, DomainError> {
        self.fetched
            .lock()
            .expect("InMemorySpreadsheetProvider: fetched lock poisoned")
            .push((sheet.to_string(), range.to_string()));

        self.document(spreadsheet)?
            .iter()
            .find(|s| s.properties.title == sheet)
            .map(|s| s.rows.clone())
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::SpreadsheetProviderError,
                    format!("unable to retrieve data from sheet {}", sheet),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lists_sheets_in_insertion_order() {
        let provider = InMemorySpreadsheetProvider::new()
            .with_sheet("doc", "B", Vec::new())
            .with_sheet("doc", "A", Vec::new());
        let id = SpreadsheetId::new("doc").unwrap();

        let titles: Vec<String> = provider
            .list_sheets(&id)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.title)
            .collect();

        assert_eq!(titles, vec!["B", "A"]);
    }

    #[tokio::test]
    async fn unknown_sheet_is_a_provider_error() {
        let provider = InMemorySpreadsheetProvider::new().with_sheet("doc", "A", Vec::new());
        let id = SpreadsheetId::new("doc").unwrap();

        let err = provider.fetch_rows(&id, "Z", "A2:D2").await.unwrap_err();

        assert_eq!(err.code, ErrorCode::SpreadsheetProviderError);
        assert_eq!(provider.fetched_ranges().len(), 1);
    }
}
