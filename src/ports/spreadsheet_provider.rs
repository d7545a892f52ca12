//! SpreadsheetProvider port - read access to a spreadsheet document.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, SpreadsheetId};
use crate::domain::sheet::SheetRow;

/// Title and grid dimensions of one page, as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetProperties {
    pub title: String,
    /// Number of rows in the page grid, including the header row.
    pub row_count: u32,
    /// Number of columns in the page grid.
    pub column_count: u32,
}

impl SheetProperties {
    pub fn new(title: impl Into<String>, row_count: u32, column_count: u32) -> Self {
        Self {
            title: title.into(),
            row_count,
            column_count,
        }
    }
}

/// Port for fetching spreadsheet structure and cell values.
///
/// Failures are reported with `ErrorCode::SpreadsheetProviderError`.
#[async_trait]
pub trait SpreadsheetProvider: Send + Sync {
    /// Lists the document's pages in document order.
    async fn list_sheets(
        &self,
        spreadsheet: &SpreadsheetId,
    ) -> Result<Vec<SheetProperties>, DomainError>;

    /// Fetches the formatted cell values of `range` (A1 notation) on `sheet`.
    ///
    /// Trailing empty rows and cells may be omitted by the provider.
    async fn fetch_rows(
        &self,
        spreadsheet: &SpreadsheetId,
        sheet: &str,
        range: &str,
    ) -> Result<Vec<SheetRow>, DomainError>;
}
