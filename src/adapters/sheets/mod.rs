//! Spreadsheet provider adapters.
//!
//! - `GoogleSheetsProvider` - Google Sheets v4 REST API with service-account auth
//! - `InMemorySpreadsheetProvider` - Fixed data for tests

mod google_sheets;
mod in_memory;
mod service_account;

pub use google_sheets::{GoogleSheetsConfig, GoogleSheetsProvider};
pub use in_memory::InMemorySpreadsheetProvider;
pub use service_account::{ServiceAccountKey, ServiceAccountTokenSource, SHEETS_READONLY_SCOPE};
