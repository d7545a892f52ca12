//! Spreadsheet URL parsing.

use once_cell::sync::Lazy;
use regex::Regex;

use super::SheetFormatError;
use crate::domain::foundation::SpreadsheetId;

static SPREADSHEET_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/spreadsheets/d/([a-zA-Z0-9_-]+)/edit").expect("spreadsheet URL pattern is valid")
});

/// Extracts the document id from a `.../spreadsheets/d/<id>/edit` URL.
pub fn spreadsheet_id_from_url(url: &str) -> Result<SpreadsheetId, SheetFormatError> {
    SPREADSHEET_URL
        .captures(url)
        .and_then(|caps| caps.get(1))
        .and_then(|id| SpreadsheetId::new(id.as_str()).ok())
        .ok_or_else(|| SheetFormatError::InvalidSpreadsheetUrl {
            url: url.to_string(),
        })
}
