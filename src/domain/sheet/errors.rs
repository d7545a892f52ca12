//! Grid format errors.
//!
//! Every variant here is caused by the contents of the spreadsheet or the URL
//! that points at it, never by a collaborator failing.

use thiserror::Error;

/// A problem with the shape or contents of the question grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SheetFormatError {
    /// Row is neither an item header nor a continuation option.
    #[error(
        "data format was wrong at row {row}: number {number:?}, question {question:?}, answer {answer:?}, option {option:?}"
    )]
    MalformedRow {
        row: usize,
        number: String,
        question: String,
        answer: String,
        option: String,
    },

    /// Continuation option seen before any item header on the page.
    #[error("option {option:?} at row {row} does not belong to any question")]
    OrphanOption { row: usize, option: String },

    /// Row-number cell of an item header is not an integer.
    #[error("question number {number:?} at row {row} is not an integer")]
    InvalidItemNumber { row: usize, number: String },

    /// Answer letter points past the end of the item's choices.
    #[error(
        "answer {answer:?} for question {number} at row {row} is out of range for {choices} option(s)"
    )]
    AnswerOutOfRange {
        row: usize,
        number: i32,
        answer: String,
        choices: usize,
    },

    /// Page returned no data rows.
    #[error("no data found in sheet {sheet:?}")]
    EmptySheet { sheet: String },

    /// URL does not have the `/spreadsheets/d/<id>/edit` shape.
    #[error("URL is not a valid Google Sheets URL: {url:?}")]
    InvalidSpreadsheetUrl { url: String },
}
