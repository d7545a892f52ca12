//! Sheet parsing - from raw grid rows to validated questions.
//!
//! - `row` classifies a single row
//! - `accumulator` groups classified rows into questions
//! - `answer` resolves the answer letter to the correct option
//! - `grid` computes which range of a page to fetch
//! - `url` extracts the document id from a sheet URL

mod accumulator;
mod answer;
mod errors;
mod grid;
mod row;
mod url;

pub use accumulator::{scan_items, ItemScan, RowAccumulator};
pub use answer::{answer_position, resolve_choices};
pub use errors::SheetFormatError;
pub use grid::{column_letter, data_range, FIRST_DATA_ROW, README_SHEET};
pub use row::{RowKind, SheetRow};
pub use url::spreadsheet_id_from_url;
