//! Ingestion handlers - the two entry points into the tree assembler.

mod import_sheets;
mod parse_sheets;

pub use import_sheets::{ImportSheetsCommand, ImportSheetsHandler};
pub use parse_sheets::{ParseSheetsCommand, ParseSheetsHandler};
