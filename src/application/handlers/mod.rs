//! Application handlers.
//!
//! Command handlers that orchestrate the ingestion domain and its ports.

pub mod ingestion;

pub use ingestion::{
    ImportSheetsCommand, ImportSheetsHandler, ParseSheetsCommand, ParseSheetsHandler,
};
