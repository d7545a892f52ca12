//! Assessment Ingest - builds assessment trees from question spreadsheets.
//!
//! Each spreadsheet page becomes a section, and the rows on a page are
//! grouped into items with their choices. The tree is either stored
//! directly (HTTP entry point) or forwarded to the storage service
//! (queue entry point).

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
