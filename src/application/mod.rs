//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Both entry points drive the same `TreeAssembler`.

pub mod assembler;
pub mod handlers;

pub use assembler::{CollectingSink, SectionSink, TreeAssembler};
pub use handlers::{
    ImportSheetsCommand, ImportSheetsHandler, ParseSheetsCommand, ParseSheetsHandler,
};
