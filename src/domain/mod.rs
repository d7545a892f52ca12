//! Domain layer - pure ingestion logic with no I/O.

pub mod assessment;
pub mod foundation;
pub mod sheet;
