//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresAssessmentStore` - Inserts the assessment tree into the
//!   `tryouts`, `modules`, `questions` and `options` tables

mod assessment_store;

pub use assessment_store::PostgresAssessmentStore;
