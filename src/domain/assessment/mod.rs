//! Assessment domain - the tree built from a question sheet.
//!
//! An assessment holds sections (one per sheet page), a section holds items
//! (questions) and an item holds choices (options), exactly one of which is
//! correct.

mod details;
mod draft;
mod errors;
mod records;

pub use details::AssessmentDetails;
pub use draft::{AssessmentDraft, ChoiceDraft, ItemDraft, SectionDraft};
pub use errors::IngestError;
pub use records::{AssessmentRecord, ChoiceRecord, ItemRecord, SectionRecord};
