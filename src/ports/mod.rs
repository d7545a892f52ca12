//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the ingestion core and the outside world. Adapters implement these ports.
//!
//! - `SpreadsheetProvider` - Reads page metadata and cell values
//! - `AssessmentStore` - Persists the assessment tree row by row
//! - `AssessmentForwarder` - Sends a finished draft to the storage service
//! - `MessageQueue` - Work queue feeding the asynchronous entry point

mod assessment_forwarder;
mod assessment_store;
mod message_queue;
mod spreadsheet_provider;

pub use assessment_forwarder::AssessmentForwarder;
pub use assessment_store::AssessmentStore;
pub use message_queue::{Delivery, MessageQueue, QueueError};
pub use spreadsheet_provider::{SheetProperties, SpreadsheetProvider};
