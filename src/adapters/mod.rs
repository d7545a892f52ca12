//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `sheets` - Spreadsheet providers (Google Sheets, in-memory)
//! - `postgres` - Assessment store on PostgreSQL
//! - `storage` - In-memory assessment store
//! - `forwarding` - Delivery of drafts to the storage service
//! - `queue` - Message queues and the import consumer
//! - `http` - REST endpoints

pub mod forwarding;
pub mod http;
pub mod postgres;
pub mod queue;
pub mod sheets;
pub mod storage;

pub use forwarding::{HttpForwarder, HttpForwarderConfig, RecordingForwarder};
pub use http::{build_router, IngestionHandlers, RouterConfig};
pub use postgres::PostgresAssessmentStore;
pub use queue::{InMemoryQueue, QueueConsumer, QueueConsumerConfig, RedisQueue, RedisQueueConfig};
pub use sheets::{GoogleSheetsConfig, GoogleSheetsProvider, InMemorySpreadsheetProvider};
pub use storage::InMemoryAssessmentStore;
