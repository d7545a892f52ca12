//! Queue adapters - the asynchronous ingestion entry point.
//!
//! - `RedisQueue` - Reliable queue on Redis lists
//! - `InMemoryQueue` - Process-local queue for tests
//! - `QueueConsumer` - Pulls import requests and drives the import handler

mod backoff;
mod consumer;
mod in_memory;
mod message;
mod redis_queue;

pub use backoff::Backoff;
pub use consumer::{Outcome, QueueConsumer, QueueConsumerConfig};
pub use in_memory::InMemoryQueue;
pub use message::ImportSheetsMessage;
pub use redis_queue::{RedisQueue, RedisQueueConfig};
