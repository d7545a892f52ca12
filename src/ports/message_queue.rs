//! MessageQueue port - at-least-once delivery of ingestion requests.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by the queue transport itself.
#[derive(Debug, Clone, Error)]
pub enum QueueError {
    #[error("Queue connection failed: {0}")]
    Connection(String),

    #[error("Queue command failed: {0}")]
    Command(String),
}

/// A message taken from the queue and not yet settled.
///
/// Every delivery must end in exactly one `ack` or `nack`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub payload: String,
}

impl Delivery {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
        }
    }
}

/// Port for a durable work queue.
#[async_trait]
pub trait MessageQueue: Send + Sync {
    /// Waits up to `timeout` for the next message.
    async fn receive(&self, timeout: Duration) -> Result<Option<Delivery>, QueueError>;

    /// Settles a delivery as processed.
    async fn ack(&self, delivery: &Delivery) -> Result<(), QueueError>;

    /// Settles a delivery as failed. With `requeue` the message goes back on
    /// the queue for redelivery; without it the message is dead-lettered.
    async fn nack(&self, delivery: &Delivery, requeue: bool) -> Result<(), QueueError>;

    /// Appends a message to the queue.
    async fn publish(&self, payload: &str) -> Result<(), QueueError>;
}
