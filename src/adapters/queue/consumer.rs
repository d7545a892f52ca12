//! QueueConsumer - background service for the asynchronous entry point.
//!
//! Each delivered message is one import run. Deliveries are processed one at
//! a time and every delivery is settled exactly once:
//!
//! | Result | Settlement |
//! |--------|------------|
//! | Draft forwarded | ack |
//! | Payload is not a valid import message | nack, dead-lettered |
//! | Any import failure | nack with requeue, then `retry_delay` pause |
//!
//! ## Broker failures
//!
//! A failed receive never stops the consumer. It waits with exponential
//! backoff and tries again; the queue adapter reconnects on that call.
//!
//! ## Graceful Shutdown
//!
//! The consumer stops between messages. A run in progress is finished and
//! settled before `run` returns.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;
use tracing::{debug, error, info, warn};

use super::backoff::Backoff;
use super::message::ImportSheetsMessage;
use crate::application::handlers::{ImportSheetsCommand, ImportSheetsHandler};
use crate::ports::{Delivery, MessageQueue, QueueError};

/// Configuration for the QueueConsumer service.
#[derive(Debug, Clone)]
pub struct QueueConsumerConfig {
    /// How long one receive blocks waiting for a message.
    pub poll_timeout: Duration,

    /// First reconnect delay after a broker failure.
    pub reconnect_initial_backoff: Duration,

    /// Upper bound for the reconnect delay.
    pub reconnect_max_backoff: Duration,

    /// Pause after requeueing a failed message.
    pub retry_delay: Duration,
}

impl Default for QueueConsumerConfig {
    fn default() -> Self {
        Self {
            poll_timeout: Duration::from_secs(5),
            reconnect_initial_backoff: Duration::from_millis(500),
            reconnect_max_backoff: Duration::from_secs(30),
            retry_delay: Duration::from_secs(1),
        }
    }
}

impl QueueConsumerConfig {
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    pub fn with_reconnect_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.reconnect_initial_backoff = initial;
        self.reconnect_max_backoff = max;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }
}

/// How a delivery was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Acked,
    Requeued,
    DeadLettered,
}

/// Pulls import requests off the queue and runs them.
pub struct QueueConsumer {
    queue: Arc<dyn MessageQueue>,
    handler: Arc<ImportSheetsHandler>,
    config: QueueConsumerConfig,
}

impl QueueConsumer {
    pub fn new(
        queue: Arc<dyn MessageQueue>,
        handler: Arc<ImportSheetsHandler>,
        config: QueueConsumerConfig,
    ) -> Self {
        Self {
            queue,
            handler,
            config,
        }
    }

    /// Runs until the shutdown signal turns true or its sender is dropped.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut backoff = Backoff::new(
            self.config.reconnect_initial_backoff,
            self.config.reconnect_max_backoff,
        );
        info!("Queue consumer started");

        loop {
            if *shutdown.borrow() {
                break;
            }

            let received = tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
                received = self.queue.receive(self.config.poll_timeout) => received,
            };

            match received {
                Ok(Some(delivery)) => {
                    backoff.reset();
                    if let Err(e) = self.process_delivery(&delivery).await {
                        warn!(error = %e, "Failed to settle delivery");
                    }
                }
                Ok(None) => backoff.reset(),
                Err(e) => {
                    let delay = backoff.next_delay();
                    warn!(
                        error = %e,
                        attempt = backoff.attempts(),
                        delay_ms = delay.as_millis() as u64,
                        "Broker unavailable; reconnecting after backoff"
                    );
                    tokio::select! {
                        _ = time::sleep(delay) => {}
                        changed = shutdown.changed() => {
                            if changed.is_err() {
                                break;
                            }
                        }
                    }
                }
            }
        }

        info!("Queue consumer stopped");
    }

    /// Receives and processes at most one message.
    ///
    /// Returns `Ok(None)` when nothing arrived within the poll timeout.
    pub async fn poll_once(&self) -> Result<Option<Outcome>, QueueError> {
        match self.queue.receive(self.config.poll_timeout).await? {
            Some(delivery) => self.process_delivery(&delivery).await.map(Some),
            None => Ok(None),
        }
    }

    /// Runs one delivery and settles it.
    pub async fn process_delivery(&self, delivery: &Delivery) -> Result<Outcome, QueueError> {
        let message = match ImportSheetsMessage::from_json(&delivery.payload) {
            Ok(message) => message,
            Err(e) => {
                error!(error = %e, "Undecodable import message; dead-lettering");
                self.queue.nack(delivery, false).await?;
                return Ok(Outcome::DeadLettered);
            }
        };

        let process_id = message.process_id.clone();
        debug!(process_id = %process_id, url = %message.url, "Import message received");

        match self.handler.handle(ImportSheetsCommand::from(message)).await {
            Ok(_) => {
                self.queue.ack(delivery).await?;
                Ok(Outcome::Acked)
            }
            Err(e) => {
                error!(
                    process_id = %process_id,
                    code = e.code(),
                    error = %e,
                    "Import failed; requeueing"
                );
                self.queue.nack(delivery, true).await?;
                time::sleep(self.config.retry_delay).await;
                Ok(Outcome::Requeued)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::forwarding::RecordingForwarder;
    use crate::adapters::queue::InMemoryQueue;
    use crate::adapters::sheets::InMemorySpreadsheetProvider;
    use crate::application::TreeAssembler;
    use crate::domain::sheet::SheetRow;
    use serde_json::json;

    const SHORT: Duration = Duration::from_millis(20);

    fn message(url: &str) -> String {
        json!({
            "processId": "p-1",
            "title": "Tryout 1",
            "price": "0",
            "status": "draft",
            "startedAt": "2024-05-01T08:00:00Z",
            "endedAt": "2024-05-01T10:00:00Z",
            "url": url
        })
        .to_string()
    }

    const URL: &str = "https://docs.google.com/spreadsheets/d/doc-1/edit";

    struct Fixture {
        queue: Arc<InMemoryQueue>,
        forwarder: Arc<RecordingForwarder>,
        consumer: QueueConsumer,
    }

    fn fixture(forwarder: RecordingForwarder) -> Fixture {
        let provider = InMemorySpreadsheetProvider::new().with_sheet(
            "doc-1",
            "Math",
            vec![
                SheetRow::new(["1", "2 + 2?", "B", "3"]),
                SheetRow::new(["", "", "", "4"]),
            ],
        );
        let assembler = Arc::new(TreeAssembler::new(Arc::new(provider)));
        let forwarder = Arc::new(forwarder);
        let handler = Arc::new(ImportSheetsHandler::new(assembler, forwarder.clone()));
        let queue = Arc::new(InMemoryQueue::new());
        let config = QueueConsumerConfig::default()
            .with_poll_timeout(SHORT)
            .with_reconnect_backoff(Duration::from_millis(1), Duration::from_millis(4))
            .with_retry_delay(Duration::from_millis(1));
        let consumer = QueueConsumer::new(queue.clone(), handler, config);
        Fixture {
            queue,
            forwarder,
            consumer,
        }
    }

    #[tokio::test]
    async fn successful_import_is_acked() {
        let f = fixture(RecordingForwarder::new());
        f.queue.publish(&message(URL)).await.unwrap();

        let outcome = f.consumer.poll_once().await.unwrap();

        assert_eq!(outcome, Some(Outcome::Acked));
        assert_eq!(f.queue.acked().len(), 1);
        assert!(f.queue.in_flight().is_empty());
        assert_eq!(f.forwarder.forwarded()[0].sections[0].title, "Math");
    }

    #[tokio::test]
    async fn failed_import_is_requeued() {
        let f = fixture(RecordingForwarder::failing());
        let payload = message(URL);
        f.queue.publish(&payload).await.unwrap();

        let outcome = f.consumer.poll_once().await.unwrap();

        assert_eq!(outcome, Some(Outcome::Requeued));
        assert_eq!(f.queue.pending(), vec![payload]);
        assert!(f.queue.in_flight().is_empty());
    }

    #[tokio::test]
    async fn format_errors_are_requeued_too() {
        let f = fixture(RecordingForwarder::new());
        f.queue
            .publish(&message("https://example.com/not-a-sheet"))
            .await
            .unwrap();

        let outcome = f.consumer.poll_once().await.unwrap();

        assert_eq!(outcome, Some(Outcome::Requeued));
        assert!(f.forwarder.forwarded().is_empty());
    }

    #[tokio::test]
    async fn undecodable_payload_is_dead_lettered() {
        let f = fixture(RecordingForwarder::new());
        f.queue.publish("{not json").await.unwrap();

        let outcome = f.consumer.poll_once().await.unwrap();

        assert_eq!(outcome, Some(Outcome::DeadLettered));
        assert_eq!(f.queue.dead_letters(), vec!["{not json"]);
        assert!(f.queue.pending().is_empty());
    }

    #[tokio::test]
    async fn empty_poll_returns_none() {
        let f = fixture(RecordingForwarder::new());
        assert_eq!(f.consumer.poll_once().await.unwrap(), None);
    }

    #[tokio::test]
    async fn run_survives_broker_failures_and_stops_on_shutdown() {
        let f = fixture(RecordingForwarder::new());
        f.queue.fail_next_receives(3);
        f.queue.publish(&message(URL)).await.unwrap();
        let (tx, rx) = watch::channel(false);
        let consumer = Arc::new(f.consumer);
        let runner = consumer.clone();

        let handle = tokio::spawn(async move { runner.run(rx).await });

        let deadline = time::Instant::now() + Duration::from_secs(5);
        while f.queue.acked().is_empty() && time::Instant::now() < deadline {
            time::sleep(Duration::from_millis(5)).await;
        }
        tx.send(true).unwrap();
        time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("consumer did not stop")
            .unwrap();

        assert_eq!(f.queue.acked().len(), 1);
        assert_eq!(f.forwarder.forwarded().len(), 1);
    }

    #[tokio::test]
    async fn run_stops_when_the_shutdown_sender_is_dropped() {
        let f = fixture(RecordingForwarder::new());
        let (tx, rx) = watch::channel(false);
        drop(tx);

        time::timeout(Duration::from_secs(5), f.consumer.run(rx))
            .await
            .expect("consumer did not stop");
    }
}
