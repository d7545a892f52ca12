//! Redis-backed reliable queue.
//!
//! Producers `RPUSH` onto the queue list. Receiving atomically moves the head
//! of the queue onto a processing list owned by this consumer (`BLMOVE`), so
//! a message is never lost between receive and settle:
//!
//! - ack: `LREM` from the processing list
//! - nack with requeue: `LREM` + `RPUSH` back onto the queue, in one transaction
//! - nack without requeue: `LREM` + `RPUSH` onto `<queue>:dead`
//!
//! Messages left on the processing list by a crashed consumer are moved back
//! by [`RedisQueue::recover_stranded`].
//!
//! Any Redis error drops the cached connection; the next call reconnects.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::ports::{Delivery, MessageQueue, QueueError};

/// Names of the lists backing one consumer.
#[derive(Debug, Clone)]
pub struct RedisQueueConfig {
    /// Queue producers push onto.
    pub queue: String,
    /// Identifies this consumer's processing list.
    pub consumer: String,
    /// Upper bound for opening a connection.
    pub connect_timeout: Duration,
}

impl RedisQueueConfig {
    pub fn new(queue: impl Into<String>, consumer: impl Into<String>) -> Self {
        Self {
            queue: queue.into(),
            consumer: consumer.into(),
            connect_timeout: Duration::from_secs(5),
        }
    }

    /// Sets the connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// List holding messages received but not yet settled.
    pub fn processing_list(&self) -> String {
        format!("{}:processing:{}", self.queue, self.consumer)
    }

    /// List holding messages nacked without requeue.
    pub fn dead_letter_list(&self) -> String {
        format!("{}:dead", self.queue)
    }
}

/// Reliable queue on Redis lists.
pub struct RedisQueue {
    client: Client,
    config: RedisQueueConfig,
    conn: Mutex<Option<MultiplexedConnection>>,
}

impl RedisQueue {
    /// Creates the queue. No connection is opened until first use.
    pub fn new(redis_url: &str, config: RedisQueueConfig) -> Result<Self, QueueError> {
        let client = Client::open(redis_url)
            .map_err(|e| QueueError::Connection(format!("invalid redis url: {}", e)))?;
        Ok(Self {
            client,
            config,
            conn: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &RedisQueueConfig {
        &self.config
    }

    async fn connection(&self) -> Result<MultiplexedConnection, QueueError> {
        let mut guard = self.conn.lock().await;
        if let Some(conn) = guard.as_ref() {
            return Ok(conn.clone());
        }

        let conn = tokio::time::timeout(
            self.config.connect_timeout,
            self.client.get_multiplexed_tokio_connection(),
        )
        .await
        .map_err(|_| {
            QueueError::Connection(format!(
                "timed out after {}s connecting to redis",
                self.config.connect_timeout.as_secs()
            ))
        })?
        .map_err(|e| QueueError::Connection(e.to_string()))?;
        info!(queue = %self.config.queue, consumer = %self.config.consumer, "Connected to Redis");
        *guard = Some(conn.clone());
        Ok(conn)
    }

    /// Forgets the cached connection and converts the error.
    async fn dropped(&self, e: redis::RedisError) -> QueueError {
        *self.conn.lock().await = None;
        if e.is_io_error() || e.is_connection_dropped() || e.is_connection_refusal() {
            QueueError::Connection(e.to_string())
        } else {
            QueueError::Command(e.to_string())
        }
    }

    /// Moves every message stranded on this consumer's processing list back
    /// to the head of the queue. Returns how many were moved.
    pub async fn recover_stranded(&self) -> Result<usize, QueueError> {
        let mut conn = self.connection().await?;
        let processing = self.config.processing_list();
        let mut moved = 0;

        loop {
            let result: Result<Option<String>, _> = redis::cmd("LMOVE")
                .arg(&processing)
                .arg(&self.config.queue)
                .arg("RIGHT")
                .arg("LEFT")
                .query_async(&mut conn)
                .await;
            match result {
                Ok(Some(_)) => moved += 1,
                Ok(None) => break,
                Err(e) => return Err(self.dropped(e).await),
            }
        }

        if moved > 0 {
            warn!(queue = %self.config.queue, moved, "Requeued stranded messages");
        }
        Ok(moved)
    }

    async fn remove_and_push(&self, delivery: &Delivery, target: &str) -> Result<(), QueueError> {
        let mut conn = self.connection().await?;
        let result: Result<(), _> = redis::pipe()
            .atomic()
            .lrem(self.config.processing_list(), 1, &delivery.payload)
            .ignore()
            .rpush(target, &delivery.payload)
            .ignore()
            .query_async(&mut conn)
            .await;
        match result {
            Ok(()) => Ok(()),
            Err(e) => Err(self.dropped(e).await),
        }
    }
}

#[async_trait]
impl MessageQueue for RedisQueue {
    async fn receive(&self, timeout: Duration) -> Result<Option<Delivery>, QueueError> {
        let mut conn = self.connection().await?;
        let result: Result<Option<String>, _> = redis::cmd("BLMOVE")
            .arg(&self.config.queue)
            .arg(self.config.processing_list())
            .arg("LEFT")
            .arg("RIGHT")
            .arg(timeout.as_secs_f64())
            .query_async(&mut conn)
            .await;

        match result {
            Ok(payload) => Ok(payload.map(Delivery::new)),
            Err(e) => Err(self.dropped(e).await),
        }
    }

    async fn ack(&self, delivery: &Delivery) -> Result<(), QueueError> {
        let mut conn = self.connection().await?;
        let result: Result<i64, _> = conn
            .lrem(self.config.processing_list(), 1, &delivery.payload)
            .await;
        match result {
            Ok(removed) => {
                if removed == 0 {
                    debug!(queue = %self.config.queue, "Acked message was not in flight");
                }
                Ok(())
            }
            Err(e) => Err(self.dropped(e).await),
        }
    }

    async fn nack(&self, delivery: &Delivery, requeue: bool) -> Result<(), QueueError> {
        if requeue {
            self.remove_and_push(delivery, &self.config.queue).await
        } else {
            self.remove_and_push(delivery, &self.config.dead_letter_list())
                .await
        }
    }

    async fn publish(&self, payload: &str) -> Result<(), QueueError> {
        let mut conn = self.connection().await?;
        let result: Result<i64, _> = conn.rpush(&self.config.queue, payload).await;
        match result {
            Ok(_) => Ok(()),
            Err(e) => Err(self.dropped(e).await),
        }
    }
}

impl std::fmt::Debug for RedisQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisQueue")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_names_derive_from_queue_and_consumer() {
        let config = RedisQueueConfig::new("parsing-sheets-queue", "worker-1");

        assert_eq!(
            config.processing_list(),
            "parsing-sheets-queue:processing:worker-1"
        );
        assert_eq!(config.dead_letter_list(), "parsing-sheets-queue:dead");
    }

    #[test]
    fn invalid_url_is_a_connection_error() {
        let err = RedisQueue::new("not a url", RedisQueueConfig::new("q", "c")).unwrap_err();
        assert!(matches!(err, QueueError::Connection(_)));
    }

    #[tokio::test]
    async fn unreachable_server_fails_receive_with_connection_error() {
        let queue = RedisQueue::new("redis://127.0.0.1:1/", RedisQueueConfig::new("q", "c")).unwrap();

        let err = queue.receive(Duration::from_millis(10)).await.unwrap_err();

        assert!(matches!(err, QueueError::Connection(_)));
    }

    // Round trips against a live server:
    //
    // #[tokio::test]
    // #[ignore] // Run with: cargo test -- --ignored
    // async fn test_redis_queue_round_trip() {
    //     let queue = RedisQueue::new("redis://127.0.0.1/", RedisQueueConfig::new("q", "c")).unwrap();
    //     queue.publish("a").await.unwrap();
    //     let delivery = queue.receive(Duration::from_secs(1)).await.unwrap().unwrap();
    //     queue.ack(&delivery).await.unwrap();
    // }
}
