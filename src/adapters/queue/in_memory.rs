//! In-memory message queue for tests.
//!
//! Mirrors the reliable-queue semantics of the Redis adapter: received
//! messages sit in an in-flight list until acked or nacked.
//!
//! # Panics
//!
//! Methods may panic if the internal lock is poisoned. This adapter should
//! NOT be used in production.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::Notify;

use crate::ports::{Delivery, MessageQueue, QueueError};

#[derive(Debug, Default)]
struct QueueState {
    ready: VecDeque<String>,
    in_flight: Vec<String>,
    dead: Vec<String>,
    acked: Vec<String>,
    injected_failures: u32,
}

impl QueueState {
    fn take_in_flight(&mut self, delivery: &Delivery) -> Result<String, QueueError> {
        let position = self
            .in_flight
            .iter()
            .position(|p| *p == delivery.payload)
            .ok_or_else(|| QueueError::Command("delivery is not in flight".to_string()))?;
        Ok(self.in_flight.remove(position))
    }
}

/// Process-local queue with inspection helpers.
#[derive(Debug, Default)]
pub struct InMemoryQueue {
    state: Mutex<QueueState>,
    notify: Notify,
}

impl InMemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `count` receives fail with a connection error.
    pub fn fail_next_receives(&self, count: u32) {
        self.lock().injected_failures = count;
    }

    /// Messages waiting to be received.
    pub fn pending(&self) -> Vec<String> {
        self.lock().ready.iter().cloned().collect()
    }

    /// Messages received but not yet settled.
    pub fn in_flight(&self) -> Vec<String> {
        self.lock().in_flight.clone()
    }

    /// Messages nacked without requeue.
    pub fn dead_letters(&self) -> Vec<String> {
        self.lock().dead.clone()
    }

    /// Messages acknowledged so far.
    pub fn acked(&self) -> Vec<String> {
        self.lock().acked.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, QueueState> {
        self.state.lock().expect("InMemoryQueue: lock poisoned")
    }

    fn try_take(&self) -> Result<Option<Delivery>, QueueError> {
        let mut state = self.lock();
        if state.injected_failures > 0 {
            state.injected_failures -= 1;
            return Err(QueueError::Connection("injected failure".to_string()));
        }
        let next = state.ready.pop_front();
        if let Some(payload) = &next {
            state.in_flight.push(payload.clone());
        }
        Ok(next.map(Delivery::new))
    }
}

#[async_trait]
impl MessageQueue for InMemoryQueue {
    async fn receive(&self, timeout: Duration) -> Result<Option<Delivery>, QueueError> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let notified = self.notify.notified();
            if let Some(delivery) = self.try_take()? {
                return Ok(Some(delivery));
            }
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return Ok(None);
            }
        }
    }

    async fn ack(&self, delivery: &Delivery) -> Result<(), QueueError> {
        let mut state = self.lock();
        let payload = state.take_in_flight(delivery)?;
        state.acked.push(payload);
        Ok(())
    }

    async fn nack(&self, delivery: &Delivery, requeue: bool) -> Result<(), QueueError> {
        {
            let mut state = self.lock();
            let payload = state.take_in_flight(delivery)?;
            if requeue {
                state.ready.push_back(payload);
            } else {
                state.dead.push(payload);
                return Ok(());
            }
        }
        self.notify.notify_one();
        Ok(())
    }

    async fn publish(&self, payload: &str) -> Result<(), QueueError> {
        self.lock().ready.push_back(payload.to_string());
        self.notify.notify_one();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const SHORT: Duration = Duration::from_millis(20);

    #[tokio::test]
    async fn receive_moves_the_message_in_flight() {
        let queue = InMemoryQueue::new();
        queue.publish("a").await.unwrap();

        let delivery = queue.receive(SHORT).await.unwrap().unwrap();

        assert_eq!(delivery.payload, "a");
        assert!(queue.pending().is_empty());
        assert_eq!(queue.in_flight(), vec!["a"]);
    }

    #[tokio::test]
    async fn receive_times_out_on_an_empty_queue() {
        let queue = InMemoryQueue::new();
        assert_eq!(queue.receive(SHORT).await.unwrap(), None);
    }

    #[tokio::test]
    async fn receive_wakes_on_publish() {
        let queue = Arc::new(InMemoryQueue::new());
        let publisher = queue.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            publisher.publish("late").await.unwrap();
        });

        let delivery = queue.receive(Duration::from_secs(5)).await.unwrap();

        assert_eq!(delivery, Some(Delivery::new("late")));
    }

    #[tokio::test]
    async fn ack_settles_the_delivery() {
        let queue = InMemoryQueue::new();
        queue.publish("a").await.unwrap();
        let delivery = queue.receive(SHORT).await.unwrap().unwrap();

        queue.ack(&delivery).await.unwrap();

        assert!(queue.in_flight().is_empty());
        assert_eq!(queue.acked(), vec!["a"]);
        assert!(queue.ack(&delivery).await.is_err(), "double ack is rejected");
    }

    #[tokio::test]
    async fn nack_requeues_at_the_tail_or_dead_letters() {
        let queue = InMemoryQueue::new();
        queue.publish("a").await.unwrap();
        queue.publish("b").await.unwrap();
        queue.publish("c").await.unwrap();

        let a = queue.receive(SHORT).await.unwrap().unwrap();
        queue.nack(&a, true).await.unwrap();
        let b = queue.receive(SHORT).await.unwrap().unwrap();
        queue.nack(&b, false).await.unwrap();

        assert_eq!(queue.pending(), vec!["c", "a"]);
        assert_eq!(queue.dead_letters(), vec!["b"]);
    }

    #[tokio::test]
    async fn injected_failures_surface_as_connection_errors() {
        let queue = InMemoryQueue::new();
        queue.publish("a").await.unwrap();
        queue.fail_next_receives(1);

        assert!(matches!(
            queue.receive(SHORT).await,
            Err(QueueError::Connection(_))
        ));
        assert!(queue.receive(SHORT).await.unwrap().is_some());
    }
}
