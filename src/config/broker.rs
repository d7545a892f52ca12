//! Message broker configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Queue consumer configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BrokerConfig {
    /// Start the queue consumer alongside the HTTP server
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Queue carrying import requests
    #[serde(default = "default_queue")]
    pub queue: String,

    /// Names this consumer's processing list
    #[serde(default = "default_consumer_name")]
    pub consumer_name: String,

    /// How long one receive blocks, in seconds
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,

    /// First reconnect delay after a broker failure, in milliseconds
    #[serde(default = "default_reconnect_initial_backoff")]
    pub reconnect_initial_backoff_ms: u64,

    /// Reconnect delay cap, in milliseconds
    #[serde(default = "default_reconnect_max_backoff")]
    pub reconnect_max_backoff_ms: u64,

    /// Pause after requeueing a failed message, in milliseconds
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
}

impl BrokerConfig {
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }

    pub fn reconnect_initial_backoff(&self) -> Duration {
        Duration::from_millis(self.reconnect_initial_backoff_ms)
    }

    pub fn reconnect_max_backoff(&self) -> Duration {
        Duration::from_millis(self.reconnect_max_backoff_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Validate broker configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.queue.trim().is_empty() {
            return Err(ValidationError::MissingRequired("BROKER_QUEUE"));
        }
        if self.consumer_name.trim().is_empty() {
            return Err(ValidationError::MissingRequired("BROKER_CONSUMER_NAME"));
        }
        if self.poll_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.reconnect_initial_backoff_ms == 0
            || self.reconnect_initial_backoff_ms > self.reconnect_max_backoff_ms
        {
            return Err(ValidationError::InvalidBackoff);
        }
        Ok(())
    }
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            queue: default_queue(),
            consumer_name: default_consumer_name(),
            poll_timeout_secs: default_poll_timeout(),
            reconnect_initial_backoff_ms: default_reconnect_initial_backoff(),
            reconnect_max_backoff_ms: default_reconnect_max_backoff(),
            retry_delay_ms: default_retry_delay(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_queue() -> String {
    "parsing-sheets-queue".to_string()
}

fn default_consumer_name() -> String {
    "assessment-ingest".to_string()
}

fn default_poll_timeout() -> u64 {
    5
}

fn default_reconnect_initial_backoff() -> u64 {
    500
}

fn default_reconnect_max_backoff() -> u64 {
    30_000
}

fn default_retry_delay() -> u64 {
    1_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broker_config_defaults() {
        let config = BrokerConfig::default();
        assert!(config.enabled);
        assert_eq!(config.queue, "parsing-sheets-queue");
        assert_eq!(config.poll_timeout(), Duration::from_secs(5));
        assert_eq!(config.reconnect_initial_backoff(), Duration::from_millis(500));
        assert_eq!(config.reconnect_max_backoff(), Duration::from_secs(30));
        assert_eq!(config.retry_delay(), Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_empty_queue() {
        let config = BrokerConfig {
            queue: " ".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("BROKER_QUEUE"))
        );
    }

    #[test]
    fn test_validation_backoff_order() {
        let config = BrokerConfig {
            reconnect_initial_backoff_ms: 60_000,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidBackoff));
    }

    #[test]
    fn test_validation_zero_poll_timeout() {
        let config = BrokerConfig {
            poll_timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidTimeout));
    }
}
