//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `ASSESSMENT_INGEST` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use assessment_ingest::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr());
//! ```

mod broker;
mod database;
mod error;
mod forwarding;
mod redis;
mod server;
mod sheets;

pub use broker::BrokerConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use forwarding::ForwardingConfig;
pub use redis::RedisConfig;
pub use server::{Environment, ServerConfig};
pub use sheets::SheetsConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Redis connection backing the message queue
    #[serde(default)]
    pub redis: RedisConfig,

    /// Queue consumer settings
    #[serde(default)]
    pub broker: BrokerConfig,

    /// Google Sheets access
    #[serde(default)]
    pub sheets: SheetsConfig,

    /// Storage service receiving drafts from the queue path
    #[serde(default)]
    pub forwarding: ForwardingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `ASSESSMENT_INGEST` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `ASSESSMENT_INGEST__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `ASSESSMENT_INGEST__DATABASE__URL=...` -> `database.url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("ASSESSMENT_INGEST")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Redis and forwarding settings are only checked when the queue
    /// consumer is enabled.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.sheets.validate()?;
        if self.broker.enabled {
            self.broker.validate()?;
            self.redis.validate()?;
            self.forwarding.validate()?;
        }
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
