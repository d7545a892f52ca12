//! HTTP listener and logging settings

use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use super::error::ValidationError;

/// Where the API listens and how it logs.
///
/// There is no request deadline: an assembly runs until it completes or a
/// collaborator call fails.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind, e.g. `0.0.0.0` or `::1`
    pub host: IpAddr,

    pub port: u16,

    pub environment: Environment,

    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub log_filter: String,

    /// Comma-separated allowed origins; unset or `*` allows any
    pub cors_origins: Option<String>,
}

/// Deployment environment. Production switches logs to JSON.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            environment: Environment::Development,
            log_filter: "info,assessment_ingest=debug,sqlx=warn,tower_http=debug".to_string(),
            cors_origins: None,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Allowed origins with blanks dropped.
    pub fn allowed_origins(&self) -> Vec<String> {
        let Some(raw) = &self.cors_origins else {
            return Vec::new();
        };
        raw.split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        Ok(())
    }
}
