//! Forwarding target configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::sheets::require_http_url;

/// Storage service that receives forwarded drafts
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForwardingConfig {
    /// Storage service base URL; drafts go to `<base_url>/api/db/tryout`
    #[serde(default)]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ForwardingConfig {
    /// Get timeout as Duration (30 seconds unless configured)
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(30))
    }

    /// Validate forwarding configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.base_url.is_empty() {
            return Err(ValidationError::MissingRequired("FORWARDING_BASE_URL"));
        }
        require_http_url("forwarding.base_url", &self.base_url)?;
        if self.timeout_secs == Some(0) {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout() {
        assert_eq!(ForwardingConfig::default().timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_validation_requires_base_url() {
        assert_eq!(
            ForwardingConfig::default().validate(),
            Err(ValidationError::MissingRequired("FORWARDING_BASE_URL"))
        );
    }

    #[test]
    fn test_validation_accepts_http_url() {
        let config = ForwardingConfig {
            base_url: "http://tryout-db:8081".to_string(),
            timeout_secs: Some(10),
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }
}
