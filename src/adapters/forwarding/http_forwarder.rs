//! HTTP forwarder - POSTs finished drafts to the storage service.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

use super::payload::DraftPayload;
use crate::domain::assessment::AssessmentDraft;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::AssessmentForwarder;

/// Path appended to the storage service base URL.
const TRYOUT_PATH: &str = "/api/db/tryout";

/// Configuration for the HTTP forwarder.
#[derive(Debug, Clone)]
pub struct HttpForwarderConfig {
    /// Storage service base URL, without trailing slash.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl HttpForwarderConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Forwards drafts as JSON. Only `200 OK` counts as accepted.
pub struct HttpForwarder {
    config: HttpForwarderConfig,
    client: Client,
}

impl HttpForwarder {
    pub fn new(config: HttpForwarderConfig) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::InternalError,
                    format!("Failed to create HTTP client: {}", e),
                )
            })?;

        Ok(Self { config, client })
    }

    fn tryout_url(&self) -> String {
        format!("{}{}", self.config.base_url, TRYOUT_PATH)
    }
}

#[async_trait]
impl AssessmentForwarder for HttpForwarder {
    async fn forward(&self, draft: &AssessmentDraft) -> Result<(), DomainError> {
        let url = self.tryout_url();
        let response = self
            .client
            .post(&url)
            .json(&DraftPayload::from(draft))
            .send()
            .await
            .map_err(|e| {
                let reason = if e.is_timeout() {
                    format!("timed out after {}s", self.config.timeout.as_secs())
                } else {
                    e.to_string()
                };
                DomainError::new(
                    ErrorCode::ForwardingError,
                    format!("failed to send assessment: {}", reason),
                )
                .with_detail("url", url.as_str())
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::new(
                ErrorCode::ForwardingError,
                format!("failed to send assessment: status {}: {}", status, body),
            )
            .with_detail("status", status.as_u16().to_string()));
        }

        debug!(url = %url, sections = draft.sections.len(), "Draft accepted by storage service");
        Ok(())
    }
}
