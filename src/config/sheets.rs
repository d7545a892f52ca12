//! Spreadsheet provider configuration

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::error::ValidationError;

/// Google Sheets API access
#[derive(Debug, Clone, Deserialize)]
pub struct SheetsConfig {
    /// Path to the service-account JSON key
    #[serde(default = "default_credentials_path")]
    pub credentials_path: PathBuf,

    /// Sheets API root
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// OAuth token endpoint; unset uses the key file's `token_uri`
    #[serde(default)]
    pub token_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl SheetsConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate spreadsheet provider configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.credentials_path.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("SHEETS_CREDENTIALS_PATH"));
        }
        require_http_url("sheets.api_base_url", &self.api_base_url)?;
        if let Some(token_url) = &self.token_url {
            require_http_url("sheets.token_url", token_url)?;
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            credentials_path: default_credentials_path(),
            api_base_url: default_api_base_url(),
            token_url: None,
            timeout_secs: default_timeout(),
        }
    }
}

pub(super) fn require_http_url(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        })
    }
}

fn default_credentials_path() -> PathBuf {
    PathBuf::from("sheets-key.json")
}

fn default_api_base_url() -> String {
    "https://sheets.googleapis.com".to_string()
}

fn default_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheets_config_defaults() {
        let config = SheetsConfig::default();
        assert_eq!(config.credentials_path, PathBuf::from("sheets-key.json"));
        assert_eq!(config.api_base_url, "https://sheets.googleapis.com");
        assert_eq!(config.token_url, None);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_non_http_urls() {
        let config = SheetsConfig {
            token_url: Some("oauth2.googleapis.com/token".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidUrl {
                field: "sheets.token_url",
                ..
            })
        ));
    }

    #[test]
    fn test_validation_empty_credentials_path() {
        let config = SheetsConfig {
            credentials_path: PathBuf::new(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("SHEETS_CREDENTIALS_PATH"))
        );
    }
}
