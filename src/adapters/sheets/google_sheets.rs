//! Google Sheets v4 REST implementation of SpreadsheetProvider.
//!
//! # Configuration
//!
//! ```ignore
//! let key = ServiceAccountKey::from_file("credentials.json")?;
//! let provider = GoogleSheetsProvider::from_key(GoogleSheetsConfig::default(), key)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use secrecy::ExposeSecret;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::service_account::{ServiceAccountKey, ServiceAccountTokenSource, SHEETS_READONLY_SCOPE};
use crate::domain::foundation::{DomainError, ErrorCode, SpreadsheetId};
use crate::domain::sheet::SheetRow;
use crate::ports::{SheetProperties, SpreadsheetProvider};

const SHEET_PROPERTIES_FIELDS: &str = "sheets.properties(title,gridProperties)";

/// Configuration for the Google Sheets provider.
#[derive(Debug, Clone)]
pub struct GoogleSheetsConfig {
    /// API root (default: https://sheets.googleapis.com).
    pub api_base_url: String,
    /// OAuth token endpoint; unset uses the key file's `token_uri`.
    pub token_url: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for GoogleSheetsConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://sheets.googleapis.com".to_string(),
            token_url: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl GoogleSheetsConfig {
    /// Sets the API root.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Sets the token endpoint.
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = Some(url.into());
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Deserialize)]
struct SpreadsheetResponse {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetEntryProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetEntryProperties {
    title: String,
    #[serde(default)]
    grid_properties: GridProperties,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GridProperties {
    #[serde(default)]
    row_count: u32,
    #[serde(default)]
    column_count: u32,
}

#[derive(Debug, Deserialize)]
struct ValueRangeResponse {
    /// Absent when the range holds no values.
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// Google Sheets provider authenticated with a service account.
pub struct GoogleSheetsProvider {
    config: GoogleSheetsConfig,
    client: Client,
    tokens: Arc<ServiceAccountTokenSource>,
}

impl GoogleSheetsProvider {
    /// Creates a provider using an existing token source.
    pub fn new(
        config: GoogleSheetsConfig,
        tokens: Arc<ServiceAccountTokenSource>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            client: build_client(config.timeout)?,
            config,
            tokens,
        })
    }

    /// Creates a provider and a read-only token source for `key`.
    pub fn from_key(config: GoogleSheetsConfig, key: ServiceAccountKey) -> Result<Self, DomainError> {
        let token_url = config
            .token_url
            .clone()
            .unwrap_or_else(|| key.token_endpoint().to_string());
        let tokens = ServiceAccountTokenSource::new(
            key,
            token_url,
            SHEETS_READONLY_SCOPE,
            build_client(config.timeout)?,
        );
        Self::new(config, Arc::new(tokens))
    }

    /// Builds `<base>/v4/spreadsheets/<id>[/<segments>...]` with each segment
    /// percent-encoded.
    fn spreadsheet_url(&self, id: &SpreadsheetId, segments: &[&str]) -> Result<Url, DomainError> {
        let mut url = Url::parse(&self.config.api_base_url).map_err(|e| {
            provider_error(format!("invalid sheets API url: {}", e))
        })?;
        url.path_segments_mut()
            .map_err(|_| provider_error("sheets API url cannot be a base"))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", id.as_str()])
            .extend(segments);
        Ok(url)
    }

    async fn get(&self, url: Url) -> Result<Response, DomainError> {
        let token = self.tokens.access_token().await?;
        let response = self
            .client
            .get(url)
            .bearer_auth(token.expose_secret())
            .send()
            .await
            .map_err(|e| provider_error(format!("request to sheets API failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(
                provider_error(format!("sheets API returned {}: {}", status, body))
                    .with_detail("status", status.as_u16().to_string()),
            );
        }
        Ok(response)
    }
}

#[async_trait]
impl SpreadsheetProvider for GoogleSheetsProvider {
    async fn list_sheets(
        &self,
        spreadsheet: &SpreadsheetId,
    ) -> Result<Vec<SheetProperties>, DomainError> {
        let mut url = self.spreadsheet_url(spreadsheet, &[])?;
        url.query_pairs_mut()
            .append_pair("fields", SHEET_PROPERTIES_FIELDS);

        let body: SpreadsheetResponse = self
            .get(url)
            .await
            .map_err(|e| e.with_detail("spreadsheet", spreadsheet.as_str()))?
            .json()
            .await
            .map_err(|e| provider_error(format!("unable to retrieve spreadsheet: {}", e)))?;

        debug!(spreadsheet = %spreadsheet, sheets = body.sheets.len(), "Listed sheets");

        Ok(body
            .sheets
            .into_iter()
            .map(|s| {
                SheetProperties::new(
                    s.properties.title,
                    s.properties.grid_properties.row_count,
                    s.properties.grid_properties.column_count,
                )
            })
            .collect())
    }

    async fn fetch_rows(
        &self,
        spreadsheet: &SpreadsheetId,
        sheet: &str,
        range: &str,
    ) -> Result<Vec<SheetRow>, DomainError> {
        let a1 = format!("{}!{}", sheet, range);
        let url = self.spreadsheet_url(spreadsheet, &["values", &a1])?;

        let body: ValueRangeResponse = self
            .get(url)
            .await?
            .json()
            .await
            .map_err(|e| {
                provider_error(format!("unable to retrieve data from sheet {}: {}", sheet, e))
            })?;

        Ok(body
            .values
            .into_iter()
            .map(|cells| SheetRow::new(cells.into_iter().map(cell_text)))
            .collect())
    }
}

/// Formatted values arrive as strings; anything else is rendered as text.
fn cell_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn build_client(timeout: Duration) -> Result<Client, DomainError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to create HTTP client: {}", e),
            )
        })
}

fn provider_error(message: impl Into<String>) -> DomainError {
    DomainError::new(ErrorCode::SpreadsheetProviderError, message)
}
