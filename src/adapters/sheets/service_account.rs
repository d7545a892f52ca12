//! Service-account authentication for Google APIs.
//!
//! Signs an RS256 JWT assertion with the account's private key and exchanges
//! it at the token endpoint for a short-lived bearer token. Tokens are cached
//! until shortly before they expire.

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};

/// Read-only access to spreadsheet contents.
pub const SHEETS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

/// Google's OAuth token endpoint, used when a key names none.
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Assertions are valid for one hour, the maximum Google accepts.
const ASSERTION_LIFETIME_SECS: u64 = 3600;

/// Tokens are refreshed this long before their reported expiry.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// The fields of a service-account JSON key file that are used here.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    private_key: Secret<String>,
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl ServiceAccountKey {
    /// Parses a key from its JSON text.
    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        serde_json::from_str(json).map_err(|e| {
            DomainError::new(
                ErrorCode::SpreadsheetProviderError,
                format!("unable to parse service account key: {}", e),
            )
        })
    }

    /// Reads and parses a key file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            DomainError::new(
                ErrorCode::SpreadsheetProviderError,
                format!("unable to read service account key: {}", e),
            )
            .with_detail("path", path.display().to_string())
        })?;
        Self::from_json(&json)
    }

    /// Token endpoint named by the key file, or Google's default.
    pub fn token_endpoint(&self) -> &str {
        self.token_uri.as_deref().unwrap_or(GOOGLE_TOKEN_URL)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct AssertionClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: u64,
    exp: u64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    ASSERTION_LIFETIME_SECS
}

struct CachedToken {
    token: Secret<String>,
    fetched_at: Instant,
    lifetime: Duration,
}

impl CachedToken {
    fn is_expired(&self) -> bool {
        self.fetched_at.elapsed() + EXPIRY_MARGIN >= self.lifetime
    }
}

/// Issues bearer tokens for one service account and scope.
pub struct ServiceAccountTokenSource {
    key: ServiceAccountKey,
    token_url: String,
    scope: String,
    http_client: Client,
    cache: RwLock<Option<CachedToken>>,
}

impl ServiceAccountTokenSource {
    /// Creates a token source that exchanges assertions at `token_url`.
    pub fn new(
        key: ServiceAccountKey,
        token_url: impl Into<String>,
        scope: impl Into<String>,
        http_client: Client,
    ) -> Self {
        Self {
            key,
            token_url: token_url.into(),
            scope: scope.into(),
            http_client,
            cache: RwLock::new(None),
        }
    }

    /// Returns a valid bearer token, exchanging a fresh assertion if needed.
    pub async fn access_token(&self) -> Result<Secret<String>, DomainError> {
        {
            let cache = self.cache.read().await;
            if let Some(ref cached) = *cache {
                if !cached.is_expired() {
                    return Ok(cached.token.clone());
                }
            }
        }

        let mut cache = self.cache.write().await;
        // Another caller may have refreshed while we waited for the lock
        if let Some(ref cached) = *cache {
            if !cached.is_expired() {
                return Ok(cached.token.clone());
            }
        }

        let response = self.exchange(&self.sign_assertion(Timestamp::now())?).await?;
        debug!(
            client_email = %self.key.client_email,
            expires_in = response.expires_in,
            "Obtained service account token"
        );

        let token = Secret::new(response.access_token);
        *cache = Some(CachedToken {
            token: token.clone(),
            fetched_at: Instant::now(),
            lifetime: Duration::from_secs(response.expires_in),
        });
        Ok(token)
    }

    fn claims(&self, issued_at: Timestamp) -> AssertionClaims {
        AssertionClaims {
            iss: self.key.client_email.clone(),
            scope: self.scope.clone(),
            aud: self.token_url.clone(),
            iat: issued_at.as_unix_secs(),
            exp: issued_at.plus_secs(ASSERTION_LIFETIME_SECS).as_unix_secs(),
        }
    }

    fn sign_assertion(&self, issued_at: Timestamp) -> Result<String, DomainError> {
        let key = EncodingKey::from_rsa_pem(self.key.private_key.expose_secret().as_bytes())
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::SpreadsheetProviderError,
                    format!("invalid service account private key: {}", e),
                )
            })?;

        encode(&Header::new(Algorithm::RS256), &self.claims(issued_at), &key).map_err(|e| {
            DomainError::new(
                ErrorCode::SpreadsheetProviderError,
                format!("unable to sign token assertion: {}", e),
            )
        })
    }

    async fn exchange(&self, assertion: &str) -> Result<TokenResponse, DomainError> {
        let response = self
            .http_client
            .post(&self.token_url)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion)])
            .send()
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::SpreadsheetProviderError,
                    format!("unable to reach token endpoint: {}", e),
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::new(
                ErrorCode::SpreadsheetProviderError,
                format!("token endpoint returned {}: {}", status, body),
            )
            .with_detail("status", status.as_u16().to_string()));
        }

        response.json().await.map_err(|e| {
            DomainError::new(
                ErrorCode::SpreadsheetProviderError,
                format!("unable to parse token response: {}", e),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::post;
    use axum::{Form, Json, Router};
    use serde_json::json;
    use std::collections::HashMap;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const TEST_KEY_PEM: &str = include_str!("../../../tests/fixtures/test_service_account_key.pem");

    fn key_json(private_key: &str) -> String {
        json!({
            "type": "service_account",
            "client_email": "ingest@project.iam.gserviceaccount.com",
            "private_key": private_key,
            "token_uri": "https://oauth2.googleapis.com/token"
        })
        .to_string()
    }

    fn source(token_url: &str, private_key: &str) -> ServiceAccountTokenSource {
        ServiceAccountTokenSource::new(
            ServiceAccountKey::from_json(&key_json(private_key)).unwrap(),
            token_url,
            SHEETS_READONLY_SCOPE,
            Client::new(),
        )
    }

    async fn spawn_token_endpoint(expires_in: u64) -> (String, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let app = Router::new().route(
            "/token",
            post(move |Form(form): Form<HashMap<String, String>>| {
                let counter = counter.clone();
                async move {
                    assert_eq!(form.get("grant_type").map(String::as_str), Some(JWT_BEARER_GRANT));
                    assert!(form.contains_key("assertion"));
                    let n = counter.fetch_add(1, Ordering::SeqCst);
                    Json(json!({
                        "access_token": format!("token-{}", n),
                        "expires_in": expires_in,
                        "token_type": "Bearer"
                    }))
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}/token", addr), calls)
    }

    #[test]
    fn key_file_is_loaded_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(key_json("pem").as_bytes()).unwrap();

        let key = ServiceAccountKey::from_file(file.path()).unwrap();

        assert_eq!(key.client_email, "ingest@project.iam.gserviceaccount.com");
        assert_eq!(
            key.token_uri.as_deref(),
            Some("https://oauth2.googleapis.com/token")
        );
    }

    #[test]
    fn token_endpoint_falls_back_to_google() {
        let named = ServiceAccountKey::from_json(&key_json("pem")).unwrap();
        assert_eq!(named.token_endpoint(), "https://oauth2.googleapis.com/token");

        let unnamed = ServiceAccountKey::from_json(
            r#"{"client_email": "a@b", "private_key": "pem"}"#,
        )
        .unwrap();
        assert_eq!(unnamed.token_endpoint(), GOOGLE_TOKEN_URL);

        let custom = ServiceAccountKey::from_json(
            r#"{"client_email": "a@b", "private_key": "pem", "token_uri": "http://localhost/t"}"#,
        )
        .unwrap();
        assert_eq!(custom.token_endpoint(), "http://localhost/t");
    }

    #[test]
    fn missing_key_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        let err = ServiceAccountKey::from_file(&path).unwrap_err();

        assert_eq!(err.code, ErrorCode::SpreadsheetProviderError);
        assert!(err.details.contains_key("path"));
    }

    #[test]
    fn key_without_private_key_is_rejected() {
        let err = ServiceAccountKey::from_json(r#"{"client_email": "a@b"}"#).unwrap_err();
        assert!(err.message.contains("private_key"));
    }

    #[test]
    fn claims_cover_one_hour_for_the_token_audience() {
        let source = source("https://oauth2.googleapis.com/token", "pem");
        let issued_at = Timestamp::parse_rfc3339("iat", "2024-05-01T08:00:00Z").unwrap();

        let claims = source.claims(issued_at);

        assert_eq!(claims.iss, "ingest@project.iam.gserviceaccount.com");
        assert_eq!(claims.aud, "https://oauth2.googleapis.com/token");
        assert_eq!(claims.scope, SHEETS_READONLY_SCOPE);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn invalid_private_key_fails_signing() {
        let source = source("https://oauth2.googleapis.com/token", "not a pem");

        let err = source.sign_assertion(Timestamp::now()).unwrap_err();

        assert!(err.message.contains("private key"));
    }

    #[test]
    fn assertion_is_a_signed_rs256_jwt() {
        let source = source("https://oauth2.googleapis.com/token", TEST_KEY_PEM);

        let assertion = source.sign_assertion(Timestamp::now()).unwrap();

        let header = jsonwebtoken::decode_header(&assertion).unwrap();
        assert_eq!(header.alg, Algorithm::RS256);
        assert_eq!(assertion.split('.').count(), 3);
    }

    #[tokio::test]
    async fn token_is_cached_until_near_expiry() {
        let (url, calls) = spawn_token_endpoint(3600).await;
        let source = source(&url, TEST_KEY_PEM);

        let first = source.access_token().await.unwrap();
        let second = source.access_token().await.unwrap();

        assert_eq!(first.expose_secret(), "token-0");
        assert_eq!(second.expose_secret(), "token-0");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_exchange() {
        let (url, calls) = spawn_token_endpoint(3600).await;
        let source = source(&url, TEST_KEY_PEM);

        let (a, b, c) = tokio::join!(
            source.access_token(),
            source.access_token(),
            source.access_token()
        );

        for token in [a, b, c] {
            assert_eq!(token.unwrap().expose_secret(), "token-0");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn short_lived_tokens_are_refreshed() {
        let (url, calls) = spawn_token_endpoint(30).await;
        let source = source(&url, TEST_KEY_PEM);

        source.access_token().await.unwrap();
        let second = source.access_token().await.unwrap();

        assert_eq!(second.expose_secret(), "token-1");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
