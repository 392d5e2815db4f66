//! Google OAuth credentials
//!
//! Every API request carries a bearer token obtained from a [`TokenProvider`].
//! [`StaticToken`] hands out a token supplied by the caller, for example from
//! `GOOGLE_OAUTH_ACCESS_TOKEN`. [`ServiceAccountProvider`] implements the
//! service-account half of Application Default Credentials: it signs an RS256
//! JWT with the key file named by `GOOGLE_APPLICATION_CREDENTIALS`, exchanges
//! it at the token endpoint and caches the access token until five minutes
//! before it expires.
//!
//! ```no_run
//! use automl_video_datasets::auth::{ServiceAccountProvider, TokenProvider};
//!
//! # async fn example() -> automl_video_datasets::Result<()> {
//! let provider = ServiceAccountProvider::from_file("/path/to/key.json")?;
//! let token = provider.access_token().await?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tokio::sync::RwLock;

use crate::error::{error_message, Error, Result};
use crate::security::SecretString;

/// Default Google OAuth2 token URL
pub const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Scope granting access to AutoML and the rest of Google Cloud
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Refresh cached tokens this long before they expire
pub const TOKEN_EXPIRY_BUFFER_SECONDS: i64 = 300;

/// Lifetime of the signed JWT assertion
pub const JWT_LIFETIME_SECONDS: i64 = 3600;

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Source of the bearer token sent with each request
#[async_trait]
pub trait TokenProvider: fmt::Debug + Send + Sync {
    /// A currently valid access token
    async fn access_token(&self) -> Result<SecretString>;
}

/// A fixed token supplied by the caller
#[derive(Debug, Clone)]
pub struct StaticToken(SecretString);

impl StaticToken {
    /// Wrap an already issued access token
    pub fn new(token: impl Into<SecretString>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn access_token(&self) -> Result<SecretString> {
        Ok(self.0.clone())
    }
}

/// Access token with its expiry
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: SecretString,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Checks if the token is expired
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Checks if the token is within five minutes of expiry
    pub fn needs_refresh(&self) -> bool {
        Utc::now() >= self.expires_at - Duration::seconds(TOKEN_EXPIRY_BUFFER_SECONDS)
    }
}

/// The fields of a service-account JSON key file this crate uses
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type", default)]
    pub key_type: String,
    pub client_email: String,
    pub private_key: SecretString,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl ServiceAccountKey {
    /// Parse a key from the JSON downloaded from the Cloud console
    pub fn from_json(json: &str) -> Result<Self> {
        let key: Self = serde_json::from_str(json).map_err(|e| {
            Error::Configuration(format!("invalid service account key: {}", e))
        })?;

        if !key.key_type.is_empty() && key.key_type != "service_account" {
            return Err(Error::Configuration(format!(
                "unsupported credentials type '{}', expected 'service_account'",
                key.key_type
            )));
        }
        Ok(key)
    }

    /// Read and parse a key file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!(
                "cannot read credentials file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&json)
    }
}

/// Service account authentication through signed JWT bearer assertions.
///
/// Thread-safe; the cached token sits behind a `RwLock`.
#[derive(Debug)]
pub struct ServiceAccountProvider {
    key: ServiceAccountKey,
    scopes: Vec<String>,
    token_url: String,
    cached_token: RwLock<Option<AccessToken>>,
    http_client: reqwest::Client,
}

impl ServiceAccountProvider {
    /// Creates a provider for `key` with the cloud-platform scope
    pub fn new(key: ServiceAccountKey) -> Self {
        let token_url = key
            .token_uri
            .clone()
            .filter(|uri| !uri.is_empty())
            .unwrap_or_else(|| TOKEN_URL.to_string());

        Self {
            key,
            scopes: vec![CLOUD_PLATFORM_SCOPE.to_string()],
            token_url,
            cached_token: RwLock::new(None),
            http_client: reqwest::Client::new(),
        }
    }

    /// Creates a provider from a service-account key file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        ServiceAccountKey::from_file(path).map(Self::new)
    }

    /// Replaces the requested OAuth scopes
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Sets a custom token URL
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    /// Service account the tokens are issued for
    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    fn create_jwt(&self) -> Result<String> {
        #[derive(Serialize)]
        struct Claims<'a> {
            iss: &'a str,
            scope: String,
            aud: &'a str,
            exp: i64,
            iat: i64,
        }

        let now = Utc::now().timestamp();
        let claims = Claims {
            iss: &self.key.client_email,
            scope: self.scopes.join(" "),
            aud: &self.token_url,
            exp: now + JWT_LIFETIME_SECONDS,
            iat: now,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();

        let key = EncodingKey::from_rsa_pem(self.key.private_key.expose_secret().as_bytes())
            .map_err(|e| {
                Error::Configuration(format!("invalid service account private key: {}", e))
            })?;

        encode(&header, &claims, &key)
            .map_err(|e| Error::Configuration(format!("JWT encoding failed: {}", e)))
    }

    async fn exchange_jwt_for_token(&self) -> Result<AccessToken> {
        #[derive(Serialize)]
        struct TokenRequest<'a> {
            grant_type: &'a str,
            assertion: &'a str,
        }

        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: String,
            #[serde(default)]
            expires_in: Option<i64>,
        }

        let jwt = self.create_jwt()?;
        tracing::debug!(
            account = %self.key.client_email,
            token_url = %self.token_url,
            "Exchanging service account assertion"
        );

        let response = self
            .http_client
            .post(&self.token_url)
            .form(&TokenRequest {
                grant_type: JWT_BEARER_GRANT,
                assertion: &jwt,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let fallback = format!("Unexpected status: {}", status);
            let message = error_message(&body, &fallback);
            tracing::warn!(status = status.as_u16(), %message, "Token exchange failed");
            return Err(Error::Auth {
                status: status.as_u16(),
                message: format!("token exchange failed: {}", message),
            });
        }

        let token: TokenResponse = serde_json::from_str(&body)?;
        let expires_in = token.expires_in.unwrap_or(JWT_LIFETIME_SECONDS);

        Ok(AccessToken {
            token: SecretString::new(token.access_token),
            expires_at: Utc::now() + Duration::seconds(expires_in),
        })
    }

    /// Bypass the cache and fetch a fresh token
    pub async fn refresh_token(&self) -> Result<AccessToken> {
        let token = self.exchange_jwt_for_token().await?;
        *self.cached_token.write().await = Some(token.clone());
        Ok(token)
    }
}

#[async_trait]
impl TokenProvider for ServiceAccountProvider {
    async fn access_token(&self) -> Result<SecretString> {
        if let Some(token) = self.cached_token.read().await.as_ref() {
            if !token.needs_refresh() {
                return Ok(token.token.clone());
            }
        }

        self.refresh_token().await.map(|token| token.token)
    }
}
