//! Main client for interacting with the AutoML API

use bon::bon;
use reqwest::header::USER_AGENT;
use reqwest::Method;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::{ServiceAccountProvider, StaticToken, TokenProvider};
use crate::config::{Config, DEFAULT_ENDPOINT};
use crate::error::{map_response_error, Error, Result};
use crate::security::SecretString;

/// SDK version for User-Agent header
const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");
const SDK_NAME: &str = env!("CARGO_PKG_NAME");

/// REST API version prefix
pub const API_VERSION: &str = "v1beta1";

/// Default timeout for API requests
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default connection timeout
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default delay before the first poll of a long-running operation
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Main client for interacting with the AutoML API
#[derive(Clone)]
pub struct AutoMlClient {
    base_url: String,
    auth: Option<Arc<dyn TokenProvider>>,
    user_agent: String,
    poll_interval: Duration,
    http: ClientWithMiddleware,
}

impl fmt::Debug for AutoMlClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoMlClient")
            .field("base_url", &self.base_url)
            .field("auth", &self.auth)
            .field("user_agent", &self.user_agent)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

#[bon]
impl AutoMlClient {
    /// Create a new AutoML client
    ///
    /// When `http_client` is given, `timeout` and `connect_timeout` are ignored;
    /// configure them on the supplied client instead. A non-empty
    /// `access_token` takes precedence over `token_provider`.
    #[builder]
    pub fn new(
        #[builder(default = String::from(DEFAULT_ENDPOINT))] base_url: String,
        #[builder(into)] access_token: Option<SecretString>,
        token_provider: Option<Arc<dyn TokenProvider>>,
        timeout: Option<Duration>,
        connect_timeout: Option<Duration>,
        #[builder(into)] user_agent: Option<String>,
        poll_interval: Option<Duration>,
        http_client: Option<ClientWithMiddleware>,
    ) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url).map_err(|e| {
            Error::Configuration(format!("invalid endpoint '{}': {}", base_url, e))
        })?;

        let http = match http_client {
            Some(client) => client,
            None => {
                let client = reqwest::Client::builder()
                    .timeout(timeout.unwrap_or(DEFAULT_TIMEOUT))
                    .connect_timeout(connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT))
                    .pool_max_idle_per_host(10)
                    .pool_idle_timeout(Duration::from_secs(90))
                    .build()
                    .map_err(|e| {
                        Error::Configuration(format!("failed to build HTTP client: {}", e))
                    })?;
                ClientBuilder::new(client).build()
            }
        };

        let user_agent = user_agent.unwrap_or_else(|| format!("{}/{} (Rust)", SDK_NAME, SDK_VERSION));

        let auth = match access_token.filter(|t| !t.is_empty()) {
            Some(token) => Some(Arc::new(StaticToken::new(token)) as Arc<dyn TokenProvider>),
            None => token_provider,
        };

        Ok(Self {
            base_url,
            auth,
            user_agent,
            poll_interval: poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL),
            http,
        })
    }

    /// Create a client from a loaded [`Config`]
    ///
    /// `GOOGLE_OAUTH_ACCESS_TOKEN` wins over `GOOGLE_APPLICATION_CREDENTIALS`;
    /// the key file is only read when no token is set.
    pub fn from_config(config: &Config) -> Result<Self> {
        let token_provider: Option<Arc<dyn TokenProvider>> =
            match (&config.access_token, &config.credentials_file) {
                (None, Some(path)) => {
                    let provider = ServiceAccountProvider::from_file(path)?;
                    tracing::debug!(account = %provider.client_email(), "Using service account credentials");
                    Some(Arc::new(provider))
                }
                (None, None) => {
                    tracing::debug!("No credentials configured, sending unauthenticated requests");
                    None
                }
                (Some(_), _) => None,
            };

        Self::builder()
            .base_url(config.endpoint.clone())
            .maybe_access_token(config.access_token.clone())
            .maybe_token_provider(token_provider)
            .build()
    }

    /// Create a client from environment variables, see [`Config::from_env`]
    pub fn from_env() -> Result<Self> {
        Self::from_config(&Config::from_env()?)
    }

    /// API base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Delay before the first poll of a long-running operation
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Full URL of an API resource path such as `projects/p/locations/r/datasets`
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}/{}", self.base_url, API_VERSION, path)
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        tracing::debug!(%method, %url, "AutoML request");

        self.http
            .request(method, url)
            .header(USER_AGENT, self.user_agent.as_str())
    }

    /// Authorize a request, send it and decode the JSON body of a successful response
    pub(crate) async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let request = match &self.auth {
            Some(auth) => request.bearer_auth(auth.access_token().await?.expose_secret()),
            None => request,
        };

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(map_response_error(response).await);
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(serde_json::from_str("{}")?);
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building() {
        let client = AutoMlClient::builder()
            .base_url("https://automl.example.com/".to_string())
            .build()
            .unwrap();

        assert_eq!(client.base_url(), "https://automl.example.com");
        assert_eq!(
            client.url("projects/p/locations/r/datasets"),
            "https://automl.example.com/v1beta1/projects/p/locations/r/datasets"
        );
    }

    #[test]
    fn test_defaults() {
        let client = AutoMlClient::builder().build().unwrap();
        assert_eq!(client.base_url(), DEFAULT_ENDPOINT);
        assert_eq!(client.poll_interval(), DEFAULT_POLL_INTERVAL);
        assert!(client.auth.is_none());
        assert!(client.user_agent.starts_with("automl-video-datasets/"));
    }

    #[test]
    fn test_invalid_endpoint_is_rejected() {
        let err = AutoMlClient::builder()
            .base_url("not a url".to_string())
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_token_is_not_debug_printed() {
        let client = AutoMlClient::builder()
            .access_token("ya29.secret")
            .build()
            .unwrap();
        assert!(!format!("{:?}", client).contains("ya29.secret"));
    }
}
