//! Environment configuration

use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::resource::LocationName;
use crate::security::SecretString;

pub const PROJECT_ID_VAR: &str = "PROJECT_ID";
pub const REGION_NAME_VAR: &str = "REGION_NAME";
pub const ENDPOINT_VAR: &str = "AUTOML_ENDPOINT";
pub const ACCESS_TOKEN_VAR: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";
pub const CREDENTIALS_VAR: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// Default AutoML API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://automl.googleapis.com";

/// Settings every command needs
#[derive(Debug, Clone)]
pub struct Config {
    pub project_id: String,
    pub region: String,
    pub endpoint: String,
    pub access_token: Option<SecretString>,
    /// Service-account key file
    pub credentials_file: Option<PathBuf>,
}

impl Config {
    /// Read the configuration from the process environment
    ///
    /// Reads from:
    /// - `PROJECT_ID`: required
    /// - `REGION_NAME`: required
    /// - `AUTOML_ENDPOINT`: optional (defaults to <https://automl.googleapis.com>)
    /// - `GOOGLE_OAUTH_ACCESS_TOKEN`: optional bearer token
    /// - `GOOGLE_APPLICATION_CREDENTIALS`: optional service-account key file,
    ///   used when no bearer token is set
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary lookup function
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| {
                Error::Configuration(format!("{} environment variable not set", key))
            })
        };

        let project_id = required(PROJECT_ID_VAR)?;
        let region = required(REGION_NAME_VAR)?;

        let endpoint = lookup(ENDPOINT_VAR)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let access_token = lookup(ACCESS_TOKEN_VAR)
            .filter(|v| !v.is_empty())
            .map(SecretString::from);

        let credentials_file = lookup(CREDENTIALS_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            project_id,
            region,
            endpoint,
            access_token,
            credentials_file,
        })
    }

    /// Location all commands operate in
    pub fn location(&self) -> LocationName {
        LocationName::new(self.project_id.clone(), self.region.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_required_vars() {
        let config = Config::from_lookup(lookup_from(&[
            ("PROJECT_ID", "my-project"),
            ("REGION_NAME", "us-central1"),
        ]))
        .unwrap();

        assert_eq!(config.project_id, "my-project");
        assert_eq!(config.region, "us-central1");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert!(config.access_token.is_none());
        assert!(config.credentials_file.is_none());
        assert_eq!(
            config.location().to_string(),
            "projects/my-project/locations/us-central1"
        );
    }

    #[test]
    fn test_missing_project_id() {
        let err = Config::from_lookup(lookup_from(&[("REGION_NAME", "us-central1")])).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.to_string().contains("PROJECT_ID"));
    }

    #[test]
    fn test_missing_region_name() {
        let err = Config::from_lookup(lookup_from(&[("PROJECT_ID", "p")])).unwrap_err();
        assert!(err.to_string().contains("REGION_NAME"));
    }

    #[test]
    fn test_optional_vars() {
        let config = Config::from_lookup(lookup_from(&[
            ("PROJECT_ID", "p"),
            ("REGION_NAME", "eu"),
            ("AUTOML_ENDPOINT", "https://eu-automl.googleapis.com"),
            ("GOOGLE_OAUTH_ACCESS_TOKEN", "ya29.token"),
            ("GOOGLE_APPLICATION_CREDENTIALS", "/secrets/key.json"),
        ]))
        .unwrap();

        assert_eq!(
            config.credentials_file,
            Some(PathBuf::from("/secrets/key.json"))
        );
        assert_eq!(config.endpoint, "https://eu-automl.googleapis.com");
        assert_eq!(
            config.access_token.as_ref().map(|t| t.expose_secret()),
            Some("ya29.token")
        );
        assert!(!format!("{:?}", config).contains("ya29.token"));
    }

    #[test]
    fn test_empty_optional_vars_are_ignored() {
        let config = Config::from_lookup(lookup_from(&[
            ("PROJECT_ID", "p"),
            ("REGION_NAME", "eu"),
            ("AUTOML_ENDPOINT", ""),
            ("GOOGLE_OAUTH_ACCESS_TOKEN", ""),
            ("GOOGLE_APPLICATION_CREDENTIALS", ""),
        ]))
        .unwrap();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert!(config.access_token.is_none());
        assert!(config.credentials_file.is_none());
    }
}
