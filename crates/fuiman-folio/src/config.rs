//! FOLIO connection settings.

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::error::{FolioError, Result};

/// Default HTTP request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection settings for a FOLIO tenant.
#[derive(Clone)]
pub struct FolioConfig {
    pub endpoint: Url,
    pub tenant: String,
    pub username: String,
    pub password: String,
    pub timeout: Duration,
}

impl fmt::Debug for FolioConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FolioConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("tenant", &self.tenant)
            .field("username", &self.username)
            .field("password", &"***")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl FolioConfig {
    /// Builds settings, rejecting empty values.
    pub fn new(
        endpoint: &str,
        tenant: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        let config = Self {
            endpoint: parse_endpoint(endpoint)?,
            tenant: tenant.into(),
            username: username.into(),
            password: password.into(),
            timeout: DEFAULT_TIMEOUT,
        };
        for (name, value) in [
            ("tenant", &config.tenant),
            ("username", &config.username),
            ("password", &config.password),
        ] {
            if value.is_empty() {
                return Err(FolioError::MissingSetting(name));
            }
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Absolute URL of an API path such as `/user-import`.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.endpoint.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Parses an endpoint, defaulting to `https://` when no scheme is given.
pub fn parse_endpoint(endpoint: &str) -> Result<Url> {
    let endpoint = endpoint.trim();
    if endpoint.is_empty() {
        return Err(FolioError::MissingSetting("endpoint"));
    }
    let candidate = if endpoint.contains("://") {
        endpoint.to_string()
    } else {
        format!("https://{endpoint}")
    };
    let url = Url::parse(&candidate).map_err(|e| FolioError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        message: e.to_string(),
    })?;
    if url.host_str().is_none() {
        return Err(FolioError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            message: "missing host".to_string(),
        });
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schemeless_endpoint_defaults_to_https() {
        let url = parse_endpoint("folio.example.org").unwrap();
        assert_eq!(url.as_str(), "https://folio.example.org/");
        let url = parse_endpoint("http://localhost:9130").unwrap();
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.port(), Some(9130));
    }

    #[test]
    fn test_invalid_endpoints() {
        assert!(matches!(
            parse_endpoint("  "),
            Err(FolioError::MissingSetting("endpoint"))
        ));
        assert!(matches!(
            parse_endpoint("https://"),
            Err(FolioError::InvalidEndpoint { .. })
        ));
    }

    #[test]
    fn test_url_joins_paths() {
        let config = FolioConfig::new("https://folio.example.org/okapi/", "diku", "admin", "pw")
            .unwrap();
        assert_eq!(
            config.url("/user-import"),
            "https://folio.example.org/okapi/user-import"
        );
    }

    #[test]
    fn test_empty_settings_rejected() {
        let err = FolioConfig::new("folio.example.org", "diku", "admin", "").unwrap_err();
        assert_eq!(err.to_string(), "FOLIO password is required");
    }

    #[test]
    fn test_debug_hides_password() {
        let config = FolioConfig::new("folio.example.org", "diku", "admin", "s3cret").unwrap();
        assert!(!format!("{config:?}").contains("s3cret"));
    }
}
