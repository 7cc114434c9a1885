//! Client configuration.

use std::fmt;

use url::Url;

use crate::error::{WizarrError, WizarrResult};
use crate::retry::RetryPolicy;

/// Public Wizarr instance used when no base URL is supplied.
pub const DEFAULT_BASE_URL: &str = "https://invite.rarbg.zip";

/// Path of the create-invitation endpoint, relative to the base URL.
pub const INVITATIONS_PATH: &str = "/api/invitations";

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

fn default_user_agent() -> String {
    format!("wizarr-client/{}", env!("CARGO_PKG_VERSION"))
}

/// Connection settings for [`crate::HttpTransport`].
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL, normalized: scheme present, no trailing slash.
    pub base_url: String,
    /// Static API key sent with every request.
    pub api_key: String,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    pub user_agent: String,
    pub retry: RetryPolicy,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("retry", &self.retry)
            .finish()
    }
}

impl ClientConfig {
    /// Create a config for `base_url` authenticated with `api_key`.
    ///
    /// A missing scheme defaults to `https://` and trailing slashes are
    /// stripped.
    pub fn new(base_url: impl AsRef<str>, api_key: impl Into<String>) -> WizarrResult<Self> {
        let config = Self {
            base_url: normalize_base_url(base_url.as_ref())?,
            api_key: api_key.into(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agent: default_user_agent(),
            retry: RetryPolicy::default(),
        };
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    /// Check the fields a caller may have edited directly.
    pub fn validate(&self) -> WizarrResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(WizarrError::InvalidConfig(
                "API key must not be empty".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(WizarrError::InvalidConfig(
                "timeout must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }

    /// Full URL of the create-invitation endpoint.
    #[must_use]
    pub fn invitations_url(&self) -> String {
        format!("{}{}", self.base_url, INVITATIONS_PATH)
    }
}

/// Add `https://` when no scheme is present, drop trailing slashes, and make
/// sure the result parses as an http(s) URL.
pub fn normalize_base_url(raw: &str) -> WizarrResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(WizarrError::InvalidConfig(
            "base URL must not be empty".to_string(),
        ));
    }

    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else if let Some((scheme, _)) = trimmed.split_once("://") {
        return Err(WizarrError::InvalidConfig(format!(
            "base URL scheme {scheme:?} is not supported; use http or https"
        )));
    } else {
        format!("https://{trimmed}")
    };

    let parsed = Url::parse(&with_scheme)
        .map_err(|e| WizarrError::InvalidConfig(format!("invalid base URL {raw:?}: {e}")))?;
    if parsed.host_str().is_none() {
        return Err(WizarrError::InvalidConfig(format!(
            "base URL {raw:?} has no host"
        )));
    }

    Ok(with_scheme.trim_end_matches('/').to_string())
}
