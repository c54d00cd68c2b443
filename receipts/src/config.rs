//! Configuration for the receipt service clients and the view-model.
//!
//! Client settings can be overridden through the environment:
//!
//! | Variable                   | Default                      |
//! |----------------------------|------------------------------|
//! | `RECEIPTS_BASE_URL`        | `https://domain.com/receipts`|
//! | `RECEIPTS_CREATE_ENDPOINT` | `create`                     |
//! | `RECEIPTS_ANALYTICS_URL`   | unset (analytics only logged)|

use reqwest::Url;

use crate::error::ConfigError;

/// Default receipt service base URL.
pub const DEFAULT_BASE_URL: &str = "https://domain.com/receipts";

/// Default path segment appended to the base URL for creates.
pub const DEFAULT_CREATE_ENDPOINT: &str = "create";

const BASE_URL_VAR: &str = "RECEIPTS_BASE_URL";
const CREATE_ENDPOINT_VAR: &str = "RECEIPTS_CREATE_ENDPOINT";
const ANALYTICS_URL_VAR: &str = "RECEIPTS_ANALYTICS_URL";

/// Where the live clients send their requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: Url,
    create_endpoint: String,
    analytics_url: Option<Url>,
}

impl ClientConfig {
    /// Builds a configuration for the service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if `base_url` does not parse or
    /// cannot carry a path (e.g. `mailto:`).
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base("base_url", base_url)?,
            create_endpoint: DEFAULT_CREATE_ENDPOINT.to_string(),
            analytics_url: None,
        })
    }

    /// Reads the configuration from `RECEIPTS_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if a URL variable is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, falling back to defaults for
    /// missing or empty values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if a URL value is malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let mut config = match read(BASE_URL_VAR) {
            Some(base_url) => Self::new(&base_url)?,
            None => Self::default(),
        };
        if let Some(endpoint) = read(CREATE_ENDPOINT_VAR) {
            config = config.with_create_endpoint(endpoint);
        }
        if let Some(analytics_url) = read(ANALYTICS_URL_VAR) {
            config = config.with_analytics_url(&analytics_url)?;
        }
        Ok(config)
    }

    /// Replaces the create endpoint.
    #[must_use]
    pub fn with_create_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.create_endpoint = endpoint.into();
        self
    }

    /// Sets the URL analytics events are posted to.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if `url` does not parse.
    pub fn with_analytics_url(mut self, url: &str) -> Result<Self, ConfigError> {
        let parsed = Url::parse(url).map_err(|e| ConfigError::InvalidUrl {
            setting: "analytics_url",
            reason: e.to_string(),
        })?;
        self.analytics_url = Some(parsed);
        Ok(self)
    }

    /// URL receipts are fetched from.
    #[must_use]
    pub const fn fetch_url(&self) -> &Url {
        &self.base_url
    }

    /// URL receipts are created at: the base URL with the create endpoint
    /// appended as path segments.
    #[must_use]
    pub fn create_url(&self) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(self.create_endpoint.split('/').filter(|s| !s.is_empty()));
        }
        url
    }

    /// URL analytics events are posted to, if any.
    #[must_use]
    pub const fn analytics_url(&self) -> Option<&Url> {
        self.analytics_url.as_ref()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL).unwrap_or_else(|_| unreachable!("default base URL is valid"))
    }
}

fn parse_base(setting: &'static str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
        setting,
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl {
            setting,
            reason: format!("{value} cannot carry a path"),
        });
    }
    Ok(url)
}

/// What to do with a fetch result that arrives after a newer fetch was
/// issued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StaleFetchPolicy {
    /// Apply every result in arrival order
    #[default]
    LastWriterWins,
    /// Ignore results older than one already applied
    DropStale,
}

/// View-model behaviour switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewModelConfig {
    /// Handling of out-of-order fetch results
    pub stale_fetches: StaleFetchPolicy,
}

impl ViewModelConfig {
    /// Sets the stale fetch policy.
    #[must_use]
    pub const fn with_stale_fetches(mut self, policy: StaleFetchPolicy) -> Self {
        self.stale_fetches = policy;
        self
    }
}
