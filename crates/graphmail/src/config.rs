//! Client configuration types.

use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};

/// Microsoft Graph v1.0 endpoint for the global Azure cloud.
pub const GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Graph client configuration.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// API root; `users/{mailbox}/...` paths are appended to it.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl GraphConfig {
    /// Creates the default configuration for the global Graph endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if URL parsing fails.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Creates a configuration builder.
    #[must_use]
    pub fn builder() -> GraphConfigBuilder {
        GraphConfigBuilder::new()
    }
}

/// Builder for [`GraphConfig`].
#[derive(Debug, Clone)]
pub struct GraphConfigBuilder {
    base_url: String,
    timeout: Duration,
    user_agent: String,
}

impl GraphConfigBuilder {
    /// Creates a builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: GRAPH_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("graphmail/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Sets the API root (national clouds, proxies, test servers).
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the `User-Agent` header.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse or cannot carry path
    /// segments, or if the timeout is zero.
    pub fn build(self) -> Result<GraphConfig> {
        let base_url = Url::parse(&self.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidInput(format!(
                "{} is not a base URL",
                self.base_url
            )));
        }
        if self.timeout.is_zero() {
            return Err(Error::InvalidInput("timeout must be non-zero".into()));
        }

        Ok(GraphConfig {
            base_url,
            timeout: self.timeout,
            user_agent: self.user_agent,
        })
    }
}

impl Default for GraphConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GraphConfig::new().unwrap();
        assert_eq!(config.base_url.as_str(), GRAPH_BASE_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.user_agent.starts_with("graphmail/"));
    }

    #[test]
    fn test_builder_overrides() {
        let config = GraphConfig::builder()
            .base_url("https://graph.microsoft.us/v1.0")
            .timeout(Duration::from_secs(5))
            .user_agent("ir-team/1.0")
            .build()
            .unwrap();

        assert_eq!(config.base_url.host_str(), Some("graph.microsoft.us"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "ir-team/1.0");
    }

    #[test]
    fn test_builder_rejects_bad_values() {
        assert!(matches!(
            GraphConfig::builder().base_url("not a url").build(),
            Err(Error::UrlError(_))
        ));
        assert!(matches!(
            GraphConfig::builder().base_url("mailto:a@b.c").build(),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            GraphConfig::builder().timeout(Duration::ZERO).build(),
            Err(Error::InvalidInput(_))
        ));
    }
}
