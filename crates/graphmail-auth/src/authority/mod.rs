//! Token authority configurations.

use crate::error::{Error, Result};
use url::Url;

/// Default scope requesting every application permission granted to the app
/// on Microsoft Graph.
pub const GRAPH_DEFAULT_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Identity platform host for the global Azure cloud.
pub const MICROSOFT_LOGIN_HOST: &str = "https://login.microsoftonline.com";

/// Token authority configuration.
#[derive(Debug, Clone)]
pub struct Authority {
    /// Authority name (e.g., "Microsoft").
    pub name: String,
    /// Login host; tenant-scoped token URLs are built beneath it.
    pub host: Url,
    /// Scope requested with the client-credentials grant.
    pub scope: String,
}

impl Authority {
    /// Creates a new authority configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the host URL is invalid.
    pub fn new(
        name: impl Into<String>,
        host: impl AsRef<str>,
        scope: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            host: Url::parse(host.as_ref())?,
            scope: scope.into(),
        })
    }

    /// Microsoft identity platform with the Graph default scope.
    ///
    /// # Errors
    ///
    /// Returns an error if URL parsing fails.
    pub fn microsoft() -> Result<Self> {
        Self::new("Microsoft", MICROSOFT_LOGIN_HOST, GRAPH_DEFAULT_SCOPE)
    }

    /// Sets the requested scope.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Builds the tenant-scoped token endpoint:
    /// `{host}/{tenant_id}/oauth2/v2.0/token`.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot carry path segments.
    pub fn token_url(&self, tenant_id: &str) -> Result<Url> {
        let mut url = self.host.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidConfig(format!("{} is not a base URL", self.host)))?
            .pop_if_empty()
            .extend([tenant_id, "oauth2", "v2.0", "token"]);
        Ok(url)
    }

    /// Validates that required settings are present.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.scope.trim().is_empty() {
            return Err(Error::InvalidConfig("scope is empty".into()));
        }
        if self.host.cannot_be_a_base() {
            return Err(Error::InvalidConfig(format!(
                "{} is not a base URL",
                self.host
            )));
        }
        Ok(())
    }
}
