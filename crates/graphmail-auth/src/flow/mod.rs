//! Client-credentials grant (`OAuth2` app-only flow).

use crate::authority::Authority;
use crate::error::{Error, Result};
use crate::token::{AccessToken, TokenResponse};
use reqwest::Client;
use std::time::Duration;

/// Default timeout for a token request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Application credentials registered in a tenant.
#[derive(Clone)]
pub struct ClientCredentials {
    /// Directory (tenant) ID or verified domain.
    pub tenant_id: String,
    /// Application (client) ID.
    pub client_id: String,
    /// Client secret.
    client_secret: String,
}

impl ClientCredentials {
    /// Creates a credential triple.
    #[must_use]
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Returns the client secret.
    #[must_use]
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// Checks that no field is empty. Format is left to the remote service.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] naming the first empty field.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("tenant_id", &self.tenant_id),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
        ] {
            if value.is_empty() {
                return Err(Error::InvalidConfig(format!("{field} is empty")));
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Exchanges application credentials for a bearer token.
///
/// Each call sends exactly one request. Nothing is cached: a second call
/// performs a second exchange.
#[derive(Debug, Clone)]
pub struct ClientCredentialsFlow {
    authority: Authority,
    timeout: Duration,
    http_client: Client,
}

impl ClientCredentialsFlow {
    /// Creates a flow against the given authority.
    #[must_use]
    pub fn new(authority: Authority) -> Self {
        Self {
            authority,
            timeout: DEFAULT_TIMEOUT,
            http_client: Client::new(),
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Uses a caller-provided HTTP client (connection pool, proxy settings).
    #[must_use]
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http_client = client;
        self
    }

    /// Returns the configured authority.
    #[must_use]
    pub const fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Requests a token with the client-credentials grant.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidConfig`] if a credential field is empty.
    /// - [`Error::Authentication`] if the token endpoint answers with a
    ///   non-success status.
    /// - [`Error::ResponseShape`] if a success body has no usable token.
    /// - [`Error::Http`] on transport failure.
    pub async fn acquire_token(&self, credentials: &ClientCredentials) -> Result<AccessToken> {
        credentials.validate()?;
        self.authority.validate()?;

        let token_url = self.authority.token_url(&credentials.tenant_id)?;
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret()),
            ("scope", self.authority.scope.as_str()),
        ];

        tracing::debug!(
            authority = %self.authority.name,
            tenant = %credentials.tenant_id,
            client_id = %credentials.client_id,
            "Requesting client-credentials token"
        );

        let response = self
            .http_client
            .post(token_url)
            .timeout(self.timeout)
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Token request rejected");
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!(error = %e, "Failed to read token error body");
                    String::new()
                }
            };
            return Err(Error::authentication(status.as_u16(), body));
        }

        let token_response: TokenResponse = response.json().await.map_err(|e| {
            if e.is_decode() {
                Error::ResponseShape(format!("token response is not JSON: {e}"))
            } else {
                Error::Http(e)
            }
        })?;
        let token = AccessToken::from_response(token_response)?;

        tracing::debug!(expires_at = ?token.expires_at, "Token acquired");
        Ok(token)
    }
}

/// Acquires a Microsoft Graph token for `tenant_id` using the global Azure
/// authority and default settings.
///
/// # Errors
///
/// See [`ClientCredentialsFlow::acquire_token`].
pub async fn acquire_token(
    tenant_id: &str,
    client_id: &str,
    client_secret: &str,
) -> Result<AccessToken> {
    let credentials = ClientCredentials::new(tenant_id, client_id, client_secret);
    ClientCredentialsFlow::new(Authority::microsoft()?)
        .acquire_token(&credentials)
        .await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_validate() {
        ClientCredentials::new("t", "c", "s").validate().unwrap();

        let err = ClientCredentials::new("t", "", "s").validate().unwrap_err();
        assert_eq!(err.to_string(), "Invalid configuration: client_id is empty");

        let err = ClientCredentials::new("", "c", "").validate().unwrap_err();
        assert_eq!(err.to_string(), "Invalid configuration: tenant_id is empty");
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let credentials = ClientCredentials::new("tenant", "client", "hunter2");
        let debug = format!("{credentials:?}");
        assert!(debug.contains("tenant"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_flow_creation() {
        let flow = ClientCredentialsFlow::new(Authority::microsoft().unwrap())
            .with_timeout(Duration::from_secs(5));
        assert_eq!(flow.authority().name, "Microsoft");
        assert_eq!(flow.timeout, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_empty_secret_fails_before_network() {
        let err = acquire_token("tenant", "client", "").await.unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}
