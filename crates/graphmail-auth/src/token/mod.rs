//! Access token types.

use crate::error::{Error, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Bearer token issued by the token endpoint.
///
/// Expiry is informational: nothing in this workspace enforces it, callers
/// re-authenticate when the remote service starts rejecting the token.
#[derive(Clone, Serialize, Deserialize)]
pub struct AccessToken {
    /// Access token string.
    pub access_token: String,
    /// Token type (usually "Bearer").
    pub token_type: String,
    /// Expiration time, when the server reported one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Scope granted by the authorization server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl AccessToken {
    /// Creates a bearer token.
    #[must_use]
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: "Bearer".to_string(),
            expires_at: None,
            scope: None,
        }
    }

    /// Creates a token from a token endpoint response.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResponseShape`] if the response has no usable
    /// `access_token`.
    pub fn from_response(response: TokenResponse) -> Result<Self> {
        let access_token = response
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| Error::ResponseShape("missing access_token".into()))?;

        let expires_at = response
            .expires_in
            .map(|secs| Utc::now() + Duration::seconds(i64::from(secs)));

        Ok(Self {
            access_token,
            token_type: response.token_type.unwrap_or_else(|| "Bearer".to_string()),
            expires_at,
            scope: response.scope,
        })
    }

    /// Returns the raw bearer string.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.access_token
    }

    /// Checks if the token is expired (with 60 second buffer).
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|exp| Utc::now() + Duration::seconds(60) >= exp)
    }

    /// Sets the expiration time.
    #[must_use]
    pub const fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Token response from the token endpoint.
///
/// Every field is optional so that a body missing `access_token` is reported
/// as a shape error rather than a decode error.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TokenResponse {
    /// Access token.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Token type.
    #[serde(default)]
    pub token_type: Option<String>,
    /// Expires in seconds.
    #[serde(default)]
    pub expires_in: Option<u32>,
    /// Scope.
    #[serde(default)]
    pub scope: Option<String>,
}

/// Error body returned by the token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    /// Error code.
    pub error: String,
    /// Error description.
    #[serde(default)]
    pub error_description: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_token_from_response() {
        let response: TokenResponse = serde_json::from_str(
            r#"{"token_type":"Bearer","expires_in":3599,"ext_expires_in":3599,"access_token":"eyJ0eXAi"}"#,
        )
        .unwrap();

        let token = AccessToken::from_response(response).unwrap();
        assert_eq!(token.secret(), "eyJ0eXAi");
        assert_eq!(token.token_type, "Bearer");
        assert!(token.expires_at.is_some());
        assert!(!token.is_expired());
    }

    #[test]
    fn test_token_missing_access_token() {
        let response: TokenResponse =
            serde_json::from_str(r#"{"token_type":"Bearer","expires_in":3599}"#).unwrap();
        let err = AccessToken::from_response(response).unwrap_err();
        assert!(matches!(err, Error::ResponseShape(_)));
    }

    #[test]
    fn test_token_empty_access_token() {
        let response = TokenResponse {
            access_token: Some(String::new()),
            ..TokenResponse::default()
        };
        assert!(matches!(
            AccessToken::from_response(response),
            Err(Error::ResponseShape(_))
        ));
    }

    #[test]
    fn test_token_expiration() {
        let expired =
            AccessToken::new("abc").with_expires_at(Utc::now() - Duration::seconds(120));
        assert!(expired.is_expired());

        let valid = AccessToken::new("abc").with_expires_at(Utc::now() + Duration::seconds(3600));
        assert!(!valid.is_expired());

        assert!(!AccessToken::new("abc").is_expired());
    }

    #[test]
    fn test_token_debug_redacts_secret() {
        let token = AccessToken::new("super-secret-value");
        let debug = format!("{token:?}");
        assert!(!debug.contains("super-secret-value"));
        assert!(debug.contains("<redacted>"));
    }
}
