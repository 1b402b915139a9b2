//! Error types for token acquisition.

use crate::token::ErrorResponse;

/// Result type alias for authentication operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Authentication error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The token endpoint answered with a non-success status.
    #[error("Authentication failed with HTTP {status}: {body}")]
    Authentication {
        /// HTTP status code returned by the token endpoint.
        status: u16,
        /// Raw response body, kept for diagnostics.
        body: String,
    },

    /// A success response did not have the expected shape.
    #[error("Invalid token response: {0}")]
    ResponseShape(String),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid configuration or input.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// URL parsing error.
    #[error("URL error: {0}")]
    UrlError(#[from] url::ParseError),
}

impl Error {
    /// Creates an authentication error from a status code and raw body.
    #[must_use]
    pub fn authentication(status: u16, body: impl Into<String>) -> Self {
        Self::Authentication {
            status,
            body: body.into(),
        }
    }

    /// Returns the HTTP status carried by the error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the `OAuth2` error code (e.g. `invalid_client`) when the
    /// token endpoint sent a JSON error body.
    #[must_use]
    pub fn oauth_error_code(&self) -> Option<String> {
        match self {
            Self::Authentication { body, .. } => serde_json::from_str::<ErrorResponse>(body)
                .ok()
                .map(|response| response.error),
            _ => None,
        }
    }
}
