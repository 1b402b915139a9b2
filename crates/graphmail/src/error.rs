//! Error types for mailbox operations.

use thiserror::Error;

/// Errors that can occur in mailbox operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Token acquisition failed.
    #[error(transparent)]
    Auth(#[from] graphmail_auth::Error),

    /// A data request failed: the endpoint answered with a non-success
    /// status, or the exchange broke off (connect failure, timeout, reset).
    #[error("Request failed ({}): {body}", describe_status(.status.as_ref()))]
    Request {
        /// HTTP status code, `None` when no response arrived.
        status: Option<u16>,
        /// Raw response body, or the transport failure message.
        body: String,
        /// Underlying transport error, if any.
        #[source]
        source: Option<reqwest::Error>,
    },

    /// A filter or collection lookup matched nothing.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A success response lacked an expected field or was not decodable.
    #[error("Unexpected response: {0}")]
    ResponseShape(String),

    /// Caller-supplied argument rejected before any request was sent.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// URL parsing error.
    #[error("URL error: {0}")]
    UrlError(#[from] url::ParseError),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Request {
            status: err.status().map(|s| s.as_u16()),
            body: err.to_string(),
            source: Some(err),
        }
    }
}

fn describe_status(status: Option<&u16>) -> String {
    status.map_or_else(|| "no response".to_string(), |s| format!("HTTP {s}"))
}

impl Error {
    /// Creates a request error from a status code and raw body.
    #[must_use]
    pub fn request(status: u16, body: impl Into<String>) -> Self {
        Self::Request {
            status: Some(status),
            body: body.into(),
            source: None,
        }
    }

    /// Returns true for failed data requests, with or without a response.
    #[must_use]
    pub const fn is_request(&self) -> bool {
        matches!(self, Self::Request { .. })
    }

    /// Returns true for empty filter or collection lookups.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns the HTTP status carried by the error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => *status,
            Self::Auth(err) => err.status(),
            _ => None,
        }
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_predicates() {
        let err = Error::request(404, r#"{"error":{"code":"ErrorItemNotFound"}}"#);
        assert_eq!(err.status(), Some(404));
        assert!(err.is_request());
        assert!(!err.is_not_found());
        assert_eq!(
            err.to_string(),
            r#"Request failed (HTTP 404): {"error":{"code":"ErrorItemNotFound"}}"#
        );

        let err = Error::NotFound("no folder matches filter".into());
        assert!(err.is_not_found());
        assert!(!err.is_request());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_describe_status_without_response() {
        assert_eq!(describe_status(None), "no response");
        assert_eq!(describe_status(Some(&503)), "HTTP 503");
    }

    #[test]
    fn test_auth_error_keeps_its_kind() {
        let err: Error = graphmail_auth::Error::authentication(401, "denied").into();
        assert!(matches!(err, Error::Auth(graphmail_auth::Error::Authentication { .. })));
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.to_string(), "Authentication failed with HTTP 401: denied");
    }
}
