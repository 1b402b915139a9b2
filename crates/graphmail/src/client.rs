//! Graph API HTTP client.
//!
//! Holds the configuration and a pooled `reqwest` client. Operations live in
//! the `folders`, `messages` and `attachments` modules as `impl` blocks on
//! [`GraphClient`].

use graphmail_auth::AccessToken;
use reqwest::{Client, Response, header};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::GraphConfig;
use crate::error::{Error, Result};

/// Read-only Microsoft Graph mailbox client.
///
/// The client has no mutable state. Cloning is cheap and clones share the
/// connection pool, so operations can run concurrently from many tasks.
#[derive(Debug, Clone)]
pub struct GraphClient {
    config: GraphConfig,
    http_client: Client,
}

impl GraphClient {
    /// Creates a client with the given configuration.
    #[must_use]
    pub fn new(config: GraphConfig) -> Self {
        Self {
            config,
            http_client: Client::new(),
        }
    }

    /// Creates a client for the global Graph endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the default configuration cannot be built.
    pub fn microsoft() -> Result<Self> {
        Ok(Self::new(GraphConfig::new()?))
    }

    /// Uses a caller-provided HTTP client (connection pool, proxy settings).
    #[must_use]
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http_client = client;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Builds `{base}/users/{mailbox}/{segments...}`.
    ///
    /// Every segment is percent-encoded on its own, so ids containing `/`
    /// or `%` cannot escape their position in the path.
    pub(crate) fn mailbox_url(&self, mailbox: &str, segments: &[&str]) -> Result<Url> {
        require("mailbox", mailbox)?;

        let mut url = self.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                Error::InvalidInput(format!("{} is not a base URL", self.config.base_url))
            })?
            .pop_if_empty()
            .push("users")
            .push(mailbox)
            .extend(segments);
        Ok(url)
    }

    /// Sends a GET and classifies the status.
    ///
    /// Any non-success status becomes [`Error::Request`] carrying the raw
    /// body. Transport failures become [`Error::Request`] without a status.
    async fn send_get(&self, url: Url, token: &AccessToken, operation: &str) -> Result<Response> {
        let response = self
            .http_client
            .get(url)
            .bearer_auth(token.secret())
            .header(header::ACCEPT, "application/json")
            .header(header::USER_AGENT, &self.config.user_agent)
            .timeout(self.config.timeout)
            .send()
            .await
            .inspect_err(|e| tracing::warn!(operation, error = %e, "Graph request failed"))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        tracing::warn!(operation, status = status.as_u16(), "Graph request failed");
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(operation, error = %e, "Failed to read error body");
                String::new()
            }
        };
        Err(Error::request(status.as_u16(), body))
    }

    /// Sends a GET and decodes the JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        token: &AccessToken,
        operation: &str,
    ) -> Result<T> {
        let response = self.send_get(url, token, operation).await?;
        response.json().await.map_err(|e| {
            if e.is_decode() {
                Error::ResponseShape(format!("{operation}: {e}"))
            } else {
                e.into()
            }
        })
    }

    /// Sends a GET and returns the raw body.
    pub(crate) async fn get_bytes(
        &self,
        url: Url,
        token: &AccessToken,
        operation: &str,
    ) -> Result<Vec<u8>> {
        let response = self.send_get(url, token, operation).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

/// Rejects empty caller-supplied identifiers before any request is sent.
///
/// `.` and `..` are rejected too: the URL layer drops them as path segments.
pub(crate) fn require(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::InvalidInput(format!("{field} is empty")));
    }
    if value == "." || value == ".." {
        return Err(Error::InvalidInput(format!("{field} is not a valid path segment")));
    }
    Ok(())
}

/// `{"value": [...]}` envelope used by every Graph collection.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub(crate) struct Collection<T> {
    #[serde(default)]
    pub value: Vec<T>,
}

/// Collection entry decoded only for its id.
#[derive(Debug, Deserialize)]
pub(crate) struct Identified<I> {
    pub id: I,
}

impl<I> Collection<Identified<I>> {
    /// Returns the id of the first entry in server order.
    ///
    /// No ranking is applied: the first element the server returned wins.
    pub fn first_id(self, not_found: impl FnOnce() -> String) -> Result<I> {
        self.value
            .into_iter()
            .next()
            .map(|entry| entry.id)
            .ok_or_else(|| Error::NotFound(not_found()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn client() -> GraphClient {
        GraphClient::microsoft().unwrap()
    }

    #[test]
    fn test_mailbox_url() {
        let url = client()
            .mailbox_url("user@contoso.com", &["mailFolders"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://graph.microsoft.com/v1.0/users/user@contoso.com/mailFolders"
        );
    }

    #[test]
    fn test_mailbox_url_encodes_ids() {
        let url = client()
            .mailbox_url("u@x.io", &["mailFolders", "AA/BB=", "messages"])
            .unwrap();
        assert_eq!(url.path(), "/v1.0/users/u@x.io/mailFolders/AA%2FBB=/messages");
    }

    #[test]
    fn test_mailbox_url_rejects_empty_mailbox() {
        let err = client().mailbox_url("", &["mailFolders"]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_first_id_in_server_order() {
        let collection: Collection<Identified<String>> =
            serde_json::from_str(r#"{"value":[{"id":"b"},{"id":"a"}]}"#).unwrap();
        assert_eq!(collection.first_id(|| "none".into()).unwrap(), "b");
    }

    #[test]
    fn test_collection_of_entries_without_default() {
        let collection: Collection<crate::folders::MailFolder> = serde_json::from_str(
            r#"{"value":[{"id":"A","displayName":"Inbox"},{"id":"B","displayName":"Archive"}]}"#,
        )
        .unwrap();
        assert_eq!(collection.value.len(), 2);
        assert_eq!(collection.value[1].display_name, "Archive");

        let empty: Collection<crate::folders::MailFolder> = serde_json::from_str("{}").unwrap();
        assert!(empty.value.is_empty());
    }

    #[test]
    fn test_first_id_empty_or_missing_value() {
        for body in [r#"{"value":[]}"#, "{}"] {
            let collection: Collection<Identified<String>> = serde_json::from_str(body).unwrap();
            let err = collection.first_id(|| "nothing here".into()).unwrap_err();
            assert!(err.is_not_found());
        }
    }

    proptest! {
        #[test]
        fn prop_mailbox_is_a_single_segment(mailbox in "\\PC{1,40}", id in "\\PC{1,40}") {
            prop_assume!(require("mailbox", &mailbox).is_ok() && require("id", &id).is_ok());
            let url = client().mailbox_url(&mailbox, &["mailFolders", &id]).unwrap();
            let segments: Vec<&str> = url.path_segments().unwrap().collect();
            prop_assert_eq!(segments.len(), 5);
            prop_assert_eq!(segments[0], "v1.0");
            prop_assert_eq!(segments[1], "users");
            prop_assert_eq!(segments[3], "mailFolders");
            prop_assert_eq!(url.host_str(), Some("graph.microsoft.com"));
        }
    }
}
