//! Message listing and detail retrieval.

use graphmail_auth::AccessToken;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::client::{Collection, GraphClient, Identified, require};
use crate::error::{Error, Result};
use crate::ids::{FolderId, MessageId};

/// Page size sent as `$top` when the caller does not pick one.
///
/// Graph itself defaults to 10, which is rarely what an investigation wants.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Fields requested by [`GraphClient::get_message_detail`] when no explicit
/// selection is given: identifiers, participants, timestamps, content,
/// transport headers, flags and extended properties.
pub const DEFAULT_MESSAGE_FIELDS: &[&str] = &[
    "id",
    "changeKey",
    "categories",
    "createdDateTime",
    "lastModifiedDateTime",
    "subject",
    "body",
    "importance",
    "hasAttachments",
    "parentFolderId",
    "from",
    "sender",
    "toRecipients",
    "ccRecipients",
    "bccRecipients",
    "replyTo",
    "conversationId",
    "conversationIndex",
    "receivedDateTime",
    "sentDateTime",
    "isDeliveryReceiptRequested",
    "isReadReceiptRequested",
    "isRead",
    "isDraft",
    "webLink",
    "internetMessageId",
    "internetMessageHeaders",
    "flag",
    "inferenceClassification",
    "uniqueBody",
    "singleValueExtendedProperties",
    "multiValueExtendedProperties",
];

/// Options for [`GraphClient::list_messages`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListMessagesOptions {
    /// OData `$filter`, passed through unmodified.
    pub filter: Option<String>,
    /// `$top` page size, forwarded verbatim (0 is allowed).
    pub top: u32,
}

impl ListMessagesOptions {
    /// Creates options with no filter and [`DEFAULT_PAGE_SIZE`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            filter: None,
            top: DEFAULT_PAGE_SIZE,
        }
    }

    /// Sets the OData filter.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Sets the page size.
    #[must_use]
    pub const fn with_top(mut self, top: u32) -> Self {
        self.top = top;
        self
    }
}

impl Default for ListMessagesOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Options for [`GraphClient::get_message_detail`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageDetailOptions {
    /// Fields for `$select`; `None` means [`DEFAULT_MESSAGE_FIELDS`].
    pub select: Option<Vec<String>>,
}

impl MessageDetailOptions {
    /// Selects an explicit field list.
    #[must_use]
    pub fn with_select<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            select: Some(fields.into_iter().map(Into::into).collect()),
        }
    }

    /// Returns the comma-joined `$select` value.
    #[must_use]
    pub fn select_param(&self) -> String {
        self.select
            .as_ref()
            .map_or_else(|| DEFAULT_MESSAGE_FIELDS.join(","), |fields| fields.join(","))
    }
}

/// One page of a message listing, decoded but not reshaped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageCollection {
    /// `@odata.context` metadata URL.
    #[serde(
        rename = "@odata.context",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub context: Option<String>,
    /// Message records in server order.
    #[serde(default)]
    pub value: Vec<Value>,
    /// Link to the next page, for the caller to follow.
    #[serde(
        rename = "@odata.nextLink",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub next_link: Option<String>,
    /// Any other top-level field the server sent.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MessageCollection {
    /// Number of messages on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// Returns true if the page holds no messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Ids of the messages on this page that carry one.
    #[must_use]
    pub fn message_ids(&self) -> Vec<MessageId> {
        self.value
            .iter()
            .filter_map(|message| message.get("id").and_then(Value::as_str))
            .map(MessageId::from)
            .collect()
    }
}

/// Selected fields of one message, keyed by Graph field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageDetail(pub Map<String, Value>);

impl MessageDetail {
    /// Returns a field by its Graph name.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Message subject, when selected and present.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.get("subject").and_then(Value::as_str)
    }

    /// `hasAttachments` flag, when selected.
    #[must_use]
    pub fn has_attachments(&self) -> Option<bool> {
        self.get("hasAttachments").and_then(Value::as_bool)
    }

    /// Number of fields returned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the server returned no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the underlying map.
    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl GraphClient {
    /// Lists one page of messages in a folder.
    ///
    /// `$top` is always sent; `$filter` only when set. No paging loop runs:
    /// follow [`MessageCollection::next_link`] with
    /// [`GraphClient::next_messages_page`] to read further.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Request`] on a non-success status.
    pub async fn list_messages(
        &self,
        mailbox: &str,
        folder_id: &FolderId,
        token: &AccessToken,
        options: &ListMessagesOptions,
    ) -> Result<MessageCollection> {
        let mut url = self.messages_url(mailbox, folder_id)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("$top", &options.top.to_string());
            if let Some(filter) = &options.filter {
                pairs.append_pair("$filter", filter);
            }
        }

        let page: MessageCollection = self.get_json(url, token, "list_messages").await?;
        tracing::debug!(
            mailbox,
            %folder_id,
            count = page.len(),
            has_next = page.next_link.is_some(),
            "Listed messages"
        );
        Ok(page)
    }

    /// Fetches the page behind an `@odata.nextLink`.
    ///
    /// The link must point at the configured API host; the bearer token is
    /// never sent anywhere else.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for a foreign or malformed link and
    /// [`Error::Request`] on a non-success status.
    pub async fn next_messages_page(
        &self,
        next_link: &str,
        token: &AccessToken,
    ) -> Result<MessageCollection> {
        let url = Url::parse(next_link)?;
        if url.origin() != self.config().base_url.origin() {
            return Err(Error::InvalidInput(format!(
                "next link {next_link} does not belong to {}",
                self.config().base_url
            )));
        }

        let page: MessageCollection = self.get_json(url, token, "next_messages_page").await?;
        tracing::debug!(count = page.len(), "Listed next message page");
        Ok(page)
    }

    /// Resolves the first message in a folder matching an OData `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if nothing matches and [`Error::Request`]
    /// on a non-success status.
    pub async fn resolve_message_id(
        &self,
        mailbox: &str,
        folder_id: &FolderId,
        filter: &str,
        token: &AccessToken,
    ) -> Result<MessageId> {
        let mut url = self.messages_url(mailbox, folder_id)?;
        url.query_pairs_mut().append_pair("$filter", filter);

        let collection: Collection<Identified<MessageId>> =
            self.get_json(url, token, "resolve_message_id").await?;
        let id = collection.first_id(|| format!("no message matches filter: {filter}"))?;

        tracing::debug!(mailbox, %folder_id, %id, "Resolved message");
        Ok(id)
    }

    /// Fetches selected fields of one message.
    ///
    /// A missing message surfaces as [`Error::Request`] with status 404, like
    /// any other non-success status.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Request`] on a non-success status and
    /// [`Error::InvalidInput`] for an empty field selection.
    pub async fn get_message_detail(
        &self,
        mailbox: &str,
        folder_id: &FolderId,
        message_id: &MessageId,
        token: &AccessToken,
        options: &MessageDetailOptions,
    ) -> Result<MessageDetail> {
        if options.select.as_ref().is_some_and(Vec::is_empty) {
            return Err(Error::InvalidInput("select field list is empty".into()));
        }
        require("message_id", message_id.as_str())?;

        let mut url = self.messages_url(mailbox, folder_id)?;
        url.path_segments_mut()
            .map_err(|()| Error::InvalidInput("messages URL cannot be a base".into()))?
            .push(message_id.as_str());
        url.query_pairs_mut()
            .append_pair("$select", &options.select_param());

        let detail: MessageDetail = self.get_json(url, token, "get_message_detail").await?;
        tracing::debug!(mailbox, %message_id, fields = detail.len(), "Fetched message detail");
        Ok(detail)
    }

    /// `users/{mailbox}/mailFolders/{folder_id}/messages`
    fn messages_url(&self, mailbox: &str, folder_id: &FolderId) -> Result<Url> {
        require("folder_id", folder_id.as_str())?;
        self.mailbox_url(mailbox, &["mailFolders", folder_id.as_str(), "messages"])
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_list_options_defaults() {
        let options = ListMessagesOptions::default();
        assert_eq!(options.top, 100);
        assert!(options.filter.is_none());

        let options = ListMessagesOptions::new()
            .with_filter("isRead eq false")
            .with_top(0);
        assert_eq!(options.top, 0);
        assert_eq!(options.filter.as_deref(), Some("isRead eq false"));
    }

    #[test]
    fn test_select_param_defaults_to_forensic_fields() {
        let param = MessageDetailOptions::default().select_param();
        assert!(param.starts_with("id,changeKey,categories,"));
        assert!(param.contains("internetMessageHeaders"));
        assert_eq!(param.split(',').count(), DEFAULT_MESSAGE_FIELDS.len());
    }

    #[test]
    fn test_select_param_override() {
        let options = MessageDetailOptions::with_select(["subject", "from"]);
        assert_eq!(options.select_param(), "subject,from");
    }

    #[test]
    fn test_message_collection_keeps_unknown_fields() {
        let json = r#"{
            "@odata.context": "https://graph.microsoft.com/v1.0/$metadata#users('a')/messages",
            "@odata.count": 2,
            "value": [{"id": "m1", "subject": "hi"}, {"subject": "no id"}],
            "@odata.nextLink": "https://graph.microsoft.com/v1.0/users/a/messages?$skip=2"
        }"#;

        let page: MessageCollection = serde_json::from_str(json).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page.message_ids(), vec![MessageId::from("m1")]);
        assert!(page.next_link.as_deref().unwrap().ends_with("$skip=2"));
        assert_eq!(page.extra["@odata.count"], 2);
        assert!(page.context.is_some());
    }

    #[test]
    fn test_message_detail_accessors() {
        let detail: MessageDetail =
            serde_json::from_str(r#"{"id":"m1","subject":"Invoice","hasAttachments":true}"#)
                .unwrap();
        assert_eq!(detail.subject(), Some("Invoice"));
        assert_eq!(detail.has_attachments(), Some(true));
        assert_eq!(detail.len(), 3);
        assert!(detail.into_inner().contains_key("id"));
    }
}
