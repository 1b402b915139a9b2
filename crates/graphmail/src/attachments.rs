//! Attachment metadata and content retrieval.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use graphmail_auth::AccessToken;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::client::{Collection, GraphClient, Identified, require};
use crate::error::{Error, Result};
use crate::ids::{AttachmentId, FolderId, MessageId};

/// One entry of a message's attachment collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentInfo {
    /// Attachment identifier.
    pub id: AttachmentId,
    /// `@odata.type`, e.g. `#microsoft.graph.fileAttachment`.
    #[serde(
        rename = "@odata.type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub odata_type: Option<String>,
    /// File name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// MIME type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Size in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Whether the attachment is inline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_inline: Option<bool>,
}

/// Attachment name, content type and decoded bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentPayload {
    /// File name (empty when the server sent none).
    pub name: String,
    /// MIME type (empty when the server sent none).
    pub content_type: String,
    /// Raw content, decoded from base64.
    pub content: Vec<u8>,
}

/// Attachment resource as sent on the wire.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAttachment {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    content_type: Option<String>,
    #[serde(default)]
    content_bytes: Option<String>,
}

impl TryFrom<RawAttachment> for AttachmentPayload {
    type Error = Error;

    fn try_from(raw: RawAttachment) -> Result<Self> {
        let encoded = raw
            .content_bytes
            .ok_or_else(|| Error::ResponseShape("attachment has no contentBytes".into()))?;
        let content = STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| Error::ResponseShape(format!("contentBytes is not valid base64: {e}")))?;

        Ok(Self {
            name: raw.name.unwrap_or_default(),
            content_type: raw.content_type.unwrap_or_default(),
            content,
        })
    }
}

impl GraphClient {
    /// Lists the attachments of a message in server order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Request`] on a non-success status.
    pub async fn list_attachments(
        &self,
        mailbox: &str,
        folder_id: &FolderId,
        message_id: &MessageId,
        token: &AccessToken,
    ) -> Result<Vec<AttachmentInfo>> {
        let url = self.attachments_url(mailbox, folder_id, message_id, &[])?;
        let collection: Collection<AttachmentInfo> =
            self.get_json(url, token, "list_attachments").await?;

        tracing::debug!(mailbox, %message_id, count = collection.value.len(), "Listed attachments");
        Ok(collection.value)
    }

    /// Resolves the id of the first attachment of a message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the message has no attachments and
    /// [`Error::Request`] on a non-success status.
    pub async fn resolve_attachment_id(
        &self,
        mailbox: &str,
        folder_id: &FolderId,
        message_id: &MessageId,
        token: &AccessToken,
    ) -> Result<AttachmentId> {
        let url = self.attachments_url(mailbox, folder_id, message_id, &[])?;
        let collection: Collection<Identified<AttachmentId>> =
            self.get_json(url, token, "resolve_attachment_id").await?;
        let id = collection.first_id(|| format!("message {message_id} has no attachments"))?;

        tracing::debug!(mailbox, %message_id, %id, "Resolved attachment");
        Ok(id)
    }

    /// Fetches an attachment's name, content type and decoded content.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResponseShape`] if `contentBytes` is absent or not
    /// valid base64, and [`Error::Request`] on a non-success status.
    pub async fn get_attachment_data(
        &self,
        mailbox: &str,
        folder_id: &FolderId,
        message_id: &MessageId,
        attachment_id: &AttachmentId,
        token: &AccessToken,
    ) -> Result<AttachmentPayload> {
        require("attachment_id", attachment_id.as_str())?;
        let url =
            self.attachments_url(mailbox, folder_id, message_id, &[attachment_id.as_str()])?;
        let raw: RawAttachment = self.get_json(url, token, "get_attachment_data").await?;
        let payload = AttachmentPayload::try_from(raw)?;

        tracing::debug!(
            mailbox,
            %attachment_id,
            content_type = %payload.content_type,
            size = payload.content.len(),
            "Fetched attachment"
        );
        Ok(payload)
    }

    /// Downloads an attachment's raw content from its `$value` endpoint.
    ///
    /// Works for item and reference attachments too, which carry no
    /// `contentBytes`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Request`] on a non-success status.
    pub async fn download_attachment_content(
        &self,
        mailbox: &str,
        folder_id: &FolderId,
        message_id: &MessageId,
        attachment_id: &AttachmentId,
        token: &AccessToken,
    ) -> Result<Vec<u8>> {
        require("attachment_id", attachment_id.as_str())?;
        let url = self.attachments_url(
            mailbox,
            folder_id,
            message_id,
            &[attachment_id.as_str(), "$value"],
        )?;
        let content = self
            .get_bytes(url, token, "download_attachment_content")
            .await?;

        tracing::debug!(mailbox, %attachment_id, size = content.len(), "Downloaded attachment");
        Ok(content)
    }

    /// `users/{mailbox}/mailFolders/{folder_id}/messages/{message_id}/attachments/{tail...}`
    fn attachments_url(
        &self,
        mailbox: &str,
        folder_id: &FolderId,
        message_id: &MessageId,
        tail: &[&str],
    ) -> Result<Url> {
        require("folder_id", folder_id.as_str())?;
        require("message_id", message_id.as_str())?;

        let mut segments = vec![
            "mailFolders",
            folder_id.as_str(),
            "messages",
            message_id.as_str(),
            "attachments",
        ];
        segments.extend_from_slice(tail);
        self.mailbox_url(mailbox, &segments)
    }
}
