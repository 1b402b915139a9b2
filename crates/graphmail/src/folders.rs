//! Mail folder lookups.

use std::collections::HashMap;

use graphmail_auth::AccessToken;
use serde::{Deserialize, Serialize};

use crate::client::{Collection, GraphClient, Identified, require};
use crate::error::Result;
use crate::ids::FolderId;

/// Folder display name mapped to folder id.
///
/// Built fresh on every call. When two folders share a display name the one
/// the server listed last wins.
pub type FolderMap = HashMap<String, FolderId>;

/// A mail folder as returned by the `mailFolders` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailFolder {
    /// Folder identifier.
    pub id: FolderId,
    /// Display name (e.g. "Inbox", "Sent Items").
    pub display_name: String,
    /// Parent folder identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_folder_id: Option<FolderId>,
    /// Number of immediate child folders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_folder_count: Option<u32>,
    /// Number of items in the folder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_item_count: Option<u32>,
    /// Number of unread items in the folder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unread_item_count: Option<u32>,
}

/// Builds a [`FolderMap`], later entries overwriting earlier ones.
fn into_folder_map(folders: Vec<MailFolder>) -> FolderMap {
    folders
        .into_iter()
        .map(|folder| (folder.display_name, folder.id))
        .collect()
}

impl GraphClient {
    /// Lists the top-level folders of `mailbox` as a name → id map.
    ///
    /// Sends one GET to `users/{mailbox}/mailFolders`. Only the first page
    /// the server returns is read.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Request`] on a non-success status and
    /// [`crate::Error::InvalidInput`] for an empty mailbox.
    pub async fn list_folders(&self, mailbox: &str, token: &AccessToken) -> Result<FolderMap> {
        let url = self.mailbox_url(mailbox, &["mailFolders"])?;
        let collection: Collection<MailFolder> =
            self.get_json(url, token, "list_folders").await?;

        tracing::debug!(mailbox, count = collection.value.len(), "Listed folders");
        Ok(into_folder_map(collection.value))
    }

    /// Lists the immediate child folders of `folder_id` as a name → id map.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Request`] on a non-success status.
    pub async fn list_child_folders(
        &self,
        mailbox: &str,
        folder_id: &FolderId,
        token: &AccessToken,
    ) -> Result<FolderMap> {
        require("folder_id", folder_id.as_str())?;
        let url = self.mailbox_url(
            mailbox,
            &["mailFolders", folder_id.as_str(), "childFolders"],
        )?;
        let collection: Collection<MailFolder> =
            self.get_json(url, token, "list_child_folders").await?;

        tracing::debug!(
            mailbox,
            %folder_id,
            count = collection.value.len(),
            "Listed child folders"
        );
        Ok(into_folder_map(collection.value))
    }

    /// Resolves the first folder matching an OData `filter`.
    ///
    /// The filter is passed through untouched, e.g.
    /// `displayName eq 'Inbox'`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if nothing matches and
    /// [`crate::Error::Request`] on a non-success status.
    pub async fn resolve_folder_id(
        &self,
        mailbox: &str,
        filter: &str,
        token: &AccessToken,
    ) -> Result<FolderId> {
        let mut url = self.mailbox_url(mailbox, &["mailFolders"])?;
        url.query_pairs_mut().append_pair("$filter", filter);

        let collection: Collection<Identified<FolderId>> =
            self.get_json(url, token, "resolve_folder_id").await?;
        let id = collection.first_id(|| format!("no folder matches filter: {filter}"))?;

        tracing::debug!(mailbox, %id, "Resolved folder");
        Ok(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_deserialization() {
        let json = r#"{
            "id": "AAMkAGVmMDEz",
            "displayName": "Inbox",
            "parentFolderId": "AAMkAGVmMDEzRoot",
            "childFolderCount": 1,
            "unreadItemCount": 59,
            "totalItemCount": 60,
            "isHidden": false
        }"#;

        let folder: MailFolder = serde_json::from_str(json).unwrap();
        assert_eq!(folder.id, FolderId::from("AAMkAGVmMDEz"));
        assert_eq!(folder.display_name, "Inbox");
        assert_eq!(folder.child_folder_count, Some(1));
        assert_eq!(folder.unread_item_count, Some(59));
    }

    #[test]
    fn test_folder_map_last_duplicate_wins() {
        let folders = ["Inbox", "Sent Items", "Inbox"]
            .into_iter()
            .zip(["A", "B", "C"])
            .map(|(name, id)| MailFolder {
                id: id.into(),
                display_name: name.to_string(),
                parent_folder_id: None,
                child_folder_count: None,
                total_item_count: None,
                unread_item_count: None,
            })
            .collect();

        let map = into_folder_map(folders);
        assert_eq!(map.len(), 2);
        assert_eq!(map["Inbox"], FolderId::from("C"));
        assert_eq!(map["Sent Items"], FolderId::from("B"));
    }
}
