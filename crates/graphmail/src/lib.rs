//! # graphmail
//!
//! Read-only access to Exchange Online mailboxes through Microsoft Graph,
//! aimed at investigations and email forensics.
//!
//! This crate provides:
//! - Token acquisition (re-exported from `graphmail-auth`)
//! - Folder enumeration and filter-based folder lookup
//! - Message listing, filter-based lookup and field-selected detail
//! - Attachment lookup, metadata and content download
//!
//! Every operation sends one request and returns or fails immediately.
//! There is no retry, no paging loop and no token cache: callers needing
//! those layer them on top.
//!
//! ## Quick Start
//!
//! ```ignore
//! use graphmail::{GraphClient, ListMessagesOptions, MessageDetailOptions, acquire_token};
//!
//! #[tokio::main]
//! async fn main() -> graphmail::Result<()> {
//!     let token = acquire_token("tenant-id", "client-id", "client-secret").await?;
//!     let client = GraphClient::microsoft()?;
//!     let mailbox = "victim@contoso.com";
//!
//!     let inbox = client
//!         .resolve_folder_id(mailbox, "displayName eq 'Inbox'", &token)
//!         .await?;
//!     let page = client
//!         .list_messages(mailbox, &inbox, &token, &ListMessagesOptions::new().with_top(25))
//!         .await?;
//!
//!     for id in page.message_ids() {
//!         let detail = client
//!             .get_message_detail(mailbox, &inbox, &id, &token, &MessageDetailOptions::default())
//!             .await?;
//!         println!("{:?}", detail.subject());
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod attachments;
mod client;
pub mod config;
mod error;
pub mod folders;
pub mod ids;
pub mod messages;

pub use attachments::{AttachmentInfo, AttachmentPayload};
pub use client::GraphClient;
pub use config::{GraphConfig, GraphConfigBuilder};
pub use error::{Error, Result};
pub use folders::{FolderMap, MailFolder};
pub use ids::{AttachmentId, FolderId, MessageId};
pub use messages::{
    DEFAULT_MESSAGE_FIELDS, DEFAULT_PAGE_SIZE, ListMessagesOptions, MessageCollection,
    MessageDetail, MessageDetailOptions,
};

pub use graphmail_auth::{
    AccessToken, Authority, ClientCredentials, ClientCredentialsFlow, acquire_token,
};
