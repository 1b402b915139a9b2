#![allow(clippy::doc_markdown, clippy::uninlined_format_args)]
//! Example: walk a mailbox the way an investigator would
//!
//! This example demonstrates how to:
//! 1. Acquire an app-only token with the client-credentials grant
//! 2. Enumerate folders and resolve the Inbox
//! 3. List recent messages and pull forensic fields for the first one
//! 4. Save its first attachment to the current directory
//!
//! ## Prerequisites
//!
//! An Entra ID app registration with the `Mail.Read` application permission
//! (admin consented) and a client secret.
//!
//! ```bash
//! export GRAPH_TENANT_ID="contoso.onmicrosoft.com"
//! export GRAPH_CLIENT_ID="app-id"
//! export GRAPH_CLIENT_SECRET="secret"
//! export GRAPH_MAILBOX="user@contoso.com"
//! RUST_LOG=graphmail=debug cargo run --package graphmail --example mailbox_triage
//! ```

use anyhow::Context;
use graphmail::{
    GraphClient, ListMessagesOptions, MessageDetailOptions, acquire_token,
};
use std::env;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "graphmail=info,graphmail_auth=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let tenant_id = env::var("GRAPH_TENANT_ID").context("GRAPH_TENANT_ID not set")?;
    let client_id = env::var("GRAPH_CLIENT_ID").context("GRAPH_CLIENT_ID not set")?;
    let client_secret = env::var("GRAPH_CLIENT_SECRET").context("GRAPH_CLIENT_SECRET not set")?;
    let mailbox = env::var("GRAPH_MAILBOX").context("GRAPH_MAILBOX not set")?;

    println!("Step 1: Acquiring token...");
    let token = acquire_token(&tenant_id, &client_id, &client_secret).await?;
    println!("  Expires at: {:?}\n", token.expires_at);

    let client = GraphClient::microsoft()?;

    println!("Step 2: Folders in {}", mailbox);
    let folders = client.list_folders(&mailbox, &token).await?;
    let mut names: Vec<_> = folders.keys().collect();
    names.sort();
    for name in names {
        println!("  {}", name);
    }

    let inbox = client
        .resolve_folder_id(&mailbox, "displayName eq 'Inbox'", &token)
        .await?;

    println!("\nStep 3: Ten most recent messages");
    let page = client
        .list_messages(&mailbox, &inbox, &token, &ListMessagesOptions::new().with_top(10))
        .await?;
    for message in &page.value {
        println!(
            "  {} | {}",
            message["receivedDateTime"].as_str().unwrap_or("-"),
            message["subject"].as_str().unwrap_or("(no subject)")
        );
    }

    let Some(message_id) = page.message_ids().into_iter().next() else {
        println!("Inbox is empty.");
        return Ok(());
    };

    let detail = client
        .get_message_detail(
            &mailbox,
            &inbox,
            &message_id,
            &token,
            &MessageDetailOptions::default(),
        )
        .await?;
    println!("\nStep 4: {} fields for {:?}", detail.len(), detail.subject());

    if detail.has_attachments() != Some(true) {
        return Ok(());
    }

    let attachment_id = client
        .resolve_attachment_id(&mailbox, &inbox, &message_id, &token)
        .await?;
    let attachment = client
        .get_attachment_data(&mailbox, &inbox, &message_id, &attachment_id, &token)
        .await?;

    let file_name = std::path::Path::new(&attachment.name)
        .file_name()
        .map_or_else(|| "attachment.bin".into(), |n| n.to_string_lossy().into_owned());
    tokio::fs::write(&file_name, &attachment.content).await?;
    println!(
        "  Saved {} ({}, {} bytes)",
        file_name,
        attachment.content_type,
        attachment.content.len()
    );

    Ok(())
}
