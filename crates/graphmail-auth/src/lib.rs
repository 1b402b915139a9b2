//! # graphmail-auth
//!
//! App-only authentication for the Microsoft Graph mail API.
//!
//! ## Features
//!
//! - **Client-credentials grant**: tenant ID, client ID and secret exchanged
//!   for a bearer token in a single request
//! - **Authority configuration**: global Azure by default, custom hosts and
//!   scopes for sovereign clouds
//! - **No hidden state**: tokens are never cached or refreshed here
//!
//! ## Quick Start
//!
//! ```ignore
//! use graphmail_auth::acquire_token;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let token = acquire_token("tenant-id", "client-id", "client-secret").await?;
//!     println!("Token type: {}", token.token_type);
//!     Ok(())
//! }
//! ```
//!
//! ### Custom Authority
//!
//! ```ignore
//! use graphmail_auth::{Authority, ClientCredentials, ClientCredentialsFlow};
//! use std::time::Duration;
//!
//! let authority = Authority::new(
//!     "US Government",
//!     "https://login.microsoftonline.us",
//!     "https://graph.microsoft.us/.default",
//! )?;
//! let flow = ClientCredentialsFlow::new(authority).with_timeout(Duration::from_secs(10));
//! let token = flow
//!     .acquire_token(&ClientCredentials::new("tenant", "client", "secret"))
//!     .await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod authority;
mod error;
pub mod flow;
pub mod token;

pub use authority::Authority;
pub use error::{Error, Result};
pub use flow::{ClientCredentials, ClientCredentialsFlow, acquire_token};
pub use token::AccessToken;
