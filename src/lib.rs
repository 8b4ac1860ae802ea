//! Typed Rust client for the Stormhub Helix SMS gateway.
//!
//! The crate is split into a domain layer of strong types (recipients are validated when
//! they are added), a transport layer for the gateway's form encoding, a trust layer that
//! pins the gateway's CA, and a small client layer orchestrating requests.
//!
//! ```rust,no_run
//! use helix_sms::{Message, SmsClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), helix_sms::SmsError> {
//!     let client = SmsClient::create("my-key-name", "my-key-value")?;
//!     let mut message = Message::new();
//!     message.set_message("hello").set_recipient("+46700634607")?;
//!     let response = client.send(message).await?;
//!     println!("{}", response.body);
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;
pub mod trust;

pub use client::{SmsClient, SmsClientBuilder, SmsError};
pub use domain::{
    Credentials, GatewayOutcome, GatewayResponse, Message, MessageText, PostponeAt, Recipient,
    ValidationError,
};
pub use trust::{TrustConfig, TrustError};
