use std::io;

use chrono::{TimeDelta, Utc};
use helix_sms::{Message, SmsClient};
use tokio::sync::oneshot;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let key_name = std::env::var("HELIX_KEY_NAME").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "HELIX_KEY_NAME environment variable is required",
        )
    })?;
    let key_value = std::env::var("HELIX_KEY_VALUE").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "HELIX_KEY_VALUE environment variable is required",
        )
    })?;
    let phones = std::env::var("HELIX_PHONES").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "HELIX_PHONES environment variable is required (comma separated)",
        )
    })?;

    let client = SmsClient::create(key_name, key_value)?;
    let mut message = Message::new();
    message
        .set_message("Flash! Delivered in three minutes.")
        .set_recipients(phones.split(','))?
        .postpone(Utc::now() + TimeDelta::minutes(3));

    let (tx, rx) = oneshot::channel();
    client.send_as_flash_async(message, move |result| {
        let _ = tx.send(result);
    });
    println!("queued, waiting for the gateway...");

    let response = rx.await??;
    println!("outcome: {:?}, body: {}", response.outcome, response.body);

    Ok(())
}
