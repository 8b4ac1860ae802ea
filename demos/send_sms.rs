use std::io;

use helix_sms::{Message, SmsClient};

fn required_env(name: &str) -> Result<String, io::Error> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let key_name = required_env("HELIX_KEY_NAME")?;
    let key_value = required_env("HELIX_KEY_VALUE")?;
    let phone = required_env("HELIX_PHONE")?;
    let text = std::env::var("HELIX_MESSAGE")
        .unwrap_or_else(|_| "Hello from the helix-sms example.".to_owned());

    let client = SmsClient::create(key_name, key_value)?;
    let mut message = Message::new();
    message.set_message(text).set_recipient(phone)?;

    let response = client.send(message).await?;
    println!(
        "status: {}, outcome: {:?}, body: {}",
        response.status, response.outcome, response.body
    );

    Ok(())
}
