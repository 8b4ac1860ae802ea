use crate::domain::{
    Credentials, FLASH_FIELD, GatewayOutcome, GatewayResponse, Message, MessageText, PostponeAt,
    Recipient,
};

const SENT_TEXT: &str = "Message was sent.";
const NOT_SENT_TEXT: &str = "Message was not sent.";

/// Build the form fields for `sendsms.php`, in the order the gateway expects.
pub fn encode_send_sms_form(credentials: &Credentials, message: &Message) -> Vec<(String, String)> {
    let mut params = Vec::<(String, String)>::new();

    params.push((
        MessageText::FIELD.to_owned(),
        message.text().as_str().to_owned(),
    ));

    let extension = message
        .recipients()
        .iter()
        .map(Recipient::as_str)
        .collect::<Vec<_>>()
        .join(",");
    params.push((Recipient::FIELD.to_owned(), extension));

    params.push((
        Credentials::KEY_NAME_FIELD.to_owned(),
        credentials.key_name().to_owned(),
    ));
    params.push((
        Credentials::KEY_VALUE_FIELD.to_owned(),
        credentials.key_value().to_owned(),
    ));

    if message.is_flash() {
        params.push((FLASH_FIELD.to_owned(), String::new()));
    }
    if let Some(postpone) = message.postpone_at() {
        params.push((PostponeAt::FIELD.to_owned(), postpone.to_gateway_string()));
    }

    params
}

/// Classify the plain-text body returned by the gateway.
pub fn decode_send_sms_response(status: u16, body: String) -> GatewayResponse {
    let outcome = match body.trim() {
        SENT_TEXT => GatewayOutcome::Sent,
        NOT_SENT_TEXT => GatewayOutcome::NotSent,
        _ => GatewayOutcome::Unrecognized,
    };

    GatewayResponse {
        status,
        body,
        outcome,
    }
}
