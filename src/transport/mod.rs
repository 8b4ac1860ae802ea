//! Transport layer: HTTP and wire-format details (serialization/deserialization).

mod form;
mod send_sms;

pub use form::{FORM_CONTENT_TYPE, encode_form_body};
pub use send_sms::{decode_send_sms_response, encode_send_sms_form};
