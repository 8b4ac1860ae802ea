//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::{FLASH_FIELD, Message};
pub use response::{GatewayOutcome, GatewayResponse};
pub use validation::ValidationError;
pub use value::{Credentials, MessageText, PostponeAt, Recipient};
