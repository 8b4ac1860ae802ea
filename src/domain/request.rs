use chrono::{DateTime, TimeZone};

use crate::domain::validation::ValidationError;
use crate::domain::value::{MessageText, PostponeAt, Recipient};

/// Form field name of the flash flag (`flash`). Sent with an empty value when set.
pub const FLASH_FIELD: &str = "flash";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// An SMS waiting to be sent.
///
/// Configure it through the chained setters, then hand it to
/// [`SmsClient::send`](crate::SmsClient::send) (or one of its variants). Sending consumes the
/// message; clone it first if you really mean to send the same message twice.
///
/// ```rust
/// use helix_sms::Message;
///
/// let mut message = Message::new();
/// message
///     .set_message("Hi! What's up?")
///     .set_recipient("+46700634607")?;
/// assert_eq!(message.recipients().len(), 1);
/// # Ok::<(), helix_sms::ValidationError>(())
/// ```
pub struct Message {
    text: MessageText,
    recipients: Vec<Recipient>,
    flash: bool,
    postpone: Option<PostponeAt>,
}

impl Message {
    /// An empty message: no text, no recipients, normal delivery, sent immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the message text.
    pub fn set_message(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = MessageText::new(text);
        self
    }

    /// Validate `phone` and append it to the recipients.
    ///
    /// On error the recipient list is left untouched.
    pub fn set_recipient(&mut self, phone: impl Into<String>) -> Result<&mut Self, ValidationError> {
        let recipient = Recipient::new(phone)?;
        self.recipients.push(recipient);
        Ok(self)
    }

    /// Validate and append each phone number in order.
    ///
    /// Stops at the first invalid entry. Entries before it stay appended; there is no rollback.
    pub fn set_recipients<I, S>(&mut self, phones: I) -> Result<&mut Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for phone in phones {
            self.set_recipient(phone)?;
        }
        Ok(self)
    }

    /// Append an already validated recipient.
    pub fn add_recipient(&mut self, recipient: Recipient) -> &mut Self {
        self.recipients.push(recipient);
        self
    }

    /// Defer delivery until `at`.
    pub fn postpone<Tz: TimeZone>(&mut self, at: DateTime<Tz>) -> &mut Self {
        self.postpone = Some(PostponeAt::new(at));
        self
    }

    /// Deliver as a flash message (shown directly on screen, not stored).
    pub fn set_flash(&mut self, flash: bool) -> &mut Self {
        self.flash = flash;
        self
    }

    pub fn text(&self) -> &MessageText {
        &self.text
    }

    pub fn recipients(&self) -> &[Recipient] {
        &self.recipients
    }

    pub fn is_flash(&self) -> bool {
        self.flash
    }

    pub fn postpone_at(&self) -> Option<PostponeAt> {
        self.postpone
    }
}
