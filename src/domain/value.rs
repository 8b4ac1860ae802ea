use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use once_cell::sync::Lazy;
use phonenumber::country;
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};

use crate::domain::validation::ValidationError;

static RECIPIENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(Recipient::PATTERN).expect("recipient pattern is a valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Mobile extension of a recipient (`extension`).
///
/// Invariant: `+CC7XXXXXXXX`, i.e. `+`, a two digit country code, the digit `7` and eight
/// more digits. Only ASCII digits are accepted and no whitespace or separators are allowed.
pub struct Recipient(String);

impl Recipient {
    /// Form field name used by the gateway (`extension`).
    pub const FIELD: &'static str = "extension";

    /// Regular expression every recipient must match.
    pub const PATTERN: &'static str = r"^\+[0-9]{2}7[0-9]{8}$";

    /// Validate a recipient exactly as provided (no trimming or normalization).
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if !RECIPIENT_RE.is_match(&value) {
            return Err(ValidationError::InvalidRecipientFormat {
                input: value,
                pattern: Self::PATTERN,
            });
        }
        Ok(Self(value))
    }

    /// Parse a national or formatted number, normalize it to E.164 and validate the result.
    ///
    /// `default_region` is used when the input does not contain an explicit country prefix,
    /// so `("073-123 45 67", SE)` becomes `+46731234567`.
    pub fn parse(
        default_region: Option<country::Id>,
        input: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let input = input.into();
        let raw = input.trim();

        let parsed = phonenumber::parse(default_region, raw).map_err(|_| {
            ValidationError::InvalidPhoneNumber {
                input: raw.to_owned(),
            }
        })?;

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();

        Self::new(e164)
    }

    /// The validated extension as sent to the gateway.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
/// SMS message text (`message`).
///
/// Any text is accepted, including the empty string. The gateway expects at most
/// [`MessageText::RECOMMENDED_MAX_CHARS`] characters; staying below that is up to the caller.
pub struct MessageText(String);

impl MessageText {
    /// Form field name used by the gateway (`message`).
    pub const FIELD: &'static str = "message";

    /// Longest text the gateway is documented to accept.
    pub const RECOMMENDED_MAX_CHARS: usize = 500;

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the message text as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters (not bytes).
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    /// Returns `true` when the text is longer than [`MessageText::RECOMMENDED_MAX_CHARS`].
    pub fn exceeds_recommended_length(&self) -> bool {
        self.char_count() > Self::RECOMMENDED_MAX_CHARS
    }
}

#[derive(Debug, Clone)]
/// API key pair identifying the caller to the gateway (`key_name` + `key_value`).
///
/// Nothing is validated locally; the gateway decides whether the pair is accepted.
/// The key value is kept secret and is redacted from `Debug` output.
pub struct Credentials {
    key_name: String,
    key_value: SecretString,
}

impl Credentials {
    /// Form field name of the key name (`key_name`).
    pub const KEY_NAME_FIELD: &'static str = "key_name";
    /// Form field name of the key value (`key_value`).
    pub const KEY_VALUE_FIELD: &'static str = "key_value";

    pub fn new(key_name: impl Into<String>, key_value: impl Into<String>) -> Self {
        Self {
            key_name: key_name.into(),
            key_value: SecretString::new(key_value.into()),
        }
    }

    pub fn key_name(&self) -> &str {
        &self.key_name
    }

    pub(crate) fn key_value(&self) -> &str {
        self.key_value.expose_secret()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Deferred delivery time (`postpone`).
///
/// Stored as a UTC instant. On the wire it is rendered as `HH:mm MMddyy` in the gateway's
/// fixed UTC+2 clock, independent of the caller's local time zone. No check is made that
/// the instant lies in the future.
pub struct PostponeAt(DateTime<Utc>);

impl PostponeAt {
    /// Form field name used by the gateway (`postpone`).
    pub const FIELD: &'static str = "postpone";

    /// Offset of the gateway clock from UTC, in hours.
    pub const GATEWAY_UTC_OFFSET_HOURS: i32 = 2;

    const WIRE_FORMAT: &'static str = "%H:%M %m%d%y";

    pub fn new<Tz: TimeZone>(at: DateTime<Tz>) -> Self {
        Self(at.with_timezone(&Utc))
    }

    /// The instant in UTC.
    pub fn instant(self) -> DateTime<Utc> {
        self.0
    }

    /// Render as `HH:mm MMddyy` in the gateway clock.
    pub fn to_gateway_string(self) -> String {
        let gateway_offset = FixedOffset::east_opt(Self::GATEWAY_UTC_OFFSET_HOURS * 3600)
            .expect("gateway offset is within a day");
        self.0
            .with_timezone(&gateway_offset)
            .format(Self::WIRE_FORMAT)
            .to_string()
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for PostponeAt {
    fn from(value: DateTime<Tz>) -> Self {
        Self::new(value)
    }
}
