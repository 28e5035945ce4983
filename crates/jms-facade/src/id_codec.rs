//! Textual round-trip of the AMQP message-id union through a JMS string.
//!
//! Every JMS-visible id starts with `ID:`. Non-string wire types carry a
//! type tag after the prefix so the native type survives the trip:
//! `ID:AMQP_ULONG:42`, `ID:AMQP_UUID:<uuid>`, `ID:AMQP_BINARY:<HEX>`.
//! Plain strings carry no tag. Decoding a malformed tagged payload is an
//! error, never a silent fall-through to a string id.

use bytes::Bytes;
use uuid::Uuid;

use amqp_message::MessageId;

use crate::error::IdCodecError;

/// Prefix carried by every JMS-visible message-id string.
pub const ID_PREFIX: &str = "ID:";

const ULONG_PREFIX: &str = "AMQP_ULONG:";
const UUID_PREFIX: &str = "AMQP_UUID:";
const BINARY_PREFIX: &str = "AMQP_BINARY:";

/// Render an id in its JMS textual form, always `ID:`-prefixed.
///
/// A wire string that already starts with `ID:` is returned as is; the
/// prefix is never doubled.
#[must_use]
pub fn encode(id: &MessageId) -> String {
    let base = base_string(id);
    if has_id_prefix(&base) {
        base
    } else {
        format!("{ID_PREFIX}{base}")
    }
}

/// The tag-qualified form without the `ID:` prefix.
///
/// Binary payloads render as upper-case hex, uuids in the canonical
/// lower-case hyphenated form, ulongs in decimal.
#[must_use]
pub fn base_string(id: &MessageId) -> String {
    match id {
        MessageId::String(s) => s.clone(),
        MessageId::Ulong(u) => format!("{ULONG_PREFIX}{u}"),
        MessageId::Uuid(u) => format!("{UUID_PREFIX}{u}"),
        MessageId::Binary(b) => format!("{BINARY_PREFIX}{}", hex::encode_upper(b)),
    }
}

#[must_use]
pub fn has_id_prefix(value: &str) -> bool {
    value.starts_with(ID_PREFIX)
}

/// Strip one leading `ID:` prefix if present.
#[must_use]
pub fn strip_id_prefix(value: &str) -> &str {
    value.strip_prefix(ID_PREFIX).unwrap_or(value)
}

/// Parse a JMS textual id back into its native wire value.
///
/// # Errors
///
/// Returns an [`IdCodecError`] when a recognized type tag carries an
/// empty or unparseable payload.
pub fn decode(value: &str) -> Result<MessageId, IdCodecError> {
    let base = strip_id_prefix(value);

    if let Some(rest) = base.strip_prefix(ULONG_PREFIX) {
        if rest.is_empty() {
            return Err(IdCodecError::EmptyPayload("AMQP_ULONG"));
        }
        rest.parse::<u64>()
            .map(MessageId::Ulong)
            .map_err(|_| IdCodecError::InvalidUlong(rest.to_string()))
    } else if let Some(rest) = base.strip_prefix(UUID_PREFIX) {
        if rest.is_empty() {
            return Err(IdCodecError::EmptyPayload("AMQP_UUID"));
        }
        Uuid::parse_str(rest)
            .map(MessageId::Uuid)
            .map_err(|_| IdCodecError::InvalidUuid(rest.to_string()))
    } else if let Some(rest) = base.strip_prefix(BINARY_PREFIX) {
        if rest.is_empty() {
            return Err(IdCodecError::EmptyPayload("AMQP_BINARY"));
        }
        // hex::decode rejects odd length and non-hex digits, and accepts
        // either case on input.
        hex::decode(rest)
            .map(|bytes| MessageId::Binary(Bytes::from(bytes)))
            .map_err(|_| IdCodecError::InvalidBinary(rest.to_string()))
    } else {
        Ok(MessageId::String(base.to_string()))
    }
}
