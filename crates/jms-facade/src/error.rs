use thiserror::Error;

use crate::body::MessageKind;

/// Failures raised by the textual message-id codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdCodecError {
    #[error("empty payload after {0} type tag")]
    EmptyPayload(&'static str),

    #[error("invalid AMQP_ULONG id payload: {0}")]
    InvalidUlong(String),

    #[error("invalid AMQP_UUID id payload: {0}")]
    InvalidUuid(String),

    #[error("invalid AMQP_BINARY id payload: {0}")]
    InvalidBinary(String),
}

/// Which JMS exception family an error maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Value outside the legal range for a message field.
    MessageFormat,
    /// Caller-side misuse of the API, independent of message content.
    IllegalArgument,
}

/// Errors surfaced by facade operations.
///
/// Setters reject bad values before touching the message, so a failed
/// call always leaves the message unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FacadeError {
    #[error("ttl out of unsigned 32-bit range: {0}")]
    TtlOutOfRange(i64),

    #[error("negative redelivery count: {0}")]
    NegativeRedeliveryCount(i32),

    #[error(transparent)]
    MalformedId(#[from] IdCodecError),

    #[error("underlying correlation-id is not binary")]
    CorrelationIdNotBinary,

    #[error("data body is not valid utf-8")]
    BodyNotUtf8,

    #[error("unexpected body shape for a {kind} message")]
    UnexpectedBody { kind: MessageKind },

    #[error("body is write-only until reset() is called")]
    NotReadable,

    #[error("body is read-only until clear_body() is called")]
    NotWriteable,

    #[error("property name must not be empty")]
    EmptyPropertyName,

    #[error("map entry name must not be empty")]
    EmptyMapEntryName,

    #[error("{actual} message does not support {expected} body access")]
    InvalidBodyAccess {
        expected: MessageKind,
        actual: MessageKind,
    },
}

impl FacadeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TtlOutOfRange(_)
            | Self::NegativeRedeliveryCount(_)
            | Self::MalformedId(_)
            | Self::CorrelationIdNotBinary
            | Self::BodyNotUtf8
            | Self::UnexpectedBody { .. }
            | Self::NotReadable
            | Self::NotWriteable => ErrorKind::MessageFormat,
            Self::EmptyPropertyName | Self::EmptyMapEntryName | Self::InvalidBodyAccess { .. } => {
                ErrorKind::IllegalArgument
            }
        }
    }
}
