use serde::{Deserialize, Serialize};

use crate::keys;

/// The four JMS destination kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestinationKind {
    Queue,
    Topic,
    TemporaryQueue,
    TemporaryTopic,
}

impl DestinationKind {
    /// Small-integer code carried in the `x-opt-jms-dest` /
    /// `x-opt-jms-reply-to` annotations.
    #[must_use]
    pub fn wire_code(self) -> i8 {
        match self {
            Self::Queue => keys::dest_types::QUEUE,
            Self::Topic => keys::dest_types::TOPIC,
            Self::TemporaryQueue => keys::dest_types::TEMP_QUEUE,
            Self::TemporaryTopic => keys::dest_types::TEMP_TOPIC,
        }
    }

    /// Inverse of [`wire_code`](Self::wire_code); lenient about the
    /// integer width peers used for the annotation value.
    #[must_use]
    pub fn from_wire_code(code: i64) -> Option<Self> {
        match code {
            c if c == i64::from(keys::dest_types::QUEUE) => Some(Self::Queue),
            c if c == i64::from(keys::dest_types::TOPIC) => Some(Self::Topic),
            c if c == i64::from(keys::dest_types::TEMP_QUEUE) => Some(Self::TemporaryQueue),
            c if c == i64::from(keys::dest_types::TEMP_TOPIC) => Some(Self::TemporaryTopic),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_temporary(self) -> bool {
        matches!(self, Self::TemporaryQueue | Self::TemporaryTopic)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queue => "queue",
            Self::Topic => "topic",
            Self::TemporaryQueue => "temporary-queue",
            Self::TemporaryTopic => "temporary-topic",
        }
    }
}

impl std::fmt::Display for DestinationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A JMS destination: a kind plus its AMQP node address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JmsDestination {
    pub kind: DestinationKind,
    pub address: String,
}

impl JmsDestination {
    pub fn queue(address: impl Into<String>) -> Self {
        Self {
            kind: DestinationKind::Queue,
            address: address.into(),
        }
    }

    pub fn topic(address: impl Into<String>) -> Self {
        Self {
            kind: DestinationKind::Topic,
            address: address.into(),
        }
    }

    pub fn temporary_queue(address: impl Into<String>) -> Self {
        Self {
            kind: DestinationKind::TemporaryQueue,
            address: address.into(),
        }
    }

    pub fn temporary_topic(address: impl Into<String>) -> Self {
        Self {
            kind: DestinationKind::TemporaryTopic,
            address: address.into(),
        }
    }
}

impl std::fmt::Display for JmsDestination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.address)
    }
}
