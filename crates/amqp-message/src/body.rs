use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::value::AmqpValue;

/// Body section: exactly one of the three AMQP 1.0 body shapes.
///
/// Multi-`Data` and multi-`Sequence` bodies are legal on the wire but
/// never produced by JMS-style clients; a single section of each shape
/// is sufficient here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Body {
    /// A single `amqp-value` section.
    Value(AmqpValue),
    /// A single `amqp-sequence` section: ordered, heterogeneous values.
    Sequence(Vec<AmqpValue>),
    /// A single `data` section: opaque bytes.
    Data(Bytes),
}
