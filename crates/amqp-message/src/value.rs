use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// AMQP symbol: a string drawn from a constrained, peer-agreed domain
/// (annotation keys, content types).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Symbol {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// AMQP primitive value. Used for message-annotation values,
/// application-property values, map-body entries, and stream-body entries.
///
/// Map entries are kept as a pair list: AMQP map keys can be any value,
/// which rules out a hash map keyed on `AmqpValue`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmqpValue {
    Null,
    Bool(bool),
    Ubyte(u8),
    Ushort(u16),
    Uint(u32),
    Ulong(u64),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(char),
    /// Milliseconds since the Unix epoch.
    Timestamp(i64),
    Uuid(Uuid),
    Binary(Bytes),
    String(String),
    Symbol(Symbol),
    List(Vec<AmqpValue>),
    Map(Vec<(AmqpValue, AmqpValue)>),
}

impl AmqpValue {
    /// Numeric reading of any integer-ish variant.
    ///
    /// Peers are free to pick a different integer width for small-int
    /// annotation values, so readers of kind codes go through this rather
    /// than matching one variant. A `Ulong` above `i64::MAX` reads as
    /// `None` rather than wrapping.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Ubyte(v) => Some(i64::from(*v)),
            Self::Ushort(v) => Some(i64::from(*v)),
            Self::Uint(v) => Some(i64::from(*v)),
            Self::Ulong(v) => i64::try_from(*v).ok(),
            Self::Byte(v) => Some(i64::from(*v)),
            Self::Short(v) => Some(i64::from(*v)),
            Self::Int(v) => Some(i64::from(*v)),
            Self::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Textual reading of string-like variants.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Symbol(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}
