use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value::Symbol;

/// The message-id / correlation-id union (AMQP 1.0 §3.2.4).
///
/// Both Properties fields accept any of the four wire types; everything
/// that consumes an id pattern-matches on this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageId {
    String(String),
    Ulong(u64),
    Uuid(Uuid),
    Binary(Bytes),
}

/// Immutable-once-published message metadata (AMQP 1.0 §3.2.5).
///
/// Timestamps are milliseconds since the Unix epoch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    pub message_id: Option<MessageId>,
    pub user_id: Option<Bytes>,
    pub to: Option<String>,
    pub subject: Option<String>,
    pub reply_to: Option<String>,
    pub correlation_id: Option<MessageId>,
    pub content_type: Option<Symbol>,
    pub content_encoding: Option<Symbol>,
    pub absolute_expiry_time: Option<i64>,
    pub creation_time: Option<i64>,
    pub group_id: Option<String>,
    pub group_sequence: Option<u32>,
    pub reply_to_group_id: Option<String>,
}
