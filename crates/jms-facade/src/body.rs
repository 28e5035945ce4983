//! Body variants and their typed accessors.
//!
//! The JMS body taxonomy is a closed set of six shapes, so it lives
//! here as a tag on the facade rather than a type hierarchy; accessors
//! check the tag and reject mismatched access.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use amqp_message::{AmqpMessage, AmqpValue, Body, Symbol};

use crate::error::FacadeError;
use crate::facade::MessageFacade;
use crate::keys;

/// Which JMS body variant a message carries. Stamped on the wire as the
/// `x-opt-jms-msg-type` annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// No body accessor; body absent or arbitrary.
    Message,
    /// Externally serialized object graph in a `data` section.
    Object,
    /// String-keyed map of primitives.
    Map,
    /// Opaque byte sequence with a read cursor.
    Bytes,
    /// Ordered heterogeneous primitives with a read cursor.
    Stream,
    /// A single string.
    Text,
}

impl MessageKind {
    #[must_use]
    pub fn wire_code(self) -> i8 {
        match self {
            Self::Message => keys::msg_types::MESSAGE,
            Self::Object => keys::msg_types::OBJECT,
            Self::Map => keys::msg_types::MAP,
            Self::Bytes => keys::msg_types::BYTES,
            Self::Stream => keys::msg_types::STREAM,
            Self::Text => keys::msg_types::TEXT,
        }
    }

    /// Inverse of [`wire_code`](Self::wire_code); lenient about the
    /// integer width peers used for the annotation value.
    #[must_use]
    pub fn from_wire_code(code: i64) -> Option<Self> {
        match code {
            c if c == i64::from(keys::msg_types::MESSAGE) => Some(Self::Message),
            c if c == i64::from(keys::msg_types::OBJECT) => Some(Self::Object),
            c if c == i64::from(keys::msg_types::MAP) => Some(Self::Map),
            c if c == i64::from(keys::msg_types::BYTES) => Some(Self::Bytes),
            c if c == i64::from(keys::msg_types::STREAM) => Some(Self::Stream),
            c if c == i64::from(keys::msg_types::TEXT) => Some(Self::Text),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Object => "object",
            Self::Map => "map",
            Self::Bytes => "bytes",
            Self::Stream => "stream",
            Self::Text => "text",
        }
    }

    /// Classify a received message.
    ///
    /// The kind annotation wins when present and recognized; otherwise
    /// the body shape and content type decide. Peers that are not JMS
    /// clients send no annotation at all, so the inference path is the
    /// common case for cross-client traffic.
    pub(crate) fn detect(message: &AmqpMessage) -> Self {
        let annotation = message
            .message_annotations()
            .and_then(|a| a.get(&Symbol::from(keys::annotations::MSG_TYPE)));
        if let Some(value) = annotation {
            match value.as_i64().and_then(Self::from_wire_code) {
                Some(kind) => return kind,
                None => {
                    tracing::warn!(?value, "unrecognized message type annotation, inferring from body");
                }
            }
        }

        let content_type = message
            .properties()
            .and_then(|p| p.content_type.as_ref())
            .map(Symbol::as_str);

        match message.body() {
            Some(Body::Data(_)) => match content_type {
                Some(keys::content_types::SERIALIZED_OBJECT) => Self::Object,
                Some(ct) if ct.starts_with("text/") => Self::Text,
                _ => Self::Bytes,
            },
            Some(Body::Value(AmqpValue::String(_))) | Some(Body::Value(AmqpValue::Null)) => {
                Self::Text
            }
            Some(Body::Value(AmqpValue::Map(_))) => Self::Map,
            Some(Body::Sequence(_)) | Some(Body::Value(AmqpValue::List(_))) => Self::Stream,
            _ => Self::Message,
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read/write cursor for bytes and stream bodies.
///
/// A new outgoing body starts writable; a received body starts readable
/// at the beginning. `reset()` seals writes and rewinds; `clear_body()`
/// returns to writable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyCursor {
    Writable,
    Readable { pos: usize },
}

impl MessageFacade {
    fn expect_kind(&self, expected: MessageKind) -> Result<(), FacadeError> {
        if self.kind == expected {
            Ok(())
        } else {
            Err(FacadeError::InvalidBodyAccess {
                expected,
                actual: self.kind,
            })
        }
    }

    fn expect_readable(&self) -> Result<usize, FacadeError> {
        match self.cursor {
            BodyCursor::Readable { pos } => Ok(pos),
            BodyCursor::Writable => Err(FacadeError::NotReadable),
        }
    }

    fn expect_writable(&self) -> Result<(), FacadeError> {
        match self.cursor {
            BodyCursor::Writable => Ok(()),
            BodyCursor::Readable { .. } => Err(FacadeError::NotWriteable),
        }
    }

    // -- text --

    /// # Errors
    ///
    /// Fails on non-text messages, on a `data` body that is not valid
    /// UTF-8, and on body shapes a text message cannot carry.
    pub fn text(&self) -> Result<Option<String>, FacadeError> {
        self.expect_kind(MessageKind::Text)?;
        match self.message.body() {
            None | Some(Body::Value(AmqpValue::Null)) => Ok(None),
            Some(Body::Value(AmqpValue::String(s))) => Ok(Some(s.clone())),
            Some(Body::Data(data)) => std::str::from_utf8(data)
                .map(|s| Some(s.to_string()))
                .map_err(|_| FacadeError::BodyNotUtf8),
            Some(_) => Err(FacadeError::UnexpectedBody {
                kind: MessageKind::Text,
            }),
        }
    }

    /// # Errors
    ///
    /// Fails on non-text messages.
    pub fn set_text(&mut self, text: Option<&str>) -> Result<(), FacadeError> {
        self.expect_kind(MessageKind::Text)?;
        match text {
            Some(text) => self
                .message
                .set_body(Some(Body::Value(AmqpValue::String(text.to_string())))),
            None => self.message.set_body(None),
        }
        Ok(())
    }

    // -- bytes --

    /// Append to a writable bytes body. The first write stamps the
    /// octet-stream content type.
    ///
    /// # Errors
    ///
    /// Fails on non-bytes messages and after the body was sealed by
    /// [`reset`](Self::reset).
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<(), FacadeError> {
        self.expect_kind(MessageKind::Bytes)?;
        self.expect_writable()?;

        let mut buffer = match self.message.body() {
            Some(Body::Data(existing)) => existing.to_vec(),
            _ => Vec::new(),
        };
        buffer.extend_from_slice(data);
        self.message.set_body(Some(Body::Data(Bytes::from(buffer))));
        self.message.ensure_properties().content_type =
            Some(Symbol::from(keys::content_types::OCTET_STREAM));
        Ok(())
    }

    /// Fill `buf` from the read cursor; returns how many bytes were
    /// copied, 0 at end of body.
    ///
    /// # Errors
    ///
    /// Fails on non-bytes messages and while the body is still
    /// writable.
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, FacadeError> {
        self.expect_kind(MessageKind::Bytes)?;
        let pos = self.expect_readable()?;

        let data = match self.message.body() {
            Some(Body::Data(data)) => data,
            None => return Ok(0),
            Some(_) => {
                return Err(FacadeError::UnexpectedBody {
                    kind: MessageKind::Bytes,
                })
            }
        };
        let remaining = &data[pos.min(data.len())..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.cursor = BodyCursor::Readable { pos: pos + n };
        Ok(n)
    }

    /// Length of the bytes body, 0 when absent.
    pub fn body_len(&self) -> usize {
        match self.message.body() {
            Some(Body::Data(data)) => data.len(),
            _ => 0,
        }
    }

    /// Seal writes and rewind the read cursor to the beginning. Only
    /// bytes and stream messages have a cursor.
    ///
    /// # Errors
    ///
    /// Fails on kinds without a cursor.
    pub fn reset(&mut self) -> Result<(), FacadeError> {
        match self.kind {
            MessageKind::Bytes | MessageKind::Stream => {
                self.cursor = BodyCursor::Readable { pos: 0 };
                Ok(())
            }
            actual => Err(FacadeError::InvalidBodyAccess {
                expected: MessageKind::Bytes,
                actual,
            }),
        }
    }

    // -- map --

    /// # Errors
    ///
    /// Fails on non-map messages; an empty entry name is caller misuse.
    pub fn set_entry(&mut self, name: &str, value: AmqpValue) -> Result<(), FacadeError> {
        self.expect_kind(MessageKind::Map)?;
        if name.is_empty() {
            return Err(FacadeError::EmptyMapEntryName);
        }

        let mut entries = match self.message.body() {
            Some(Body::Value(AmqpValue::Map(entries))) => entries.clone(),
            _ => Vec::new(),
        };
        let key = AmqpValue::String(name.to_string());
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => entries.push((key, value)),
        }
        self.message
            .set_body(Some(Body::Value(AmqpValue::Map(entries))));
        Ok(())
    }

    pub fn entry(&self, name: &str) -> Option<&AmqpValue> {
        self.map_entries()?
            .iter()
            .find(|(k, _)| k.as_str() == Some(name))
            .map(|(_, v)| v)
    }

    pub fn entry_exists(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    pub fn remove_entry(&mut self, name: &str) {
        let entries = match self.message.body_mut() {
            Some(Body::Value(AmqpValue::Map(entries))) => entries,
            _ => return,
        };
        entries.retain(|(k, _)| k.as_str() != Some(name));
    }

    pub fn entry_names(&self) -> Vec<&str> {
        self.map_entries()
            .map(|entries| entries.iter().filter_map(|(k, _)| k.as_str()).collect())
            .unwrap_or_default()
    }

    fn map_entries(&self) -> Option<&Vec<(AmqpValue, AmqpValue)>> {
        match self.message.body() {
            Some(Body::Value(AmqpValue::Map(entries))) => Some(entries),
            _ => None,
        }
    }

    // -- stream --

    /// Append a value to a writable stream body.
    ///
    /// # Errors
    ///
    /// Fails on non-stream messages and after the body was sealed by
    /// [`reset`](Self::reset).
    pub fn write_value(&mut self, value: AmqpValue) -> Result<(), FacadeError> {
        self.expect_kind(MessageKind::Stream)?;
        self.expect_writable()?;

        let mut values = match self.message.body() {
            Some(Body::Sequence(values)) => values.clone(),
            _ => Vec::new(),
        };
        values.push(value);
        self.message.set_body(Some(Body::Sequence(values)));
        Ok(())
    }

    /// The next value at the read cursor, `None` at end of stream.
    ///
    /// # Errors
    ///
    /// Fails on non-stream messages and while the body is still
    /// writable.
    pub fn read_value(&mut self) -> Result<Option<AmqpValue>, FacadeError> {
        self.expect_kind(MessageKind::Stream)?;
        let pos = self.expect_readable()?;

        let values = match self.message.body() {
            Some(Body::Sequence(values)) => values,
            Some(Body::Value(AmqpValue::List(values))) => values,
            None => return Ok(None),
            Some(_) => {
                return Err(FacadeError::UnexpectedBody {
                    kind: MessageKind::Stream,
                })
            }
        };
        let value = values.get(pos).cloned();
        if value.is_some() {
            self.cursor = BodyCursor::Readable { pos: pos + 1 };
        }
        Ok(value)
    }

    // -- object --

    /// Store an externally serialized object graph; stamps the
    /// connection's object content type.
    ///
    /// # Errors
    ///
    /// Fails on non-object messages.
    pub fn set_serialized(&mut self, data: Bytes) -> Result<(), FacadeError> {
        self.expect_kind(MessageKind::Object)?;
        self.message.set_body(Some(Body::Data(data)));
        let content_type = self.connection.object_content_type.clone();
        self.message.ensure_properties().content_type = Some(content_type);
        Ok(())
    }

    /// The serialized object bytes, `None` when the body is absent.
    ///
    /// # Errors
    ///
    /// Fails on non-object messages and on body shapes an object
    /// message cannot carry.
    pub fn serialized(&self) -> Result<Option<Bytes>, FacadeError> {
        self.expect_kind(MessageKind::Object)?;
        match self.message.body() {
            None => Ok(None),
            Some(Body::Data(data)) => Ok(Some(data.clone())),
            Some(_) => Err(FacadeError::UnexpectedBody {
                kind: MessageKind::Object,
            }),
        }
    }
}
