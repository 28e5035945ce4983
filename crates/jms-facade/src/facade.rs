use std::cell::Cell;
use std::sync::Arc;

use bytes::Bytes;

use amqp_message::{AmqpMessage, AmqpValue, Header, MessageId, Symbol};

use crate::body::{BodyCursor, MessageKind};
use crate::destination::{DestinationKind, JmsDestination};
use crate::error::FacadeError;
use crate::id_codec;
use crate::keys;

/// Largest value the header `ttl` and the ttl override accept,
/// `2^32 - 1` milliseconds.
pub const MAX_TTL: i64 = u32::MAX as i64;

/// Highest priority JMS exposes. AMQP allows 0-255; anything above this
/// reads as 9.
pub const MAX_PRIORITY: u8 = 9;

/// Connection-scoped defaults the facade needs while operating
/// standalone: currently just the content type advertised on serialized
/// object bodies. Shared by `Arc` so copies of a message keep pointing
/// at the same connection.
#[derive(Debug, Clone)]
pub struct ConnectionOptions {
    pub object_content_type: Symbol,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            object_content_type: Symbol::from(keys::content_types::SERIALIZED_OBJECT),
        }
    }
}

/// What the facade needs to know about the consumer a message arrived
/// on: its own destination kind, used when a received message carries no
/// destination kind annotation.
pub trait ConsumerContext {
    fn destination_kind(&self) -> DestinationKind;
}

/// State recorded when wrapping a received message.
///
/// The synthesized expiration lives here rather than in the Properties
/// section so a forwarded message re-encodes exactly as it arrived. The
/// cell is written once on first read; the facade is single-owner, so
/// no synchronization is needed.
#[derive(Debug, Clone)]
pub(crate) struct IncomingState {
    pub(crate) consumer_kind: DestinationKind,
    pub(crate) received_at: i64,
    pub(crate) synthesized_expiration: Cell<Option<i64>>,
}

/// JMS-shaped view over one exclusively owned AMQP message.
///
/// Getters are permissive: a missing section reads as the wire default.
/// Setters follow the default-elision rule: assigning a field's default
/// never materializes the owning section, and clears the field (only)
/// when the section already exists.
#[derive(Debug)]
pub struct MessageFacade {
    pub(crate) message: AmqpMessage,
    pub(crate) kind: MessageKind,
    pub(crate) cursor: BodyCursor,
    pub(crate) connection: Arc<ConnectionOptions>,
    pub(crate) incoming: Option<IncomingState>,
}

#[allow(clippy::cast_possible_truncation)]
fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system clock before epoch")
        .as_millis() as i64
}

impl MessageFacade {
    /// Build a facade for a message about to be produced.
    ///
    /// JMS messages are durable by default, so the header section exists
    /// from the start with `durable = true`; the body-kind annotation is
    /// stamped immediately so even an unsent copy identifies itself.
    pub fn new_for_send(kind: MessageKind, connection: Arc<ConnectionOptions>) -> Self {
        let mut message = AmqpMessage::new();
        message.ensure_header().durable = Some(true);

        let mut facade = Self {
            message,
            kind,
            cursor: BodyCursor::Writable,
            connection,
            incoming: None,
        };
        facade.set_message_annotation(keys::annotations::MSG_TYPE, AmqpValue::Byte(kind.wire_code()));
        facade
    }

    /// Wrap a message decoded off the wire.
    ///
    /// Records the receive time (for expiration synthesis) and the
    /// consumer's destination kind (for destination defaulting), and
    /// detects the body variant from the kind annotation or, failing
    /// that, the body shape.
    pub fn wrap_incoming(
        message: AmqpMessage,
        consumer: &dyn ConsumerContext,
        connection: Arc<ConnectionOptions>,
    ) -> Self {
        let kind = MessageKind::detect(&message);
        Self {
            message,
            kind,
            cursor: BodyCursor::Readable { pos: 0 },
            connection,
            incoming: Some(IncomingState {
                consumer_kind: consumer.destination_kind(),
                received_at: now_millis(),
                synthesized_expiration: Cell::new(None),
            }),
        }
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn connection(&self) -> &Arc<ConnectionOptions> {
        &self.connection
    }

    /// The wrapped message, for the codec to encode.
    pub fn amqp_message(&self) -> &AmqpMessage {
        &self.message
    }

    /// Hand the message back to the codec, consuming the facade.
    #[must_use]
    pub fn into_amqp_message(self) -> AmqpMessage {
        self.message
    }

    // -- header: durability --

    pub fn durable(&self) -> bool {
        self.message
            .header()
            .and_then(|h| h.durable)
            .unwrap_or(false)
    }

    pub fn set_durable(&mut self, durable: bool) {
        if durable {
            self.message.ensure_header().durable = Some(true);
        } else if let Some(header) = self.message.header_mut() {
            header.durable = None;
        }
    }

    // -- header: priority --

    /// Message priority in the JMS 0-9 window; AMQP values above 9 read
    /// as 9, a missing field or section as the default 4.
    pub fn priority(&self) -> u8 {
        match self.message.header().and_then(|h| h.priority) {
            Some(p) => p.min(MAX_PRIORITY),
            None => Header::DEFAULT_PRIORITY,
        }
    }

    /// Clamps into 0-9. Setting the default 4 clears the wire field and
    /// never materializes the header section.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_priority(&mut self, priority: i32) {
        let clamped = priority.clamp(0, i32::from(MAX_PRIORITY)) as u8;
        if clamped == Header::DEFAULT_PRIORITY {
            if let Some(header) = self.message.header_mut() {
                header.priority = None;
            }
        } else {
            self.message.ensure_header().priority = Some(clamped);
        }
    }

    // -- header: ttl override --

    /// The application's ttl override in milliseconds, 0 when unset.
    ///
    /// The override lives in application-properties under
    /// `JMS_AMQP_TTL` until [`on_send`](Self::on_send) copies it into
    /// the header, so received-and-forwarded messages round-trip it.
    pub fn ttl(&self) -> i64 {
        self.message
            .application_properties()
            .and_then(|p| p.get(keys::properties::TTL_OVERRIDE))
            .and_then(AmqpValue::as_i64)
            .unwrap_or(0)
    }

    pub fn has_ttl_override(&self) -> bool {
        self.message
            .application_properties()
            .is_some_and(|p| p.contains_key(keys::properties::TTL_OVERRIDE))
    }

    /// Set the ttl override; 0 removes it.
    ///
    /// # Errors
    ///
    /// Rejects values outside `[0, 2^32 - 1]` with the message
    /// unchanged.
    #[allow(clippy::cast_sign_loss)]
    pub fn set_ttl(&mut self, ttl: i64) -> Result<(), FacadeError> {
        if !(0..=MAX_TTL).contains(&ttl) {
            return Err(FacadeError::TtlOutOfRange(ttl));
        }
        if ttl == 0 {
            if let Some(props) = self.message.application_properties_mut() {
                props.remove(keys::properties::TTL_OVERRIDE);
            }
        } else {
            self.message.ensure_application_properties().insert(
                keys::properties::TTL_OVERRIDE.to_string(),
                AmqpValue::Ulong(ttl as u64),
            );
        }
        Ok(())
    }

    // -- header: delivery count / redelivery --

    /// JMS delivery count: wire delivery-count plus one (the current
    /// delivery attempt).
    pub fn delivery_count(&self) -> i32 {
        self.redelivery_count() + 1
    }

    pub fn redelivery_count(&self) -> i32 {
        self.message
            .header()
            .and_then(|h| h.delivery_count)
            .map_or(0, |c| i32::try_from(c).unwrap_or(i32::MAX))
    }

    /// # Errors
    ///
    /// Rejects negative counts with the message unchanged.
    #[allow(clippy::cast_sign_loss)]
    pub fn set_redelivery_count(&mut self, count: i32) -> Result<(), FacadeError> {
        if count < 0 {
            return Err(FacadeError::NegativeRedeliveryCount(count));
        }
        if count == 0 {
            if let Some(header) = self.message.header_mut() {
                header.delivery_count = None;
            }
        } else {
            self.message.ensure_header().delivery_count = Some(count as u32);
        }
        Ok(())
    }

    pub fn redelivered(&self) -> bool {
        self.redelivery_count() > 0
    }

    /// Marking an already-redelivered message redelivered again does not
    /// bump the count; un-marking resets it to zero.
    pub fn set_redelivered(&mut self, redelivered: bool) {
        if redelivered {
            if !self.redelivered() {
                self.message.ensure_header().delivery_count = Some(1);
            }
        } else if let Some(header) = self.message.header_mut() {
            header.delivery_count = None;
        }
    }

    // -- properties: message id --

    pub fn message_id(&self) -> Option<String> {
        self.message
            .properties()
            .and_then(|p| p.message_id.as_ref())
            .map(id_codec::encode)
    }

    /// The wire field stores the bare id: a leading `ID:` prefix is
    /// stripped, the remainder is stored as a string id verbatim. Only
    /// the correlation-id setter is tag-aware.
    pub fn set_message_id(&mut self, id: Option<&str>) {
        match id {
            Some(id) => {
                let bare = id_codec::strip_id_prefix(id);
                self.message.ensure_properties().message_id =
                    Some(MessageId::String(bare.to_string()));
            }
            None => {
                if let Some(props) = self.message.properties_mut() {
                    props.message_id = None;
                }
            }
        }
    }

    // -- properties: correlation id --

    /// Textual correlation id.
    ///
    /// An application-chosen string (flagged by the
    /// `x-opt-app-correlation-id` annotation) comes back verbatim;
    /// anything else gains the `ID:` prefix treatment of the id codec.
    pub fn correlation_id(&self) -> Option<String> {
        let id = self
            .message
            .properties()
            .and_then(|p| p.correlation_id.as_ref())?;
        let base = id_codec::base_string(id);
        if self.is_app_correlation_id() || id_codec::has_id_prefix(&base) {
            Some(base)
        } else {
            Some(format!("{}{base}", id_codec::ID_PREFIX))
        }
    }

    /// Store a correlation id chosen by the application or copied from a
    /// message id.
    ///
    /// An `ID:`-prefixed value is decoded back to its native wire type;
    /// a bare string is stored verbatim and flagged as
    /// application-specific.
    ///
    /// # Errors
    ///
    /// Rejects an `ID:`-prefixed value whose type tag fails to parse,
    /// leaving the message unchanged.
    pub fn set_correlation_id(&mut self, id: Option<&str>) -> Result<(), FacadeError> {
        match id {
            None => {
                if let Some(props) = self.message.properties_mut() {
                    props.correlation_id = None;
                }
                self.remove_message_annotation(keys::annotations::APP_CORRELATION_ID);
            }
            Some(id) if id_codec::has_id_prefix(id) => {
                let native = id_codec::decode(id)?;
                self.message.ensure_properties().correlation_id = Some(native);
                self.remove_message_annotation(keys::annotations::APP_CORRELATION_ID);
            }
            Some(id) => {
                self.message.ensure_properties().correlation_id =
                    Some(MessageId::String(id.to_string()));
                self.set_message_annotation(
                    keys::annotations::APP_CORRELATION_ID,
                    AmqpValue::Bool(true),
                );
            }
        }
        Ok(())
    }

    /// Raw binary correlation id.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::CorrelationIdNotBinary`] when the wire
    /// value exists but holds a different id type.
    pub fn correlation_id_bytes(&self) -> Result<Option<Bytes>, FacadeError> {
        match self.message.properties().and_then(|p| p.correlation_id.as_ref()) {
            None => Ok(None),
            Some(MessageId::Binary(bytes)) => Ok(Some(bytes.clone())),
            Some(_) => Err(FacadeError::CorrelationIdNotBinary),
        }
    }

    /// Store a binary correlation id directly; always clears the
    /// application-specific flag.
    pub fn set_correlation_id_bytes(&mut self, bytes: Option<&[u8]>) {
        match bytes {
            Some(bytes) => {
                self.message.ensure_properties().correlation_id =
                    Some(MessageId::Binary(Bytes::copy_from_slice(bytes)));
            }
            None => {
                if let Some(props) = self.message.properties_mut() {
                    props.correlation_id = None;
                }
            }
        }
        self.remove_message_annotation(keys::annotations::APP_CORRELATION_ID);
    }

    fn is_app_correlation_id(&self) -> bool {
        self.message_annotation(keys::annotations::APP_CORRELATION_ID)
            .and_then(AmqpValue::as_bool)
            .unwrap_or(false)
    }

    // -- properties: group fields --

    pub fn group_id(&self) -> Option<&str> {
        self.message.properties().and_then(|p| p.group_id.as_deref())
    }

    pub fn set_group_id(&mut self, group_id: Option<&str>) {
        match group_id {
            Some(value) => self.message.ensure_properties().group_id = Some(value.to_string()),
            None => {
                if let Some(props) = self.message.properties_mut() {
                    props.group_id = None;
                }
            }
        }
    }

    pub fn reply_to_group_id(&self) -> Option<&str> {
        self.message
            .properties()
            .and_then(|p| p.reply_to_group_id.as_deref())
    }

    pub fn set_reply_to_group_id(&mut self, group_id: Option<&str>) {
        match group_id {
            Some(value) => {
                self.message.ensure_properties().reply_to_group_id = Some(value.to_string());
            }
            None => {
                if let Some(props) = self.message.properties_mut() {
                    props.reply_to_group_id = None;
                }
            }
        }
    }

    /// Group sequence as JMS sees it: the unsigned 32-bit wire value
    /// reinterpreted as signed, so `2^32 - 1` reads as `-1`.
    #[allow(clippy::cast_possible_wrap)]
    pub fn group_sequence(&self) -> i32 {
        self.message
            .properties()
            .and_then(|p| p.group_sequence)
            .map_or(0, |u| u as i32)
    }

    /// Negative values map into the upper half of the unsigned range
    /// via two's-complement reinterpretation. Zero clears the field and
    /// never materializes the section.
    #[allow(clippy::cast_sign_loss)]
    pub fn set_group_sequence(&mut self, sequence: i32) {
        if sequence == 0 {
            if let Some(props) = self.message.properties_mut() {
                props.group_sequence = None;
            }
        } else {
            self.message.ensure_properties().group_sequence = Some(sequence as u32);
        }
    }

    // -- properties: subject / content type --

    /// JMS message type, backed by the `subject` field.
    pub fn jms_type(&self) -> Option<&str> {
        self.message.properties().and_then(|p| p.subject.as_deref())
    }

    pub fn set_jms_type(&mut self, jms_type: Option<&str>) {
        match jms_type {
            Some(value) => self.message.ensure_properties().subject = Some(value.to_string()),
            None => {
                if let Some(props) = self.message.properties_mut() {
                    props.subject = None;
                }
            }
        }
    }

    pub fn content_type(&self) -> Option<&str> {
        self.message
            .properties()
            .and_then(|p| p.content_type.as_ref())
            .map(Symbol::as_str)
    }

    pub fn set_content_type(&mut self, content_type: Option<&str>) {
        match content_type {
            Some(value) => {
                self.message.ensure_properties().content_type = Some(Symbol::from(value));
            }
            None => {
                if let Some(props) = self.message.properties_mut() {
                    props.content_type = None;
                }
            }
        }
    }

    // -- properties: user id --

    /// User id decoded as UTF-8; a non-UTF-8 wire value reads as absent.
    pub fn user_id(&self) -> Option<String> {
        let bytes = self.message.properties().and_then(|p| p.user_id.as_ref())?;
        match std::str::from_utf8(bytes) {
            Ok(value) => Some(value.to_string()),
            Err(_) => {
                tracing::warn!(len = bytes.len(), "ignoring non-utf8 user-id");
                None
            }
        }
    }

    pub fn set_user_id(&mut self, user_id: Option<&str>) {
        match user_id {
            Some(value) => {
                self.message.ensure_properties().user_id =
                    Some(Bytes::copy_from_slice(value.as_bytes()));
            }
            None => {
                if let Some(props) = self.message.properties_mut() {
                    props.user_id = None;
                }
            }
        }
    }

    // -- properties: timestamps --

    /// Send timestamp, backed by `creation-time`; 0 when unset.
    pub fn timestamp(&self) -> i64 {
        self.message
            .properties()
            .and_then(|p| p.creation_time)
            .unwrap_or(0)
    }

    pub fn set_timestamp(&mut self, timestamp: i64) {
        if timestamp == 0 {
            if let Some(props) = self.message.properties_mut() {
                props.creation_time = None;
            }
        } else {
            self.message.ensure_properties().creation_time = Some(timestamp);
        }
    }

    /// Expiration time, backed by `absolute-expiry-time`.
    ///
    /// A received message that carried a header ttl but no absolute
    /// expiry gets `receive-time + ttl`, computed once and cached so
    /// repeated reads agree.
    pub fn expiration(&self) -> i64 {
        if let Some(expiry) = self.message.properties().and_then(|p| p.absolute_expiry_time) {
            return expiry;
        }
        if let Some(incoming) = &self.incoming {
            if let Some(cached) = incoming.synthesized_expiration.get() {
                return cached;
            }
            if let Some(ttl) = self.message.header().and_then(|h| h.ttl) {
                let synthesized = incoming.received_at + i64::from(ttl);
                incoming.synthesized_expiration.set(Some(synthesized));
                return synthesized;
            }
        }
        0
    }

    pub fn set_expiration(&mut self, expiration: i64) {
        if expiration == 0 {
            if let Some(props) = self.message.properties_mut() {
                props.absolute_expiry_time = None;
            }
        } else {
            self.message.ensure_properties().absolute_expiry_time = Some(expiration);
        }
    }

    // -- destinations --

    pub fn destination(&self) -> Option<JmsDestination> {
        let address = self.message.properties().and_then(|p| p.to.as_deref())?;
        Some(JmsDestination {
            kind: self.resolved_kind(keys::annotations::DESTINATION),
            address: address.to_string(),
        })
    }

    pub fn set_destination(&mut self, destination: Option<&JmsDestination>) {
        match destination {
            Some(dest) => {
                self.message.ensure_properties().to = Some(dest.address.clone());
                self.set_message_annotation(
                    keys::annotations::DESTINATION,
                    AmqpValue::Byte(dest.kind.wire_code()),
                );
            }
            None => {
                if let Some(props) = self.message.properties_mut() {
                    props.to = None;
                }
                self.remove_message_annotation(keys::annotations::DESTINATION);
            }
        }
    }

    pub fn reply_to(&self) -> Option<JmsDestination> {
        let address = self.message.properties().and_then(|p| p.reply_to.as_deref())?;
        Some(JmsDestination {
            kind: self.resolved_kind(keys::annotations::REPLY_TO),
            address: address.to_string(),
        })
    }

    pub fn set_reply_to(&mut self, reply_to: Option<&JmsDestination>) {
        match reply_to {
            Some(dest) => {
                self.message.ensure_properties().reply_to = Some(dest.address.clone());
                self.set_message_annotation(
                    keys::annotations::REPLY_TO,
                    AmqpValue::Byte(dest.kind.wire_code()),
                );
            }
            None => {
                if let Some(props) = self.message.properties_mut() {
                    props.reply_to = None;
                }
                self.remove_message_annotation(keys::annotations::REPLY_TO);
            }
        }
    }

    /// Kind from the annotation when present and recognized, else the
    /// consumer's own destination kind, else queue.
    fn resolved_kind(&self, annotation_key: &str) -> DestinationKind {
        self.message_annotation(annotation_key)
            .and_then(AmqpValue::as_i64)
            .and_then(DestinationKind::from_wire_code)
            .unwrap_or_else(|| {
                self.incoming
                    .as_ref()
                    .map_or(DestinationKind::Queue, |i| i.consumer_kind)
            })
    }

    // -- message annotations --

    pub fn message_annotation_exists(&self, name: &str) -> bool {
        self.message
            .message_annotations()
            .is_some_and(|a| a.contains_key(&Symbol::from(name)))
    }

    pub fn message_annotation(&self, name: &str) -> Option<&AmqpValue> {
        self.message
            .message_annotations()
            .and_then(|a| a.get(&Symbol::from(name)))
    }

    pub fn set_message_annotation(&mut self, name: &str, value: AmqpValue) {
        self.message
            .ensure_message_annotations()
            .insert(Symbol::from(name), value);
    }

    pub fn remove_message_annotation(&mut self, name: &str) {
        if let Some(annotations) = self.message.message_annotations_mut() {
            annotations.remove(&Symbol::from(name));
        }
    }

    /// Drops the whole section, including the body-kind annotation; it
    /// is re-stamped at send time.
    pub fn clear_message_annotations(&mut self) {
        self.message.set_message_annotations(None);
    }

    // -- application properties --

    pub fn property_names(&self) -> Vec<&str> {
        self.message
            .application_properties()
            .map(|p| p.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn has_property(&self, name: &str) -> bool {
        !name.is_empty()
            && self
                .message
                .application_properties()
                .is_some_and(|p| p.contains_key(name))
    }

    pub fn property(&self, name: &str) -> Option<&AmqpValue> {
        self.message
            .application_properties()
            .and_then(|p| p.get(name))
    }

    /// # Errors
    ///
    /// An empty name is caller misuse
    /// ([`ErrorKind::IllegalArgument`](crate::ErrorKind)), not a message
    /// format problem.
    pub fn set_property(&mut self, name: &str, value: AmqpValue) -> Result<(), FacadeError> {
        if name.is_empty() {
            return Err(FacadeError::EmptyPropertyName);
        }
        self.message
            .ensure_application_properties()
            .insert(name.to_string(), value);
        Ok(())
    }

    pub fn clear_properties(&mut self) {
        self.message.set_application_properties(None);
    }

    // -- lifecycle --

    /// Finalize header state for one outbound delivery.
    ///
    /// The ttl override wins over the producer's default ttl; with
    /// neither, any stale header ttl from a prior hop is cleared. The
    /// body-kind annotation and durable flag are re-asserted in case the
    /// message was received or its annotations were cleared.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn on_send(&mut self, producer_ttl: i64) {
        let effective_ttl = if self.has_ttl_override() {
            Some(self.ttl())
        } else if producer_ttl > 0 {
            Some(producer_ttl)
        } else {
            None
        };
        match effective_ttl {
            Some(ttl) => self.message.ensure_header().ttl = Some(ttl.min(MAX_TTL) as u32),
            None => {
                if let Some(header) = self.message.header_mut() {
                    header.ttl = None;
                }
            }
        }

        self.set_message_annotation(
            keys::annotations::MSG_TYPE,
            AmqpValue::Byte(self.kind.wire_code()),
        );
        if self.durable() {
            self.message.ensure_header().durable = Some(true);
        }
        tracing::debug!(kind = %self.kind, "finalized message for send");
    }

    /// Deep clone of the message and receive-side state; the connection
    /// reference is shared, not cloned.
    #[must_use]
    pub fn copy(&self) -> Self {
        Self {
            message: self.message.clone(),
            kind: self.kind,
            cursor: self.cursor.clone(),
            connection: Arc::clone(&self.connection),
            incoming: self.incoming.clone(),
        }
    }

    /// Detach the body; no other section is touched. The read/write
    /// cursor returns to writable.
    pub fn clear_body(&mut self) {
        self.message.set_body(None);
        self.cursor = BodyCursor::Writable;
    }
}
