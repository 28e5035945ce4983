//! Wire-level keys and codes shared with interoperating JMS-over-AMQP
//! clients. These strings are bit-exact interop surface; do not rename.

/// Message-annotation symbol keys.
pub mod annotations {
    /// Which JMS body variant the message carries. Value: a small
    /// integer from [`crate::keys::msg_types`].
    pub const MSG_TYPE: &str = "x-opt-jms-msg-type";
    /// Destination kind hint for the `to` field.
    pub const DESTINATION: &str = "x-opt-jms-dest";
    /// Destination kind hint for the `reply-to` field.
    pub const REPLY_TO: &str = "x-opt-jms-reply-to";
    /// Set to `true` when the correlation-id is an arbitrary
    /// application string rather than a former message-id.
    pub const APP_CORRELATION_ID: &str = "x-opt-app-correlation-id";
}

/// Application-property keys.
pub mod properties {
    /// The application's time-to-live override, milliseconds in
    /// unsigned 32-bit range. Applied to the header at send time.
    pub const TTL_OVERRIDE: &str = "JMS_AMQP_TTL";
}

/// Content-type hints stamped on `data` bodies.
pub mod content_types {
    pub const OCTET_STREAM: &str = "application/octet-stream";
    /// Serialized object graphs; peer-compatible with existing JMS
    /// clients regardless of the serializer actually configured.
    pub const SERIALIZED_OBJECT: &str = "application/x-java-serialized-object";
}

/// Values of the `x-opt-jms-msg-type` annotation.
pub mod msg_types {
    pub const MESSAGE: i8 = 0;
    pub const OBJECT: i8 = 1;
    pub const MAP: i8 = 2;
    pub const BYTES: i8 = 3;
    pub const STREAM: i8 = 4;
    pub const TEXT: i8 = 5;
}

/// Values of the destination kind annotations.
pub mod dest_types {
    pub const QUEUE: i8 = 0;
    pub const TOPIC: i8 = 1;
    pub const TEMP_QUEUE: i8 = 2;
    pub const TEMP_TOPIC: i8 = 3;
}
