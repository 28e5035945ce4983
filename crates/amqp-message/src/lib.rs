//! Mutable in-memory AMQP 1.0 message model.
//!
//! This crate holds the value a wire codec decodes into and encodes
//! from: the five optional message sections, the typed primitive value
//! model, and the four-variant message-id union. It performs no I/O and
//! knows nothing about JMS; the facade crate layers those semantics on
//! top.

pub mod body;
pub mod header;
pub mod message;
pub mod properties;
pub mod value;

pub use body::Body;
pub use header::Header;
pub use message::{AmqpMessage, ApplicationProperties, MessageAnnotations};
pub use properties::{MessageId, Properties};
pub use value::{AmqpValue, Symbol};
