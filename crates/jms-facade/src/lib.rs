//! JMS-shaped facade over an in-memory AMQP 1.0 message.
//!
//! The facade is the semantic bridge between the JMS programming model
//! (durable/non-persistent, priorities 0-9, string ids, typed bodies)
//! and the AMQP 1.0 wire model (optional sections, typed ids, unsigned
//! fields). It owns one [`amqp_message::AmqpMessage`] exclusively,
//! mutates it in place, and hands it back to the codec at send time.
//! No I/O, no scheduling, no session rules: callers confine a facade to
//! one producer or consumer at a time.

pub mod body;
pub mod destination;
pub mod error;
pub mod facade;
pub mod id_codec;
pub mod keys;

pub use body::{BodyCursor, MessageKind};
pub use destination::{DestinationKind, JmsDestination};
pub use error::{ErrorKind, FacadeError, IdCodecError};
pub use facade::{ConnectionOptions, ConsumerContext, MessageFacade, MAX_PRIORITY, MAX_TTL};
