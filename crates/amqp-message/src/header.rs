use serde::{Deserialize, Serialize};

/// Transport header section (AMQP 1.0 §3.2.1).
///
/// Every field is optional on the wire; absence means the protocol
/// default applies. Readers must treat `None` and the default value as
/// equivalent, writers must prefer absence over writing a default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub durable: Option<bool>,
    pub priority: Option<u8>,
    /// Milliseconds.
    pub ttl: Option<u32>,
    pub first_acquirer: Option<bool>,
    pub delivery_count: Option<u32>,
}

impl Header {
    /// Wire default when the priority field (or the whole section) is absent.
    pub const DEFAULT_PRIORITY: u8 = 4;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_header_has_no_fields() {
        let header = Header::default();
        assert_eq!(header.durable, None);
        assert_eq!(header.priority, None);
        assert_eq!(header.ttl, None);
        assert_eq!(header.first_acquirer, None);
        assert_eq!(header.delivery_count, None);
    }
}
