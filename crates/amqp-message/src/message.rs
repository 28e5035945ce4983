use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::body::Body;
use crate::header::Header;
use crate::properties::Properties;
use crate::value::{AmqpValue, Symbol};

/// Message-annotations section: symbol-keyed metadata owned by the
/// messaging infrastructure rather than the application.
pub type MessageAnnotations = HashMap<Symbol, AmqpValue>;

/// Application-properties section: string-keyed application metadata.
pub type ApplicationProperties = HashMap<String, AmqpValue>;

/// A mutable in-memory AMQP 1.0 message: the value the codec decodes
/// into and encodes from, owned exclusively by whoever holds it.
///
/// Sections are optional and stay absent until a caller materializes
/// them. Every section has a getter pair (`x()` / `x_mut()`) for
/// read-or-default paths and an `ensure_x()` for mutators that must
/// write a non-default value. Field clearing sets the field to `None`
/// inside a retained section; this type never drops a section on its
/// own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AmqpMessage {
    header: Option<Header>,
    message_annotations: Option<MessageAnnotations>,
    properties: Option<Properties>,
    application_properties: Option<ApplicationProperties>,
    body: Option<Body>,
}

impl AmqpMessage {
    pub fn new() -> Self {
        Self::default()
    }

    // -- header --

    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    pub fn header_mut(&mut self) -> Option<&mut Header> {
        self.header.as_mut()
    }

    pub fn ensure_header(&mut self) -> &mut Header {
        self.header.get_or_insert_with(Header::default)
    }

    pub fn set_header(&mut self, header: Option<Header>) {
        self.header = header;
    }

    // -- message annotations --

    pub fn message_annotations(&self) -> Option<&MessageAnnotations> {
        self.message_annotations.as_ref()
    }

    pub fn message_annotations_mut(&mut self) -> Option<&mut MessageAnnotations> {
        self.message_annotations.as_mut()
    }

    pub fn ensure_message_annotations(&mut self) -> &mut MessageAnnotations {
        self.message_annotations.get_or_insert_with(HashMap::new)
    }

    pub fn set_message_annotations(&mut self, annotations: Option<MessageAnnotations>) {
        self.message_annotations = annotations;
    }

    // -- properties --

    pub fn properties(&self) -> Option<&Properties> {
        self.properties.as_ref()
    }

    pub fn properties_mut(&mut self) -> Option<&mut Properties> {
        self.properties.as_mut()
    }

    pub fn ensure_properties(&mut self) -> &mut Properties {
        self.properties.get_or_insert_with(Properties::default)
    }

    pub fn set_properties(&mut self, properties: Option<Properties>) {
        self.properties = properties;
    }

    // -- application properties --

    pub fn application_properties(&self) -> Option<&ApplicationProperties> {
        self.application_properties.as_ref()
    }

    pub fn application_properties_mut(&mut self) -> Option<&mut ApplicationProperties> {
        self.application_properties.as_mut()
    }

    pub fn ensure_application_properties(&mut self) -> &mut ApplicationProperties {
        self.application_properties.get_or_insert_with(HashMap::new)
    }

    pub fn set_application_properties(&mut self, properties: Option<ApplicationProperties>) {
        self.application_properties = properties;
    }

    // -- body --

    pub fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    pub fn body_mut(&mut self) -> Option<&mut Body> {
        self.body.as_mut()
    }

    pub fn set_body(&mut self, body: Option<Body>) {
        self.body = body;
    }
}
