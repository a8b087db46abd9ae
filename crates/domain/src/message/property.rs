use serde_json::Value;

use super::MessageHeader;
use crate::attribute::{PropertyAttribute, PropertyAttributes};

/// A device or channel property message.
///
/// Carries either a value update (`value` is set) or an attribute update
/// (`value` is `None`, attributes describe the property).
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyMessage {
    header: MessageHeader,
    property: String,
    value: Option<String>,
    attributes: PropertyAttributes,
}

impl PropertyMessage {
    #[must_use]
    pub fn new(header: MessageHeader, property: impl Into<String>) -> Self {
        Self {
            header,
            property: property.into(),
            value: None,
            attributes: PropertyAttributes::default(),
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Add an attribute. A second attribute with the same name is ignored
    /// and `false` is returned.
    pub fn add_attribute(&mut self, attribute: PropertyAttribute) -> bool {
        self.attributes.insert(attribute)
    }

    #[must_use]
    pub fn header(&self) -> &MessageHeader {
        &self.header
    }

    #[must_use]
    pub fn property(&self) -> &str {
        &self.property
    }

    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    #[must_use]
    pub fn attributes(&self) -> &PropertyAttributes {
        &self.attributes
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut map = self.header.to_map();
        map.insert("property".into(), Value::String(self.property.clone()));
        for attribute in &self.attributes {
            map.insert(attribute.name().as_str().into(), attribute.to_value());
        }
        if let Some(value) = &self.value {
            map.insert("value".into(), Value::String(value.clone()));
        }
        Value::Object(map)
    }
}
