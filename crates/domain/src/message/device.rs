use std::str::FromStr;

use serde_json::Value;

use super::{ControlName, ExtensionType, MessageHeader};
use crate::device::ConnectionState;
use crate::error::ParseMessageError;
use crate::payload::{clean_name, parse_identifier_list, parse_token_list};
use crate::token::closed_set;

closed_set!(
    /// Device-level `$` attributes.
    DeviceAttributeName, "device attribute" {
        State => "state",
        Name => "name",
        Properties => "properties",
        Channels => "channels",
        Extensions => "extensions",
        Controls => "controls",
    }
);

/// A parsed device attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceAttribute {
    State(ConnectionState),
    Name(Option<String>),
    Properties(Vec<String>),
    Channels(Vec<String>),
    Extensions(Vec<ExtensionType>),
    Controls(Vec<ControlName>),
}

impl DeviceAttribute {
    /// Parse the payload of a device attribute.
    ///
    /// # Errors
    ///
    /// Returns [`ParseMessageError`] for unknown states, invalid identifiers
    /// and unknown list tokens.
    pub fn parse(name: DeviceAttributeName, raw: &str) -> Result<Self, ParseMessageError> {
        Ok(match name {
            DeviceAttributeName::State => Self::State(
                ConnectionState::from_str(&raw.trim().to_lowercase())
                    .map_err(|_| ParseMessageError::ConnectionState(raw.to_string()))?,
            ),
            DeviceAttributeName::Name => Self::Name(clean_name(raw)),
            DeviceAttributeName::Properties => Self::Properties(parse_identifier_list(raw)?),
            DeviceAttributeName::Channels => Self::Channels(parse_identifier_list(raw)?),
            DeviceAttributeName::Extensions => Self::Extensions(parse_token_list(raw)?),
            DeviceAttributeName::Controls => Self::Controls(parse_token_list(raw)?),
        })
    }

    #[must_use]
    pub fn name(&self) -> DeviceAttributeName {
        match self {
            Self::State(_) => DeviceAttributeName::State,
            Self::Name(_) => DeviceAttributeName::Name,
            Self::Properties(_) => DeviceAttributeName::Properties,
            Self::Channels(_) => DeviceAttributeName::Channels,
            Self::Extensions(_) => DeviceAttributeName::Extensions,
            Self::Controls(_) => DeviceAttributeName::Controls,
        }
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::State(state) => Value::String(state.to_string()),
            Self::Name(name) => serde_json::json!(name),
            Self::Properties(items) | Self::Channels(items) => serde_json::json!(items),
            Self::Extensions(items) => serde_json::json!(items),
            Self::Controls(items) => serde_json::json!(items),
        }
    }
}

/// A device attribute message (`/{device}/$state`, `/{device}/$name`, …).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceAttributeMessage {
    header: MessageHeader,
    attribute: DeviceAttribute,
}

impl DeviceAttributeMessage {
    #[must_use]
    pub fn new(header: MessageHeader, attribute: DeviceAttribute) -> Self {
        Self { header, attribute }
    }

    #[must_use]
    pub fn header(&self) -> &MessageHeader {
        &self.header
    }

    #[must_use]
    pub fn attribute(&self) -> &DeviceAttribute {
        &self.attribute
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut map = self.header.to_map();
        map.insert(
            self.attribute.name().as_str().into(),
            self.attribute.to_value(),
        );
        Value::Object(map)
    }
}
