use serde_json::Value;

use super::{ControlName, MessageHeader};
use crate::error::ParseMessageError;
use crate::payload::{clean_name, parse_identifier_list, parse_token_list};
use crate::token::closed_set;

closed_set!(
    /// Channel-level `$` attributes.
    ChannelAttributeName, "channel attribute" {
        Name => "name",
        Properties => "properties",
        Controls => "controls",
    }
);

/// A parsed channel attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelAttribute {
    Name(Option<String>),
    Properties(Vec<String>),
    Controls(Vec<ControlName>),
}

impl ChannelAttribute {
    /// Parse the payload of a channel attribute.
    ///
    /// # Errors
    ///
    /// Returns [`ParseMessageError::ListItem`] for invalid identifiers and
    /// for controls a channel cannot expose.
    pub fn parse(name: ChannelAttributeName, raw: &str) -> Result<Self, ParseMessageError> {
        Ok(match name {
            ChannelAttributeName::Name => Self::Name(clean_name(raw)),
            ChannelAttributeName::Properties => Self::Properties(parse_identifier_list(raw)?),
            ChannelAttributeName::Controls => {
                let controls: Vec<ControlName> = parse_token_list(raw)?;
                if let Some(control) = controls.iter().find(|c| !c.is_channel_control()) {
                    return Err(ParseMessageError::ListItem(control.to_string()));
                }
                Self::Controls(controls)
            }
        })
    }

    #[must_use]
    pub fn name(&self) -> ChannelAttributeName {
        match self {
            Self::Name(_) => ChannelAttributeName::Name,
            Self::Properties(_) => ChannelAttributeName::Properties,
            Self::Controls(_) => ChannelAttributeName::Controls,
        }
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Name(name) => serde_json::json!(name),
            Self::Properties(items) => serde_json::json!(items),
            Self::Controls(items) => serde_json::json!(items),
        }
    }
}

/// A channel attribute message (`/{device}/$channel/{channel}/$name`, …).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelAttributeMessage {
    header: MessageHeader,
    attribute: ChannelAttribute,
}

impl ChannelAttributeMessage {
    #[must_use]
    pub fn new(header: MessageHeader, attribute: ChannelAttribute) -> Self {
        Self { header, attribute }
    }

    #[must_use]
    pub fn header(&self) -> &MessageHeader {
        &self.header
    }

    /// The targeted channel. Decoders always set it on the header.
    #[must_use]
    pub fn channel(&self) -> &str {
        self.header.channel.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn attribute(&self) -> &ChannelAttribute {
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
