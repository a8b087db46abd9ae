//! Topic decoders.
//!
//! A [`Decoder`] turns one MQTT publish (topic, payload, retained flag) into
//! exactly one [`Message`] or an error. Each protocol version has its own
//! topic grammar; the payload grammars are shared and live in the domain
//! crate. [`Decoders`] is the lookup table the transport consults once per
//! event.

mod v1;
mod v2;

pub use v1::V1Decoder;
pub use v2::V2Decoder;

use std::collections::HashMap;
use std::str::FromStr;

use fbmqtt_domain::attribute::PropertyAttribute;
use fbmqtt_domain::error::{FbMqttError, MalformedTopicError, ParseMessageError};
use fbmqtt_domain::id::{ClientId, is_valid_identifier};
use fbmqtt_domain::message::{
    ChannelAttribute, ChannelAttributeMessage, ChannelAttributeName, ControlMessage, ControlName,
    DeviceAttribute, DeviceAttributeMessage, DeviceAttributeName, ExtensionMessage,
    ExtensionParameter, ExtensionType, HardwareMessage, HardwareParameter, Message,
    MessageHeader, PropertyMessage,
};
use fbmqtt_domain::protocol::{ProtocolVersion, VALUE_NOT_SET};

/// Decoder for one protocol version.
pub trait Decoder: Send + Sync {
    fn version(&self) -> ProtocolVersion;

    /// Decode a wire event.
    ///
    /// # Errors
    ///
    /// - [`FbMqttError::MalformedTopic`] when the topic matches no rule of
    ///   the grammar or carries an invalid identifier.
    /// - [`FbMqttError::ParseMessage`] when the payload is invalid for the
    ///   matched message kind.
    /// - [`FbMqttError::InvalidArgument`] when a topic token is outside its
    ///   closed set.
    fn decode(
        &self,
        client_id: ClientId,
        topic: &str,
        payload: &[u8],
        retained: bool,
    ) -> Result<Message, FbMqttError>;
}

/// Decoders keyed by protocol version.
pub struct Decoders {
    decoders: HashMap<ProtocolVersion, Box<dyn Decoder>>,
}

impl Default for Decoders {
    fn default() -> Self {
        let mut decoders = Self::empty();
        decoders.register(Box::new(V1Decoder));
        decoders.register(Box::new(V2Decoder));
        decoders
    }
}

impl Decoders {
    /// A table with no decoders registered.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Register a decoder, replacing any previous one for the same version.
    pub fn register(&mut self, decoder: Box<dyn Decoder>) {
        self.decoders.insert(decoder.version(), decoder);
    }

    #[must_use]
    pub fn get(&self, version: ProtocolVersion) -> Option<&dyn Decoder> {
        let decoder = self.decoders.get(&version)?;
        Some(decoder.as_ref())
    }
}

/// Split a topic into the segments following the version prefix.
pub(crate) fn segments(
    topic: &str,
    version: ProtocolVersion,
) -> Result<Vec<&str>, MalformedTopicError> {
    let prefix = version.topic_prefix();
    let rest = topic
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('/'))
        .ok_or_else(|| MalformedTopicError::Prefix {
            topic: topic.to_string(),
            prefix,
        })?;

    let parts: Vec<&str> = rest.split('/').collect();
    if parts.iter().any(|part| part.is_empty()) {
        return Err(MalformedTopicError::Layout(topic.to_string()));
    }
    Ok(parts)
}

pub(crate) fn identifier(segment: &str) -> Result<&str, MalformedTopicError> {
    if is_valid_identifier(segment) {
        Ok(segment)
    } else {
        Err(MalformedTopicError::Identifier(segment.to_string()))
    }
}

pub(crate) fn layout(topic: &str) -> FbMqttError {
    MalformedTopicError::Layout(topic.to_string()).into()
}

pub(crate) fn payload_text(payload: &[u8]) -> Result<&str, ParseMessageError> {
    std::str::from_utf8(payload).map_err(|_| ParseMessageError::Utf8)
}

pub(crate) fn header(
    client_id: ClientId,
    device: &str,
    parent: Option<&str>,
    retained: bool,
) -> Result<MessageHeader, MalformedTopicError> {
    let mut header = MessageHeader::new(client_id, identifier(device)?).with_retained(retained);
    if let Some(parent) = parent {
        header = header.with_parent(identifier(parent)?);
    }
    Ok(header)
}

pub(crate) fn with_channel(
    header: MessageHeader,
    channel: &str,
) -> Result<MessageHeader, MalformedTopicError> {
    Ok(header.with_channel(identifier(channel)?))
}

/// `$`-prefixed segment without its marker.
pub(crate) fn attribute_token(segment: &str) -> Option<&str> {
    segment.strip_prefix('$').filter(|token| !token.is_empty())
}

pub(crate) fn device_attribute(
    header: MessageHeader,
    name: &str,
    payload: &str,
) -> Result<Message, FbMqttError> {
    let name = DeviceAttributeName::from_str(name)?;
    let attribute = DeviceAttribute::parse(name, payload)?;
    Ok(DeviceAttributeMessage::new(header, attribute).into())
}

pub(crate) fn channel_attribute(
    header: MessageHeader,
    name: &str,
    payload: &str,
) -> Result<Message, FbMqttError> {
    let name = ChannelAttributeName::from_str(name)?;
    let attribute = ChannelAttribute::parse(name, payload)?;
    Ok(ChannelAttributeMessage::new(header, attribute).into())
}

pub(crate) fn hardware(
    header: MessageHeader,
    parameter: &str,
    payload: &str,
) -> Result<Message, FbMqttError> {
    let parameter = HardwareParameter::from_str(parameter)?;
    Ok(HardwareMessage::new(header, parameter, payload)?.into())
}

pub(crate) fn extension(
    header: MessageHeader,
    extension: ExtensionType,
    parameter: &str,
    payload: &str,
) -> Result<Message, FbMqttError> {
    let parameter = ExtensionParameter::from_str(parameter)?;
    Ok(ExtensionMessage::new(header, extension, parameter, payload)?.into())
}

/// `$control/{name}` announces the control, `/set` carries its value and
/// `/schema` the `configure` schema.
pub(crate) fn control(
    topic: &str,
    header: MessageHeader,
    name: &str,
    action: Option<&str>,
    payload: &str,
) -> Result<Message, FbMqttError> {
    let control = ControlName::from_str(name)?;
    let mut message = ControlMessage::new(header, control)?;
    match action {
        None => {}
        Some("set") => message.set_value(payload)?,
        Some("schema") if message.is_configuration() => message.set_schema(payload)?,
        Some(_) => return Err(layout(topic)),
    }
    Ok(message.into())
}

/// A property topic without an attribute carries the value; `N/A` leaves
/// it unset. With an attribute it carries that attribute only.
pub(crate) fn property(
    header: MessageHeader,
    property: &str,
    attribute: Option<&str>,
    payload: &str,
) -> Result<Message, FbMqttError> {
    let mut message = PropertyMessage::new(header, identifier(property)?);
    match attribute {
        Some(name) => {
            message.add_attribute(PropertyAttribute::parse(name, payload)?);
        }
        None if payload == VALUE_NOT_SET => {}
        None => message = message.with_value(payload),
    }
    Ok(message.into())
}

/// Property topic tail: nothing for a value, one `$attribute` otherwise.
pub(crate) fn property_path(
    topic: &str,
    header: MessageHeader,
    name: &str,
    tail: &[&str],
    payload: &str,
) -> Result<Message, FbMqttError> {
    match tail {
        [] => property(header, name, None, payload),
        [attribute] => {
            let attribute = attribute_token(attribute).ok_or_else(|| layout(topic))?;
            property(header, name, Some(attribute), payload)
        }
        _ => Err(layout(topic)),
    }
}
