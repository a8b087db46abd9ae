//! Topic grammar of protocol version 1.
//!
//! ```text
//! /fb/v1/{device}/${attribute}
//! /fb/v1/{device}/$hw/{parameter}
//! /fb/v1/{device}/$fw/{parameter}
//! /fb/v1/{device}/$control/{control}[/set|/schema]
//! /fb/v1/{device}/$property/{property}[/${attribute}]
//! /fb/v1/{device}/$channel/{channel}/${attribute}
//! /fb/v1/{device}/$channel/{channel}/$control/{control}[/set|/schema]
//! /fb/v1/{device}/$channel/{channel}/$property/{property}[/${attribute}]
//! /fb/v1/{parent}/$child/{device}/...
//! ```
//!
//! `$fw` reports the FastyBird firmware extension.

use fbmqtt_domain::error::FbMqttError;
use fbmqtt_domain::id::ClientId;
use fbmqtt_domain::message::{ExtensionType, Message, MessageHeader};
use fbmqtt_domain::protocol::ProtocolVersion;

use super::{
    Decoder, attribute_token, channel_attribute, control, device_attribute, extension, hardware,
    header, layout, payload_text, property_path, segments, with_channel,
};

/// Decoder for `/fb/v1` topics.
#[derive(Debug, Clone, Copy, Default)]
pub struct V1Decoder;

impl Decoder for V1Decoder {
    fn version(&self) -> ProtocolVersion {
        ProtocolVersion::V1
    }

    fn decode(
        &self,
        client_id: ClientId,
        topic: &str,
        payload: &[u8],
        retained: bool,
    ) -> Result<Message, FbMqttError> {
        let parts = segments(topic, ProtocolVersion::V1)?;
        let payload = payload_text(payload)?;

        let (parent, device, rest) = match parts.as_slice() {
            [parent, "$child", device, rest @ ..] => (Some(*parent), *device, rest),
            [device, rest @ ..] => (None, *device, rest),
            [] => return Err(layout(topic)),
        };
        let header = header(client_id, device, parent, retained)?;

        match rest {
            ["$hw", parameter] => hardware(header, parameter, payload),
            ["$fw", parameter] => extension(header, ExtensionType::FastyBird, parameter, payload),
            ["$control", name] => control(topic, header, name, None, payload),
            ["$control", name, action] => control(topic, header, name, Some(*action), payload),
            ["$property", name, tail @ ..] => property_path(topic, header, name, tail, payload),
            ["$channel", channel, rest @ ..] => {
                decode_channel(topic, with_channel(header, channel)?, rest, payload)
            }
            ["$hw" | "$fw" | "$control" | "$property" | "$channel", ..] => Err(layout(topic)),
            [segment] => match attribute_token(segment) {
                Some(name) => device_attribute(header, name, payload),
                None => Err(layout(topic)),
            },
            _ => Err(layout(topic)),
        }
    }
}

fn decode_channel(
    topic: &str,
    header: MessageHeader,
    rest: &[&str],
    payload: &str,
) -> Result<Message, FbMqttError> {
    match rest {
        ["$control", name] => control(topic, header, name, None, payload),
        ["$control", name, action] => control(topic, header, name, Some(*action), payload),
        ["$property", name, tail @ ..] => property_path(topic, header, name, tail, payload),
        ["$control" | "$property", ..] => Err(layout(topic)),
        [segment] => match attribute_token(segment) {
            Some(name) => channel_attribute(header, name, payload),
            None => Err(layout(topic)),
        },
        _ => Err(layout(topic)),
    }
}
