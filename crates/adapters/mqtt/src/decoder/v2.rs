//! Topic grammar of protocol version 2.
//!
//! ```text
//! /fb/v2/{device}/${attribute}
//! /fb/v2/{device}/$hw/{parameter}
//! /fb/v2/{device}/$extension/{type}/{parameter}
//! /fb/v2/{device}[/$channel/{channel}]/$control/{control}[/set|/schema]
//! /fb/v2/{device}[/$channel/{channel}]/{property}[/${attribute}]
//! /fb/v2/{device}/$channel/{channel}/${attribute}
//! ```
//!
//! Reserved segments are matched before a segment is taken as a property
//! identifier.

use std::str::FromStr;

use fbmqtt_domain::error::FbMqttError;
use fbmqtt_domain::id::ClientId;
use fbmqtt_domain::message::{ExtensionType, Message, MessageHeader};
use fbmqtt_domain::protocol::ProtocolVersion;

use super::{
    Decoder, attribute_token, channel_attribute, control, device_attribute, extension, hardware,
    header, layout, payload_text, property_path, segments, with_channel,
};

/// Decoder for `/fb/v2` topics.
#[derive(Debug, Clone, Copy, Default)]
pub struct V2Decoder;

impl Decoder for V2Decoder {
    fn version(&self) -> ProtocolVersion {
        ProtocolVersion::V2
    }

    fn decode(
        &self,
        client_id: ClientId,
        topic: &str,
        payload: &[u8],
        retained: bool,
    ) -> Result<Message, FbMqttError> {
        let parts = segments(topic, ProtocolVersion::V2)?;
        let payload = payload_text(payload)?;

        let [device, rest @ ..] = parts.as_slice() else {
            return Err(layout(topic));
        };
        let header = header(client_id, device, None, retained)?;

        match rest {
            ["$hw", parameter] => hardware(header, parameter, payload),
            ["$extension", kind, parameter] => {
                extension(header, ExtensionType::from_str(kind)?, parameter, payload)
            }
            ["$channel", channel, rest @ ..] => {
                decode_channel(topic, with_channel(header, channel)?, rest, payload)
            }
            ["$hw" | "$extension" | "$channel", ..] => Err(layout(topic)),
            rest => decode_scoped(topic, header, rest, payload, device_attribute),
        }
    }
}

fn decode_channel(
    topic: &str,
    header: MessageHeader,
    rest: &[&str],
    payload: &str,
) -> Result<Message, FbMqttError> {
    decode_scoped(topic, header, rest, payload, channel_attribute)
}

/// Controls, attributes and properties, shared by the device and channel
/// scopes.
fn decode_scoped(
    topic: &str,
    header: MessageHeader,
    rest: &[&str],
    payload: &str,
    attribute: fn(MessageHeader, &str, &str) -> Result<Message, FbMqttError>,
) -> Result<Message, FbMqttError> {
    match rest {
        ["$control", name] => control(topic, header, name, None, payload),
        ["$control", name, action] => control(topic, header, name, Some(*action), payload),
        ["$control", ..] => Err(layout(topic)),
        [segment, tail @ ..] => match attribute_token(segment) {
            Some(name) if tail.is_empty() => attribute(header, name, payload),
            Some(_) => Err(layout(topic)),
            None => property_path(topic, header, segment, tail, payload),
        },
        [] => Err(layout(topic)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fbmqtt_domain::attribute::{AttributeName, PropertyAttribute};
    use fbmqtt_domain::error::{MalformedTopicError, ParseMessageError};
    use fbmqtt_domain::format::PropertyFormat;
    use fbmqtt_domain::message::{
        ChannelAttribute, ControlName, ControlValue, DeviceAttribute, ExtensionParameter,
        HardwareParameter,
    };

    fn decode(topic: &str, payload: &str) -> Result<Message, FbMqttError> {
        V2Decoder.decode(ClientId::new(), topic, payload.as_bytes(), false)
    }

    #[test]
    fn should_decode_hardware_mac_address() {
        let Message::Hardware(message) =
            decode("/fb/v2/device-name/$hw/mac-address", "00:0a:95:9d:68:16").unwrap()
        else {
            panic!("expected hardware message");
        };
        assert_eq!(message.parameter(), HardwareParameter::MacAddress);
        assert_eq!(message.value(), "000a959d6816");
    }

    #[test]
    fn should_decode_extension_with_type() {
        let Message::Extension(message) =
            decode("/fb/v2/sensor/$extension/sonoff/model", "basic").unwrap()
        else {
            panic!("expected extension message");
        };
        assert_eq!(message.extension(), ExtensionType::Sonoff);
        assert_eq!(message.parameter(), ExtensionParameter::Model);
        assert_eq!(message.value(), "basic");
    }

    #[test]
    fn should_reject_unknown_extension_type() {
        let err = decode("/fb/v2/sensor/$extension/tasmota/model", "x").unwrap_err();
        assert!(matches!(err, FbMqttError::InvalidArgument(_)));
    }

    #[test]
    fn should_decode_device_attribute() {
        let Message::Device(message) = decode("/fb/v2/sensor/$properties", "rssi,uptime").unwrap()
        else {
            panic!("expected device message");
        };
        assert_eq!(
            message.attribute(),
            &DeviceAttribute::Properties(vec!["rssi".into(), "uptime".into()])
        );
    }

    #[test]
    fn should_decode_device_property_without_marker() {
        let Message::Property(message) = decode("/fb/v2/sensor/temperature", "21.5").unwrap()
        else {
            panic!("expected property message");
        };
        assert!(message.header().channel.is_none());
        assert_eq!(message.property(), "temperature");
        assert_eq!(message.value(), Some("21.5"));
    }

    #[test]
    fn should_decode_channel_property_attribute() {
        let Message::Property(message) =
            decode("/fb/v2/sensor/$channel/dimmer/brightness/$format", "0:100").unwrap()
        else {
            panic!("expected property message");
        };
        assert_eq!(message.header().channel.as_deref(), Some("dimmer"));
        assert_eq!(message.property(), "brightness");
        assert_eq!(
            message.attributes().get(AttributeName::Format),
            Some(&PropertyAttribute::Format(Some(PropertyFormat::Range {
                min: Some(0.0),
                max: Some(100.0),
            })))
        );
    }

    #[test]
    fn should_decode_channel_attribute() {
        let Message::Channel(message) =
            decode("/fb/v2/sensor/$channel/relay/$controls", "configure").unwrap()
        else {
            panic!("expected channel message");
        };
        assert_eq!(
            message.attribute(),
            &ChannelAttribute::Controls(vec![ControlName::Configure])
        );
    }

    #[test]
    fn should_decode_channel_control_value() {
        let Message::Control(message) = decode(
            "/fb/v2/sensor/$channel/relay/$control/configure/set",
            r#"{"mode":"toggle"}"#,
        )
        .unwrap() else {
            panic!("expected control message");
        };
        assert_eq!(message.header().channel.as_deref(), Some("relay"));
        assert_eq!(
            message.value(),
            Some(&ControlValue::Json(serde_json::json!({"mode": "toggle"})))
        );
    }

    #[test]
    fn should_keep_text_value_for_device_controls() {
        let Message::Control(message) =
            decode("/fb/v2/sensor/$control/reboot/set", "now").unwrap()
        else {
            panic!("expected control message");
        };
        assert_eq!(message.value(), Some(&ControlValue::Text("now".into())));
    }

    #[test]
    fn should_reject_malformed_configure_value() {
        let err = decode("/fb/v2/sensor/$control/configure/set", "{oops").unwrap_err();
        assert!(matches!(err, FbMqttError::ParseMessage(ParseMessageError::Json)));
    }

    #[test]
    fn should_reject_malformed_topics() {
        for topic in [
            "/fb/v2/sensor",
            "/fb/v2/sensor/$hw",
            "/fb/v2/sensor/$extension/sonoff",
            "/fb/v2/sensor/$channel/relay",
            "/fb/v2/sensor/$name/extra",
            "/fb/v2/sensor/temperature/unit",
            "/fb/v2/sensor/$control/configure/set/extra",
            "/fb/v2/sensor/Temperature",
            "/fb/v1/sensor/temperature",
        ] {
            let err = decode(topic, "x").unwrap_err();
            assert!(
                matches!(err, FbMqttError::MalformedTopic(_)),
                "{topic} should be malformed, got {err:?}"
            );
        }
    }

    #[test]
    fn should_not_accept_child_topics() {
        let err = decode("/fb/v2/gateway/$child/sensor/$name", "x").unwrap_err();
        assert!(matches!(
            err,
            FbMqttError::MalformedTopic(MalformedTopicError::Layout(_))
        ));
    }

    #[test]
    fn should_round_trip_property_through_to_value() {
        let rendered = |topic: &str, payload: &str| {
            let topic = format!("/fb/v2/sensor/temperature{topic}");
            let Message::Property(message) = decode(&topic, payload).unwrap() else {
                panic!("expected property message for {topic}");
            };
            message.to_value()
        };

        let value = rendered("", "21.5");
        assert_eq!(value["device"], "sensor");
        assert_eq!(value["property"], "temperature");
        assert_eq!(value["value"], "21.5");

        let unset = rendered("", "N/A");
        assert_eq!(unset["property"], "temperature");
        assert!(unset.get("value").is_none());

        let cases = [
            ("/$format", "10:20", "format", serde_json::json!([10.0, 20.0])),
            ("/$format", "heat,cool", "format", serde_json::json!(["heat", "cool"])),
            ("/$format", "rgb", "format", serde_json::json!("rgb")),
            ("/$settable", "true", "settable", serde_json::json!(true)),
            ("/$datatype", "float", "datatype", serde_json::json!("float")),
            ("/$name", "Temperature", "name", serde_json::json!("Temperature")),
            ("/$unit", "°C", "unit", serde_json::json!("°C")),
        ];
        for (suffix, payload, key, expected) in cases {
            let attribute = rendered(suffix, payload);
            assert_eq!(attribute["property"], "temperature", "{suffix}");
            assert_eq!(attribute[key], expected, "{suffix} = {payload}");
            assert!(attribute.get("value").is_none(), "{suffix}");
        }
    }
}
