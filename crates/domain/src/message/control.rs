use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::MessageHeader;
use crate::error::{FbMqttError, InvalidArgumentError, ParseMessageError};
use crate::protocol::is_unset;
use crate::schema::{SchemaField, decode_schema};
use crate::token::closed_set;

closed_set!(
    /// Controls a device can expose.
    ControlName, "control" {
        Configure => "configure",
        Reset => "reset",
        Reboot => "reboot",
        Reconnect => "reconnect",
        FactoryReset => "factory-reset",
        Ota => "ota",
    }
);

impl ControlName {
    /// Controls a channel may expose.
    pub const CHANNEL: &'static [Self] = &[Self::Configure];

    /// Whether a channel may expose this control.
    #[must_use]
    pub fn is_channel_control(self) -> bool {
        Self::CHANNEL.contains(&self)
    }
}

/// Payload of a control message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ControlValue {
    /// Decoded JSON, used by `configure`.
    Json(Value),
    /// Raw text, used by every other control.
    Text(String),
}

impl ControlValue {
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Json(v) => v.clone(),
            Self::Text(v) => Value::String(v.clone()),
        }
    }
}

const SCHEMA_ONLY_FOR_CONFIGURE: &str = "schema is only available on the configure control";

/// A device or channel control message.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlMessage {
    header: MessageHeader,
    control: ControlName,
    value: Option<ControlValue>,
    schema: Option<Vec<SchemaField>>,
}

impl ControlMessage {
    /// Build a control message.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgumentError`] when the header targets a channel and
    /// `control` is not a channel control.
    pub fn new(header: MessageHeader, control: ControlName) -> Result<Self, InvalidArgumentError> {
        if header.channel.is_some() && !control.is_channel_control() {
            return Err(InvalidArgumentError::new("channel control", control.as_str()));
        }
        Ok(Self {
            header,
            control,
            value: None,
            schema: None,
        })
    }

    #[must_use]
    pub fn header(&self) -> &MessageHeader {
        &self.header
    }

    #[must_use]
    pub fn control(&self) -> ControlName {
        self.control
    }

    #[must_use]
    pub fn is_configuration(&self) -> bool {
        self.control == ControlName::Configure
    }

    #[must_use]
    pub fn value(&self) -> Option<&ControlValue> {
        self.value.as_ref()
    }

    /// Set the control value from a raw payload.
    ///
    /// `configure` payloads are always decoded as JSON, the not-set sentinel
    /// included. For every other control the sentinel clears the value and
    /// anything else is kept as raw text.
    ///
    /// # Errors
    ///
    /// Returns [`ParseMessageError::Json`] for a `configure` payload that is
    /// not valid JSON.
    pub fn set_value(&mut self, raw: &str) -> Result<(), ParseMessageError> {
        if self.is_configuration() {
            let value = serde_json::from_str(raw).map_err(|_| ParseMessageError::Json)?;
            self.value = Some(ControlValue::Json(value));
        } else if is_unset(raw) {
            self.value = None;
        } else {
            self.value = Some(ControlValue::Text(raw.to_string()));
        }
        Ok(())
    }

    /// The decoded configuration schema.
    ///
    /// # Errors
    ///
    /// Returns [`FbMqttError::InvalidState`] for any control other than
    /// `configure`.
    pub fn schema(&self) -> Result<Option<&[SchemaField]>, FbMqttError> {
        if !self.is_configuration() {
            return Err(FbMqttError::InvalidState(SCHEMA_ONLY_FOR_CONFIGURE));
        }
        Ok(self.schema.as_deref())
    }

    /// Decode and store a configuration schema.
    ///
    /// # Errors
    ///
    /// - [`FbMqttError::InvalidState`] for any control other than `configure`.
    /// - [`FbMqttError::ParseMessage`] when the payload is not a JSON array.
    pub fn set_schema(&mut self, raw: &str) -> Result<(), FbMqttError> {
        if !self.is_configuration() {
            return Err(FbMqttError::InvalidState(SCHEMA_ONLY_FOR_CONFIGURE));
        }
        self.schema = Some(decode_schema(raw)?);
        Ok(())
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut map = self.header.to_map();
        map.insert("control".into(), Value::String(self.control.to_string()));
        if let Some(value) = &self.value {
            map.insert("value".into(), value.to_value());
        }
        if let Some(schema) = &self.schema {
            map.insert(
                "schema".into(),
                serde_json::to_value(schema).unwrap_or(Value::Null),
            );
        }
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::id::ClientId;

    fn header() -> MessageHeader {
        MessageHeader::new(ClientId::new(), "sensor")
    }

    #[test]
    fn should_reject_unknown_control_name() {
        let err = ControlName::from_str("explode").unwrap_err();
        assert_eq!(err.kind, "control");
    }

    #[test]
    fn should_decode_configure_value_as_json() {
        let mut message = ControlMessage::new(header(), ControlName::Configure).unwrap();
        message.set_value(r#"{"interval":5}"#).unwrap();
        assert_eq!(
            message.value(),
            Some(&ControlValue::Json(serde_json::json!({"interval": 5})))
        );
    }

    #[test]
    fn should_reject_malformed_configure_value() {
        let mut message = ControlMessage::new(header(), ControlName::Configure).unwrap();
        assert_eq!(message.set_value("{oops"), Err(ParseMessageError::Json));
    }

    #[test]
    fn should_keep_raw_text_for_other_controls() {
        let mut message = ControlMessage::new(header(), ControlName::Reboot).unwrap();
        message.set_value("now").unwrap();
        assert_eq!(message.value(), Some(&ControlValue::Text("now".into())));
    }

    #[test]
    fn should_clear_value_on_sentinel() {
        let mut message = ControlMessage::new(header(), ControlName::Reboot).unwrap();
        message.set_value("N/A").unwrap();
        assert!(message.value().is_none());
    }

    #[test]
    fn should_reject_sentinel_as_configure_value() {
        let mut message = ControlMessage::new(header(), ControlName::Configure).unwrap();
        assert_eq!(message.set_value("N/A"), Err(ParseMessageError::Json));
        assert!(message.value().is_none());
    }

    #[test]
    fn should_refuse_schema_access_on_non_configure_control() {
        let mut message = ControlMessage::new(header(), ControlName::Reset).unwrap();
        assert!(matches!(message.schema(), Err(FbMqttError::InvalidState(_))));
        assert!(matches!(
            message.set_schema("[]"),
            Err(FbMqttError::InvalidState(_))
        ));
    }

    #[test]
    fn should_store_schema_on_configure_control() {
        let mut message = ControlMessage::new(header(), ControlName::Configure).unwrap();
        message
            .set_schema(r#"[{"type":"text","identifier":"ssid","name":"SSID"}]"#)
            .unwrap();
        assert_eq!(message.schema().unwrap().map(<[_]>::len), Some(1));
    }

    #[test]
    fn should_restrict_channel_controls_to_configure() {
        let channel_header = header().with_channel("relay");
        assert!(ControlMessage::new(channel_header.clone(), ControlName::Configure).is_ok());
        let err = ControlMessage::new(channel_header, ControlName::Reboot).unwrap_err();
        assert_eq!(err.kind, "channel control");
    }
}
