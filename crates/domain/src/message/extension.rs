use serde_json::Value;

use super::MessageHeader;
use crate::error::ParseMessageError;
use crate::payload::normalize_mac_address;
use crate::token::closed_set;

closed_set!(
    /// Firmware families a device may run.
    ExtensionType, "extension type" {
        FastyBird => "fastybird",
        Sonoff => "sonoff",
    }
);

closed_set!(
    /// Information an extension reports about itself.
    ExtensionParameter, "extension parameter" {
        MacAddress => "mac-address",
        Manufacturer => "manufacturer",
        Model => "model",
        Version => "version",
        Name => "name",
    }
);

/// An extension (firmware) attribute message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionMessage {
    header: MessageHeader,
    extension: ExtensionType,
    parameter: ExtensionParameter,
    value: String,
}

impl ExtensionMessage {
    /// Build an extension message, normalising MAC addresses.
    ///
    /// # Errors
    ///
    /// Returns [`ParseMessageError::MacAddress`] for a malformed MAC address.
    pub fn new(
        header: MessageHeader,
        extension: ExtensionType,
        parameter: ExtensionParameter,
        value: &str,
    ) -> Result<Self, ParseMessageError> {
        let value = match parameter {
            ExtensionParameter::MacAddress => normalize_mac_address(value)?,
            _ => value.to_string(),
        };
        Ok(Self {
            header,
            extension,
            parameter,
            value,
        })
    }

    #[must_use]
    pub fn header(&self) -> &MessageHeader {
        &self.header
    }

    #[must_use]
    pub fn extension(&self) -> ExtensionType {
        self.extension
    }

    #[must_use]
    pub fn parameter(&self) -> ExtensionParameter {
        self.parameter
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut map = self.header.to_map();
        map.insert(
            "extension".into(),
            Value::String(self.extension.to_string()),
        );
        map.insert(
            self.parameter.as_str().into(),
            Value::String(self.value.clone()),
        );
        Value::Object(map)
    }
}
