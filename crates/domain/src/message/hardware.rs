use serde_json::Value;

use super::MessageHeader;
use crate::error::ParseMessageError;
use crate::payload::normalize_mac_address;
use crate::token::closed_set;

closed_set!(
    /// Hardware information a device reports under `$hw`.
    HardwareParameter, "hardware parameter" {
        MacAddress => "mac-address",
        Manufacturer => "manufacturer",
        Model => "model",
        Version => "version",
        SerialNumber => "serial-number",
    }
);

/// A device hardware information message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardwareMessage {
    header: MessageHeader,
    parameter: HardwareParameter,
    value: String,
}

impl HardwareMessage {
    /// Build a hardware message, normalising MAC addresses.
    ///
    /// # Errors
    ///
    /// Returns [`ParseMessageError::MacAddress`] for a malformed MAC address.
    pub fn new(
        header: MessageHeader,
        parameter: HardwareParameter,
        value: &str,
    ) -> Result<Self, ParseMessageError> {
        let value = match parameter {
            HardwareParameter::MacAddress => normalize_mac_address(value)?,
            _ => value.to_string(),
        };
        Ok(Self {
            header,
            parameter,
            value,
        })
    }

    #[must_use]
    pub fn header(&self) -> &MessageHeader {
        &self.header
    }

    #[must_use]
    pub fn parameter(&self) -> HardwareParameter {
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
            self.parameter.as_str().into(),
            Value::String(self.value.clone()),
        );
        Value::Object(map)
    }
}
