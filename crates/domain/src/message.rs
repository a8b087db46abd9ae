//! Decoded protocol messages.
//!
//! Every wire event that survives decoding becomes exactly one [`Message`].
//! The decoder builds it, hands ownership to the ingress queue, and a single
//! consumer applies it to the stores.

mod channel;
mod control;
mod device;
mod extension;
mod hardware;
mod property;

pub use channel::{ChannelAttribute, ChannelAttributeMessage, ChannelAttributeName};
pub use control::{ControlMessage, ControlName, ControlValue};
pub use device::{DeviceAttribute, DeviceAttributeMessage, DeviceAttributeName};
pub use extension::{ExtensionMessage, ExtensionParameter, ExtensionType};
pub use hardware::{HardwareMessage, HardwareParameter};
pub use property::PropertyMessage;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::id::ClientId;

/// Routing information shared by every message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageHeader {
    /// Transport session the message arrived on.
    pub client_id: ClientId,
    /// Target device identifier.
    pub device: String,
    /// Target channel identifier, for channel-scoped messages.
    pub channel: Option<String>,
    /// Parent device identifier, for child devices.
    pub parent: Option<String>,
    /// Whether the broker flagged the event as retained.
    pub retained: bool,
}

impl MessageHeader {
    #[must_use]
    pub fn new(client_id: ClientId, device: impl Into<String>) -> Self {
        Self {
            client_id,
            device: device.into(),
            channel: None,
            parent: None,
            retained: false,
        }
    }

    #[must_use]
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    #[must_use]
    pub fn with_retained(mut self, retained: bool) -> Self {
        self.retained = retained;
        self
    }

    pub(crate) fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("device".into(), Value::String(self.device.clone()));
        map.insert("retained".into(), Value::Bool(self.retained));
        if let Some(parent) = &self.parent {
            map.insert("parent".into(), Value::String(parent.clone()));
        }
        if let Some(channel) = &self.channel {
            map.insert("channel".into(), Value::String(channel.clone()));
        }
        map
    }
}

/// A decoded protocol message.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Device(DeviceAttributeMessage),
    Channel(ChannelAttributeMessage),
    Property(PropertyMessage),
    Control(ControlMessage),
    Hardware(HardwareMessage),
    Extension(ExtensionMessage),
}

impl Message {
    #[must_use]
    pub fn header(&self) -> &MessageHeader {
        match self {
            Self::Device(m) => m.header(),
            Self::Channel(m) => m.header(),
            Self::Property(m) => m.header(),
            Self::Control(m) => m.header(),
            Self::Hardware(m) => m.header(),
            Self::Extension(m) => m.header(),
        }
    }

    /// Short name of the message kind, for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Device(_) => "device",
            Self::Channel(_) => "channel",
            Self::Property(_) => "property",
            Self::Control(_) => "control",
            Self::Hardware(_) => "hardware",
            Self::Extension(_) => "extension",
        }
    }

    /// Render the message as a flat JSON object.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Device(m) => m.to_value(),
            Self::Channel(m) => m.to_value(),
            Self::Property(m) => m.to_value(),
            Self::Control(m) => m.to_value(),
            Self::Hardware(m) => m.to_value(),
            Self::Extension(m) => m.to_value(),
        }
    }
}

macro_rules! impl_from_message {
    ($($variant:ident => $ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for Message {
                fn from(message: $ty) -> Self {
                    Self::$variant(message)
                }
            }
        )+
    };
}

impl_from_message!(
    Device => DeviceAttributeMessage,
    Channel => ChannelAttributeMessage,
    Property => PropertyMessage,
    Control => ControlMessage,
    Hardware => HardwareMessage,
    Extension => ExtensionMessage,
);
