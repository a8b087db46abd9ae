//! Stored channels. A channel groups properties under a device.

use serde::{Deserialize, Serialize};

use crate::device::{ControlRecord, sync_controls, upsert_control};
use crate::error::{FbMqttError, InvalidArgumentError};
use crate::id::{ChannelId, DeviceId, is_valid_identifier};
use crate::message::ControlName;

/// A stored channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: ChannelId,
    pub device_id: DeviceId,
    pub identifier: String,
    pub name: Option<String>,
    pub controls: Vec<ControlRecord>,
}

impl Channel {
    /// Create a builder for constructing a [`Channel`].
    #[must_use]
    pub fn builder() -> ChannelBuilder {
        ChannelBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`FbMqttError::InvalidArgument`] when `identifier` is not a
    /// valid identifier.
    pub fn validate(&self) -> Result<(), FbMqttError> {
        if !is_valid_identifier(&self.identifier) {
            return Err(InvalidArgumentError::new("channel identifier", self.identifier.clone()).into());
        }
        Ok(())
    }

    pub fn control_mut(&mut self, name: ControlName) -> &mut ControlRecord {
        upsert_control(&mut self.controls, name)
    }

    #[must_use]
    pub fn control(&self, name: ControlName) -> Option<&ControlRecord> {
        self.controls.iter().find(|c| c.name == name)
    }

    pub fn sync_controls(&mut self, names: &[ControlName]) {
        sync_controls(&mut self.controls, names);
    }
}

/// Step-by-step builder for [`Channel`].
#[derive(Debug, Default)]
pub struct ChannelBuilder {
    id: Option<ChannelId>,
    device_id: Option<DeviceId>,
    identifier: Option<String>,
    name: Option<String>,
}

impl ChannelBuilder {
    #[must_use]
    pub fn id(mut self, id: ChannelId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn device_id(mut self, device_id: DeviceId) -> Self {
        self.device_id = Some(device_id);
        self
    }

    #[must_use]
    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Consume the builder, validate, and return a [`Channel`].
    ///
    /// # Errors
    ///
    /// - [`FbMqttError::InvalidState`] if no device was given.
    /// - [`FbMqttError::InvalidArgument`] if the identifier is missing or
    ///   malformed.
    pub fn build(self) -> Result<Channel, FbMqttError> {
        let device_id = self
            .device_id
            .ok_or(FbMqttError::InvalidState("channel must belong to a device"))?;
        let channel = Channel {
            id: self.id.unwrap_or_default(),
            device_id,
            identifier: self.identifier.unwrap_or_default(),
            name: self.name,
            controls: Vec::new(),
        };
        channel.validate()?;
        Ok(channel)
    }
}
