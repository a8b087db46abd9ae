//! Stored devices and the information they report about themselves.

use serde::{Deserialize, Serialize};

use crate::error::{FbMqttError, InvalidArgumentError};
use crate::id::{DeviceId, is_valid_identifier};
use crate::message::{ControlName, ControlValue, ExtensionParameter, ExtensionType, HardwareParameter};
use crate::schema::SchemaField;
use crate::token::closed_set;

closed_set!(
    /// Connection state a device reports through `$state`.
    ConnectionState, "connection state" {
        Connected => "connected",
        Disconnected => "disconnected",
        Init => "init",
        Ready => "ready",
        Running => "running",
        Sleeping => "sleeping",
        Stopped => "stopped",
        Lost => "lost",
        Alert => "alert",
        Unknown => "unknown",
    }
);

/// Hardware information reported under `$hw`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareInfo {
    pub mac_address: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub version: Option<String>,
    pub serial_number: Option<String>,
}

impl HardwareInfo {
    pub fn set(&mut self, parameter: HardwareParameter, value: impl Into<String>) {
        let slot = match parameter {
            HardwareParameter::MacAddress => &mut self.mac_address,
            HardwareParameter::Manufacturer => &mut self.manufacturer,
            HardwareParameter::Model => &mut self.model,
            HardwareParameter::Version => &mut self.version,
            HardwareParameter::SerialNumber => &mut self.serial_number,
        };
        *slot = Some(value.into());
    }

    #[must_use]
    pub fn get(&self, parameter: HardwareParameter) -> Option<&str> {
        match parameter {
            HardwareParameter::MacAddress => self.mac_address.as_deref(),
            HardwareParameter::Manufacturer => self.manufacturer.as_deref(),
            HardwareParameter::Model => self.model.as_deref(),
            HardwareParameter::Version => self.version.as_deref(),
            HardwareParameter::SerialNumber => self.serial_number.as_deref(),
        }
    }
}

/// One value reported by a firmware extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceExtension {
    pub extension: ExtensionType,
    pub parameter: ExtensionParameter,
    pub value: String,
}

/// A control exposed by a device or channel, with its last known value
/// and configuration schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlRecord {
    pub name: ControlName,
    pub value: Option<ControlValue>,
    pub schema: Option<Vec<SchemaField>>,
}

impl ControlRecord {
    #[must_use]
    pub fn new(name: ControlName) -> Self {
        Self {
            name,
            value: None,
            schema: None,
        }
    }
}

/// Insert-or-get the record for `name`.
pub(crate) fn upsert_control(controls: &mut Vec<ControlRecord>, name: ControlName) -> &mut ControlRecord {
    let index = match controls.iter().position(|c| c.name == name) {
        Some(index) => index,
        None => {
            controls.push(ControlRecord::new(name));
            controls.len() - 1
        }
    };
    &mut controls[index]
}

/// Keep only the records listed in `names`, creating empty ones for the
/// missing names.
pub(crate) fn sync_controls(controls: &mut Vec<ControlRecord>, names: &[ControlName]) {
    controls.retain(|c| names.contains(&c.name));
    for name in names {
        upsert_control(controls, *name);
    }
}

/// A stored device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub identifier: String,
    pub name: Option<String>,
    pub parent: Option<DeviceId>,
    pub state: ConnectionState,
    pub hardware: HardwareInfo,
    pub extensions: Vec<DeviceExtension>,
    pub controls: Vec<ControlRecord>,
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`FbMqttError::InvalidArgument`] when `identifier` is not a
    /// valid identifier.
    pub fn validate(&self) -> Result<(), FbMqttError> {
        if !is_valid_identifier(&self.identifier) {
            return Err(InvalidArgumentError::new("device identifier", self.identifier.clone()).into());
        }
        Ok(())
    }

    /// Set or replace the value an extension reported for `parameter`.
    pub fn set_extension(
        &mut self,
        extension: ExtensionType,
        parameter: ExtensionParameter,
        value: impl Into<String>,
    ) {
        let value = value.into();
        match self
            .extensions
            .iter_mut()
            .find(|e| e.extension == extension && e.parameter == parameter)
        {
            Some(existing) => existing.value = value,
            None => self.extensions.push(DeviceExtension {
                extension,
                parameter,
                value,
            }),
        }
    }

    #[must_use]
    pub fn extension(&self, extension: ExtensionType, parameter: ExtensionParameter) -> Option<&str> {
        self.extensions
            .iter()
            .find(|e| e.extension == extension && e.parameter == parameter)
            .map(|e| e.value.as_str())
    }

    /// Drop extension values whose type is not listed.
    pub fn retain_extensions(&mut self, extensions: &[ExtensionType]) {
        self.extensions.retain(|e| extensions.contains(&e.extension));
    }

    pub fn control_mut(&mut self, name: ControlName) -> &mut ControlRecord {
        upsert_control(&mut self.controls, name)
    }

    #[must_use]
    pub fn control(&self, name: ControlName) -> Option<&ControlRecord> {
        self.controls.iter().find(|c| c.name == name)
    }

    /// Replace the control list, keeping existing records for listed names.
    pub fn sync_controls(&mut self, names: &[ControlName]) {
        sync_controls(&mut self.controls, names);
    }
}

/// Step-by-step builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    id: Option<DeviceId>,
    identifier: Option<String>,
    name: Option<String>,
    parent: Option<DeviceId>,
    state: Option<ConnectionState>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn id(mut self, id: DeviceId) -> Self {
        self.id = Some(id);
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

    #[must_use]
    pub fn parent(mut self, parent: DeviceId) -> Self {
        self.parent = Some(parent);
        self
    }

    #[must_use]
    pub fn state(mut self, state: ConnectionState) -> Self {
        self.state = Some(state);
        self
    }

    /// Consume the builder, validate, and return a [`Device`].
    ///
    /// # Errors
    ///
    /// Returns [`FbMqttError::InvalidArgument`] if the identifier is missing
    /// or malformed.
    pub fn build(self) -> Result<Device, FbMqttError> {
        let device = Device {
            id: self.id.unwrap_or_default(),
            identifier: self.identifier.unwrap_or_default(),
            name: self.name,
            parent: self.parent,
            state: self.state.unwrap_or(ConnectionState::Unknown),
            hardware: HardwareInfo::default(),
            extensions: Vec::new(),
            controls: Vec::new(),
        };
        device.validate()?;
        Ok(device)
    }
}
