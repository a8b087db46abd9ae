//! Stored property definitions.
//!
//! A property belongs either to a device or to a channel. Static properties
//! keep their value on the definition itself; dynamic properties keep it in
//! a separate [`PropertyState`](crate::property_state::PropertyState).

use serde::{Deserialize, Serialize};

use crate::attribute::PropertyAttribute;
use crate::data_type::DataType;
use crate::error::{FbMqttError, InvalidArgumentError};
use crate::format::PropertyFormat;
use crate::id::{ChannelId, DeviceId, PropertyId, is_valid_identifier};

/// What a property hangs off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum PropertyOwner {
    Device(DeviceId),
    Channel(ChannelId),
}

/// Where the property value lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PropertyKind {
    /// Value stored on the definition.
    Static { value: Option<String> },
    /// Value stored in the property state store.
    Dynamic,
}

impl PropertyKind {
    #[must_use]
    pub fn is_static(&self) -> bool {
        matches!(self, Self::Static { .. })
    }
}

/// A stored property definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    pub owner: PropertyOwner,
    pub identifier: String,
    pub name: Option<String>,
    pub settable: bool,
    pub queryable: bool,
    pub data_type: DataType,
    pub format: Option<PropertyFormat>,
    pub unit: Option<String>,
    /// Payload the device sends when it cannot read the value.
    pub invalid: Option<String>,
    pub kind: PropertyKind,
}

impl Property {
    /// Create a builder for constructing a [`Property`].
    #[must_use]
    pub fn builder() -> PropertyBuilder {
        PropertyBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`FbMqttError::InvalidArgument`] when `identifier` is not a
    /// valid identifier.
    pub fn validate(&self) -> Result<(), FbMqttError> {
        if !is_valid_identifier(&self.identifier) {
            return Err(InvalidArgumentError::new("property identifier", self.identifier.clone()).into());
        }
        Ok(())
    }

    /// Write a reported attribute onto the definition.
    ///
    /// `type` describes the device-side property kind and has no stored
    /// counterpart; it is ignored.
    pub fn apply_attribute(&mut self, attribute: &PropertyAttribute) {
        match attribute {
            PropertyAttribute::Name(name) => self.name.clone_from(name),
            PropertyAttribute::Settable(settable) => self.settable = *settable,
            PropertyAttribute::Queryable(queryable) => self.queryable = *queryable,
            PropertyAttribute::DataType(data_type) => self.data_type = *data_type,
            PropertyAttribute::Format(format) => self.format.clone_from(format),
            PropertyAttribute::Unit(unit) => self.unit.clone_from(unit),
            PropertyAttribute::Type(_) => {}
        }
    }

    /// The stored value of a static property.
    #[must_use]
    pub fn static_value(&self) -> Option<&str> {
        match &self.kind {
            PropertyKind::Static { value } => value.as_deref(),
            PropertyKind::Dynamic => None,
        }
    }
}

/// Step-by-step builder for [`Property`].
#[derive(Debug, Default)]
pub struct PropertyBuilder {
    id: Option<PropertyId>,
    owner: Option<PropertyOwner>,
    identifier: Option<String>,
    name: Option<String>,
    settable: bool,
    queryable: bool,
    data_type: Option<DataType>,
    format: Option<PropertyFormat>,
    unit: Option<String>,
    invalid: Option<String>,
    kind: Option<PropertyKind>,
}

impl PropertyBuilder {
    #[must_use]
    pub fn id(mut self, id: PropertyId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn owner(mut self, owner: PropertyOwner) -> Self {
        self.owner = Some(owner);
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
    pub fn settable(mut self, settable: bool) -> Self {
        self.settable = settable;
        self
    }

    #[must_use]
    pub fn queryable(mut self, queryable: bool) -> Self {
        self.queryable = queryable;
        self
    }

    #[must_use]
    pub fn data_type(mut self, data_type: DataType) -> Self {
        self.data_type = Some(data_type);
        self
    }

    #[must_use]
    pub fn format(mut self, format: PropertyFormat) -> Self {
        self.format = Some(format);
        self
    }

    #[must_use]
    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    #[must_use]
    pub fn invalid(mut self, invalid: impl Into<String>) -> Self {
        self.invalid = Some(invalid.into());
        self
    }

    /// Store the value on the definition, starting from `value`.
    #[must_use]
    pub fn static_value(mut self, value: Option<String>) -> Self {
        self.kind = Some(PropertyKind::Static { value });
        self
    }

    /// Consume the builder, validate, and return a [`Property`].
    ///
    /// Properties are dynamic unless [`static_value`](Self::static_value)
    /// was called, and default to the `unknown` data type.
    ///
    /// # Errors
    ///
    /// - [`FbMqttError::InvalidState`] if no owner was given.
    /// - [`FbMqttError::InvalidArgument`] if the identifier is missing or
    ///   malformed.
    pub fn build(self) -> Result<Property, FbMqttError> {
        let owner = self
            .owner
            .ok_or(FbMqttError::InvalidState("property must have an owner"))?;
        let property = Property {
            id: self.id.unwrap_or_default(),
            owner,
            identifier: self.identifier.unwrap_or_default(),
            name: self.name,
            settable: self.settable,
            queryable: self.queryable,
            data_type: self.data_type.unwrap_or(DataType::Unknown),
            format: self.format,
            unit: self.unit,
            invalid: self.invalid,
            kind: self.kind.unwrap_or(PropertyKind::Dynamic),
        };
        property.validate()?;
        Ok(property)
    }
}
