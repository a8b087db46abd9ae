//! Property attributes: the `$name`, `$settable`, `$datatype`, … topics.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data_type::DataType;
use crate::error::{FbMqttError, ParseMessageError};
use crate::format::PropertyFormat;
use crate::payload::{clean_name, optional_text, parse_bool_literal};
use crate::token::closed_set;

closed_set!(
    /// Attributes a property message may carry.
    AttributeName, "property attribute" {
        Name => "name",
        Type => "type",
        Settable => "settable",
        Queryable => "queryable",
        DataType => "datatype",
        Format => "format",
        Unit => "unit",
    }
);

/// A single parsed property attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "attribute", content = "value", rename_all = "snake_case")]
pub enum PropertyAttribute {
    Name(Option<String>),
    Type(Option<String>),
    Settable(bool),
    Queryable(bool),
    #[serde(rename = "datatype")]
    DataType(DataType),
    Format(Option<PropertyFormat>),
    Unit(Option<String>),
}

impl PropertyAttribute {
    /// Parse the raw payload of a named attribute.
    ///
    /// # Errors
    ///
    /// - [`FbMqttError::InvalidArgument`] when `attribute` is not a known
    ///   attribute name.
    /// - [`FbMqttError::ParseMessage`] when the payload violates the
    ///   attribute's grammar (unknown data type, bad format).
    pub fn parse(attribute: &str, raw: &str) -> Result<Self, FbMqttError> {
        let name = AttributeName::from_str(attribute)?;
        Ok(Self::parse_named(name, raw)?)
    }

    /// Parse the raw payload of an already resolved attribute name.
    ///
    /// # Errors
    ///
    /// Returns [`ParseMessageError`] when the payload violates the
    /// attribute's grammar.
    pub fn parse_named(name: AttributeName, raw: &str) -> Result<Self, ParseMessageError> {
        Ok(match name {
            AttributeName::Settable => Self::Settable(parse_bool_literal(raw)),
            AttributeName::Queryable => Self::Queryable(parse_bool_literal(raw)),
            AttributeName::Name => Self::Name(clean_name(raw)),
            AttributeName::DataType => Self::DataType(
                DataType::from_str(raw).map_err(|_| ParseMessageError::DataType(raw.to_string()))?,
            ),
            AttributeName::Format => Self::Format(PropertyFormat::parse(raw)?),
            AttributeName::Type => Self::Type(optional_text(raw)),
            AttributeName::Unit => Self::Unit(optional_text(raw)),
        })
    }

    /// The attribute's name.
    #[must_use]
    pub fn name(&self) -> AttributeName {
        match self {
            Self::Name(_) => AttributeName::Name,
            Self::Type(_) => AttributeName::Type,
            Self::Settable(_) => AttributeName::Settable,
            Self::Queryable(_) => AttributeName::Queryable,
            Self::DataType(_) => AttributeName::DataType,
            Self::Format(_) => AttributeName::Format,
            Self::Unit(_) => AttributeName::Unit,
        }
    }

    /// Render the attribute value as JSON.
    #[must_use]
    pub fn to_value(&self) -> serde_json::Value {
        match self {
            Self::Name(v) | Self::Type(v) | Self::Unit(v) => serde_json::json!(v),
            Self::Settable(v) | Self::Queryable(v) => serde_json::Value::Bool(*v),
            Self::DataType(v) => serde_json::json!(v.as_str()),
            Self::Format(v) => v
                .as_ref()
                .map_or(serde_json::Value::Null, PropertyFormat::to_value),
        }
    }
}

/// Ordered attribute collection with at most one entry per name.
///
/// The first attribute added for a name wins; later duplicates are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyAttributes(Vec<PropertyAttribute>);

impl PropertyAttributes {
    /// Add an attribute unless one with the same name is already present.
    ///
    /// Returns `true` when the attribute was stored.
    pub fn insert(&mut self, attribute: PropertyAttribute) -> bool {
        if self.contains(attribute.name()) {
            return false;
        }
        self.0.push(attribute);
        true
    }

    #[must_use]
    pub fn contains(&self, name: AttributeName) -> bool {
        self.0.iter().any(|a| a.name() == name)
    }

    #[must_use]
    pub fn get(&self, name: AttributeName) -> Option<&PropertyAttribute> {
        self.0.iter().find(|a| a.name() == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PropertyAttribute> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a PropertyAttributes {
    type Item = &'a PropertyAttribute;
    type IntoIter = std::slice::Iter<'a, PropertyAttribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
