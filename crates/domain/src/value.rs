//! Typed property values and the raw payload normaliser.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::data_type::DataType;
use crate::format::PropertyFormat;

/// UTC timestamp carried by `datetime` values.
pub type Timestamp = DateTime<Utc>;

const BOOL_TRUE_TOKENS: &[&str] = &["true", "1", "t", "y", "yes", "on"];
const BOOL_FALSE_TOKENS: &[&str] = &["false", "0", "f", "n", "no", "off"];

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

/// A property value after normalisation against its data type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum StateValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(Timestamp),
}

impl StateValue {
    /// Render as a plain JSON value.
    #[must_use]
    pub fn to_value(&self) -> serde_json::Value {
        match self {
            Self::Bool(v) => serde_json::Value::Bool(*v),
            Self::Int(v) => serde_json::json!(v),
            Self::Float(v) => serde_json::json!(v),
            Self::String(_) | Self::Date(_) | Self::Time(_) | Self::DateTime(_) => {
                serde_json::Value::String(self.to_string())
            }
        }
    }
}

impl fmt::Display for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(v) => f.write_str(v),
            Self::Date(v) => write!(f, "{}", v.format(DATE_FORMAT)),
            Self::Time(v) => write!(f, "{}", v.format(TIME_FORMAT)),
            Self::DateTime(v) => f.write_str(&v.to_rfc3339()),
        }
    }
}

/// Convert a raw payload into a typed value for `data_type`.
///
/// A payload equal to the property's `invalid` marker is kept verbatim as a
/// string. Otherwise the payload must parse as the data type and satisfy the
/// format (range bounds, enum membership). Returns `None` when it does not.
#[must_use]
pub fn normalize(
    data_type: DataType,
    raw: &str,
    format: Option<&PropertyFormat>,
    invalid: Option<&str>,
) -> Option<StateValue> {
    if invalid.is_some_and(|marker| marker == raw) {
        return Some(StateValue::String(raw.to_string()));
    }

    let trimmed = raw.trim();

    match data_type {
        DataType::Char
        | DataType::Uchar
        | DataType::Short
        | DataType::Ushort
        | DataType::Int
        | DataType::Uint => normalize_integer(data_type, trimmed, format),
        DataType::Float => normalize_float(trimmed, format),
        DataType::Bool => normalize_bool(trimmed),
        DataType::Enum | DataType::Switch | DataType::Button => normalize_enum(trimmed, format),
        DataType::Date => NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
            .ok()
            .map(StateValue::Date),
        DataType::Time => NaiveTime::parse_from_str(trimmed, TIME_FORMAT)
            .ok()
            .map(StateValue::Time),
        DataType::DateTime => DateTime::parse_from_rfc3339(trimmed)
            .ok()
            .map(|value| StateValue::DateTime(value.with_timezone(&Utc))),
        DataType::String | DataType::Color | DataType::Unknown => {
            Some(StateValue::String(raw.to_string()))
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn normalize_integer(
    data_type: DataType,
    raw: &str,
    format: Option<&PropertyFormat>,
) -> Option<StateValue> {
    let value = match raw.parse::<i64>() {
        Ok(value) => value,
        Err(_) => {
            let value = raw.parse::<f64>().ok().filter(|v| v.is_finite())?;
            if value.abs() >= i64::MAX as f64 {
                return None;
            }
            value.trunc() as i64
        }
    };

    let (min, max) = data_type.integer_bounds()?;
    if value < min || value > max {
        return None;
    }
    if format.is_some_and(|format| !format.contains(value as f64)) {
        return None;
    }
    Some(StateValue::Int(value))
}

fn normalize_float(raw: &str, format: Option<&PropertyFormat>) -> Option<StateValue> {
    let value = raw.parse::<f64>().ok().filter(|v| v.is_finite())?;
    if format.is_some_and(|format| !format.contains(value)) {
        return None;
    }
    Some(StateValue::Float(value))
}

fn normalize_bool(raw: &str) -> Option<StateValue> {
    let lowered = raw.to_lowercase();
    if BOOL_TRUE_TOKENS.contains(&lowered.as_str()) {
        Some(StateValue::Bool(true))
    } else if BOOL_FALSE_TOKENS.contains(&lowered.as_str()) {
        Some(StateValue::Bool(false))
    } else {
        None
    }
}

fn normalize_enum(raw: &str, format: Option<&PropertyFormat>) -> Option<StateValue> {
    let lowered = raw.to_lowercase();
    if lowered.is_empty() {
        return None;
    }
    match format.and_then(PropertyFormat::enum_values) {
        Some(values) if !values.contains(&lowered) => None,
        _ => Some(StateValue::String(lowered)),
    }
}
