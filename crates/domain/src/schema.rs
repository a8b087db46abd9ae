//! Configuration schema carried by the `configure` control.
//!
//! The payload is a JSON array of field descriptors. Entries without a
//! `type`, `identifier` or `name`, or with an unsupported `type`, are skipped.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::data_type::DataType;
use crate::error::ParseMessageError;

/// One configurable field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaField {
    pub identifier: String,
    pub name: String,
    pub title: Option<String>,
    pub comment: Option<String>,
    #[serde(flatten)]
    pub kind: SchemaFieldKind,
}

impl SchemaField {
    /// The data type a value of this field is stored with.
    #[must_use]
    pub fn data_type(&self) -> DataType {
        self.kind.data_type()
    }
}

/// Type-specific part of a [`SchemaField`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SchemaFieldKind {
    Number {
        min: Option<f64>,
        max: Option<f64>,
        step: Option<f64>,
        default: Option<f64>,
    },
    Text {
        default: Option<String>,
    },
    Boolean {
        default: Option<bool>,
    },
    Select {
        values: Vec<SelectOption>,
        default: Option<String>,
    },
}

impl SchemaFieldKind {
    #[must_use]
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Number { .. } => DataType::Float,
            Self::Text { .. } => DataType::String,
            Self::Boolean { .. } => DataType::Bool,
            Self::Select { .. } => DataType::Enum,
        }
    }
}

/// One choice of a `select` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub name: String,
}

/// Decode a raw schema payload.
///
/// # Errors
///
/// Returns [`ParseMessageError::Json`] if the payload is not JSON and
/// [`ParseMessageError::SchemaShape`] if it is JSON but not an array.
pub fn decode_schema(raw: &str) -> Result<Vec<SchemaField>, ParseMessageError> {
    let value: Value = serde_json::from_str(raw).map_err(|_| ParseMessageError::Json)?;
    let Value::Array(rows) = value else {
        return Err(ParseMessageError::SchemaShape);
    };

    Ok(rows
        .iter()
        .filter_map(Value::as_object)
        .filter_map(decode_field)
        .collect())
}

fn decode_field(row: &Map<String, Value>) -> Option<SchemaField> {
    let kind = field(row, "type").and_then(Value::as_str)?;
    let identifier = field(row, "identifier").and_then(as_string)?;
    let name = field(row, "name").and_then(as_string)?;

    let kind = match kind {
        "number" => SchemaFieldKind::Number {
            min: field(row, "min").and_then(as_f64),
            max: field(row, "max").and_then(as_f64),
            step: field(row, "step").and_then(as_f64),
            default: field(row, "default").and_then(as_f64),
        },
        "text" => SchemaFieldKind::Text {
            default: field(row, "default").and_then(as_string),
        },
        "boolean" => SchemaFieldKind::Boolean {
            default: field(row, "default").and_then(as_bool),
        },
        "select" => SchemaFieldKind::Select {
            values: field(row, "values")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .map(decode_options)
                .unwrap_or_default(),
            default: field(row, "default").and_then(as_string),
        },
        _ => return None,
    };

    Some(SchemaField {
        identifier,
        name,
        title: field(row, "title").and_then(as_string).filter(|s| !s.is_empty()),
        comment: field(row, "comment")
            .and_then(as_string)
            .filter(|s| !s.is_empty()),
        kind,
    })
}

fn decode_options(values: &[Value]) -> Vec<SelectOption> {
    values
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|option| {
            Some(SelectOption {
                value: field(option, "value").and_then(as_string)?,
                name: field(option, "name").and_then(as_string)?,
            })
        })
        .collect()
}

/// Look up a key, treating JSON `null` as absent.
fn field<'a>(row: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    row.get(key).filter(|value| !value.is_null())
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => Some(n.as_f64().is_some_and(|v| v != 0.0)),
        Value::String(s) => Some(!s.is_empty() && s != "0" && s != "false"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_reject_malformed_json() {
        assert_eq!(decode_schema("[{"), Err(ParseMessageError::Json));
    }

    #[test]
    fn should_reject_non_array_json() {
        assert_eq!(
            decode_schema(r#"{"type":"text"}"#),
            Err(ParseMessageError::SchemaShape)
        );
    }

    #[test]
    fn should_skip_entries_missing_required_keys() {
        let schema = decode_schema(
            r#"[
                {"type":"text","identifier":"ssid"},
                {"type":"text","name":"SSID"},
                {"identifier":"ssid","name":"SSID"},
                {"type":"text","identifier":"ssid","name":null},
                "garbage",
                {"type":"text","identifier":"ssid","name":"SSID"}
            ]"#,
        )
        .unwrap();
        assert_eq!(schema.len(), 1);
        assert_eq!(schema[0].identifier, "ssid");
    }

    #[test]
    fn should_coerce_number_fields_to_float() {
        let schema = decode_schema(
            r#"[{"type":"number","identifier":"interval","name":"Interval","min":"1","max":60,"default":true}]"#,
        )
        .unwrap();
        assert_eq!(
            schema[0].kind,
            SchemaFieldKind::Number {
                min: Some(1.0),
                max: Some(60.0),
                step: None,
                default: Some(1.0),
            }
        );
        assert_eq!(schema[0].data_type(), DataType::Float);
    }

    #[test]
    fn should_keep_title_and_comment_only_when_non_empty() {
        let schema = decode_schema(
            r#"[{"type":"boolean","identifier":"led","name":"Led","title":"","comment":"Status led","default":0}]"#,
        )
        .unwrap();
        assert!(schema[0].title.is_none());
        assert_eq!(schema[0].comment.as_deref(), Some("Status led"));
        assert_eq!(schema[0].kind, SchemaFieldKind::Boolean { default: Some(false) });
    }

    #[test]
    fn should_decode_select_options_dropping_incomplete_ones() {
        let schema = decode_schema(
            r#"[{"type":"select","identifier":"mode","name":"Mode","default":"eco","values":[
                {"value":"eco","name":"Eco"},
                {"value":"boost"},
                {"value":1,"name":"One"}
            ]}]"#,
        )
        .unwrap();
        let SchemaFieldKind::Select { values, default } = &schema[0].kind else {
            panic!("expected select field");
        };
        assert_eq!(values.len(), 2);
        assert_eq!(values[1].value, "1");
        assert_eq!(default.as_deref(), Some("eco"));
        assert_eq!(schema[0].data_type(), DataType::Enum);
    }

    #[test]
    fn should_default_select_values_to_empty_when_malformed() {
        let schema = decode_schema(
            r#"[{"type":"select","identifier":"mode","name":"Mode","values":"eco,boost"}]"#,
        )
        .unwrap();
        assert_eq!(
            schema[0].kind,
            SchemaFieldKind::Select {
                values: Vec::new(),
                default: None
            }
        );
    }

    #[test]
    fn should_drop_unknown_field_types() {
        let schema =
            decode_schema(r#"[{"type":"color","identifier":"tint","name":"Tint"}]"#).unwrap();
        assert!(schema.is_empty());
    }

    #[test]
    fn should_render_text_default_from_number() {
        let schema =
            decode_schema(r#"[{"type":"text","identifier":"port","name":"Port","default":1883}]"#)
                .unwrap();
        assert_eq!(
            schema[0].kind,
            SchemaFieldKind::Text {
                default: Some("1883".to_string())
            }
        );
        assert_eq!(schema[0].data_type(), DataType::String);
    }
}
