//! Property value formats, carried by the `$format` attribute.
//!
//! A format payload is interpreted by shape:
//!
//! | Payload | Result |
//! |---------|--------|
//! | contains `:` | numeric range, `min:max`, either side optional |
//! | contains `,` | enum list, lower-cased, trimmed, deduplicated |
//! | empty or `N/A` | no format |
//! | `rgb`, `hsv` | payload format |
//! | anything else | parse error |

use serde::{Deserialize, Serialize};

use crate::error::ParseMessageError;
use crate::protocol::is_unset;
use crate::token::closed_set;

closed_set!(
    /// Structured payload encodings a property may declare.
    PayloadFormat, "payload format" {
        Rgb => "rgb",
        Hsv => "hsv",
    }
);

/// A parsed `$format` attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyFormat {
    /// Numeric range. Both ends are inclusive and optional.
    Range { min: Option<f64>, max: Option<f64> },
    /// Allowed enum tokens, in order of first occurrence.
    Enum { values: Vec<String> },
    /// Structured payload encoding.
    Payload { format: PayloadFormat },
}

impl PropertyFormat {
    /// Parse a raw `$format` payload.
    ///
    /// Returns `Ok(None)` when the payload is empty or the not-set sentinel.
    ///
    /// # Errors
    ///
    /// Returns [`ParseMessageError::Format`] for non-numeric range bounds or
    /// unknown payload tokens, and [`ParseMessageError::InvertedRange`] when
    /// `min > max`.
    pub fn parse(raw: &str) -> Result<Option<Self>, ParseMessageError> {
        if raw.contains(':') {
            return parse_range(raw).map(Some);
        }

        if raw.contains(',') {
            return Ok(Some(Self::Enum {
                values: parse_enum(raw),
            }));
        }

        if is_unset(raw) {
            return Ok(None);
        }

        raw.parse::<PayloadFormat>()
            .map(|format| Some(Self::Payload { format }))
            .map_err(|_| ParseMessageError::Format(raw.to_string()))
    }

    /// Whether a numeric value lies within this range. Non-range formats
    /// accept everything.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        match self {
            Self::Range { min, max } => {
                min.is_none_or(|min| value >= min) && max.is_none_or(|max| value <= max)
            }
            Self::Enum { .. } | Self::Payload { .. } => true,
        }
    }

    /// Enum tokens, if this is an enum format.
    #[must_use]
    pub fn enum_values(&self) -> Option<&[String]> {
        match self {
            Self::Enum { values } => Some(values),
            _ => None,
        }
    }

    /// Render the format as a JSON value.
    #[must_use]
    pub fn to_value(&self) -> serde_json::Value {
        match self {
            Self::Range { min, max } => serde_json::json!([min, max]),
            Self::Enum { values } => serde_json::json!(values),
            Self::Payload { format } => serde_json::json!(format.as_str()),
        }
    }
}

fn parse_range(raw: &str) -> Result<PropertyFormat, ParseMessageError> {
    let mut parts = raw.split(':');
    let min = parse_bound(raw, parts.next())?;
    let max = parse_bound(raw, parts.next())?;

    if let (Some(min), Some(max)) = (min, max)
        && min > max
    {
        return Err(ParseMessageError::InvertedRange(raw.to_string()));
    }

    Ok(PropertyFormat::Range { min, max })
}

fn parse_bound(raw: &str, part: Option<&str>) -> Result<Option<f64>, ParseMessageError> {
    match part {
        None | Some("") => Ok(None),
        Some(part) => part
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(Some)
            .ok_or_else(|| ParseMessageError::Format(raw.to_string())),
    }
}

fn parse_enum(raw: &str) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    for item in raw.to_lowercase().split(',') {
        let item = item.trim();
        if !item.is_empty() && !values.iter().any(|v| v == item) {
            values.push(item.to_string());
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_closed_range() {
        let format = PropertyFormat::parse("10:20").unwrap();
        assert_eq!(
            format,
            Some(PropertyFormat::Range {
                min: Some(10.0),
                max: Some(20.0)
            })
        );
    }

    #[test]
    fn should_accept_whitespace_around_range_bounds() {
        assert_eq!(
            PropertyFormat::parse(" 10: 20").unwrap(),
            Some(PropertyFormat::Range {
                min: Some(10.0),
                max: Some(20.0)
            })
        );
        assert!(PropertyFormat::parse(" :20").is_err());
    }

    #[test]
    fn should_reject_inverted_range() {
        let result = PropertyFormat::parse("20:10");
        assert!(matches!(result, Err(ParseMessageError::InvertedRange(_))));
    }

    #[test]
    fn should_parse_open_range_with_both_bounds_missing() {
        let format = PropertyFormat::parse(":").unwrap();
        assert_eq!(
            format,
            Some(PropertyFormat::Range {
                min: None,
                max: None
            })
        );
    }

    #[test]
    fn should_parse_half_open_range() {
        let format = PropertyFormat::parse(":5.5").unwrap();
        assert_eq!(
            format,
            Some(PropertyFormat::Range {
                min: None,
                max: Some(5.5)
            })
        );
    }

    #[test]
    fn should_reject_non_numeric_range_bound() {
        assert!(matches!(
            PropertyFormat::parse("low:20"),
            Err(ParseMessageError::Format(_))
        ));
        assert!(matches!(
            PropertyFormat::parse("0:inf"),
            Err(ParseMessageError::Format(_))
        ));
    }

    #[test]
    fn should_lowercase_and_deduplicate_enum_keeping_first_occurrence() {
        let format = PropertyFormat::parse("a,b,B,a").unwrap();
        assert_eq!(
            format,
            Some(PropertyFormat::Enum {
                values: vec!["a".to_string(), "b".to_string()]
            })
        );
    }

    #[test]
    fn should_trim_and_drop_empty_enum_items() {
        let format = PropertyFormat::parse(" on , off ,,").unwrap().unwrap();
        assert_eq!(format.enum_values().unwrap(), ["on", "off"]);
    }

    #[test]
    fn should_return_none_for_sentinel_and_empty() {
        assert_eq!(PropertyFormat::parse("N/A").unwrap(), None);
        assert_eq!(PropertyFormat::parse("").unwrap(), None);
    }

    #[test]
    fn should_accept_whitelisted_payload_formats() {
        assert_eq!(
            PropertyFormat::parse("rgb").unwrap(),
            Some(PropertyFormat::Payload {
                format: PayloadFormat::Rgb
            })
        );
    }

    #[test]
    fn should_reject_unknown_payload_format() {
        assert!(matches!(
            PropertyFormat::parse("cmyk"),
            Err(ParseMessageError::Format(_))
        ));
    }

    #[test]
    fn should_check_range_membership() {
        let format = PropertyFormat::parse("0:100").unwrap().unwrap();
        assert!(format.contains(0.0));
        assert!(format.contains(100.0));
        assert!(!format.contains(100.5));
    }

    #[test]
    fn should_render_range_as_pair() {
        let format = PropertyFormat::parse(":20").unwrap().unwrap();
        assert_eq!(format.to_value(), serde_json::json!([null, 20.0]));
    }
}
