//! Helpers for interpreting raw string payloads.

use crate::error::ParseMessageError;
use crate::id::is_valid_identifier;
use crate::protocol::{PAYLOAD_BOOL_TRUE, is_unset};

/// Sanitise a human-readable name.
///
/// Control characters are dropped, runs of whitespace collapse to a single
/// space, and the result is trimmed. Returns `None` when nothing is left or
/// the payload is the not-set sentinel.
#[must_use]
pub fn clean_name(raw: &str) -> Option<String> {
    if is_unset(raw) {
        return None;
    }

    let cleaned = raw
        .split_whitespace()
        .map(|word| word.chars().filter(|c| !c.is_control()).collect::<String>())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    (!cleaned.is_empty()).then_some(cleaned)
}

/// Pass a free-text payload through, mapping empty / not-set to `None`.
#[must_use]
pub fn optional_text(raw: &str) -> Option<String> {
    (!is_unset(raw)).then(|| raw.to_string())
}

/// Interpret a boolean payload. Only the exact `true` literal is true;
/// anything else is false.
#[must_use]
pub fn parse_bool_literal(raw: &str) -> bool {
    raw == PAYLOAD_BOOL_TRUE
}

/// Split a comma-separated list into lower-cased, trimmed, deduplicated
/// items, keeping first occurrence order. Empty items are skipped.
#[must_use]
pub fn split_list(raw: &str) -> Vec<String> {
    if is_unset(raw) {
        return Vec::new();
    }

    let mut items: Vec<String> = Vec::new();
    for item in raw.split(',') {
        let item = item.trim().to_lowercase();
        if !item.is_empty() && !items.contains(&item) {
            items.push(item);
        }
    }
    items
}

/// Parse a comma-separated list of identifiers.
///
/// # Errors
///
/// Returns [`ParseMessageError::ListItem`] for the first item that is not a
/// valid identifier.
pub fn parse_identifier_list(raw: &str) -> Result<Vec<String>, ParseMessageError> {
    let items = split_list(raw);
    if let Some(bad) = items.iter().find(|item| !is_valid_identifier(item)) {
        return Err(ParseMessageError::ListItem(bad.clone()));
    }
    Ok(items)
}

/// Parse a comma-separated list of closed-set tokens.
///
/// # Errors
///
/// Returns [`ParseMessageError::ListItem`] for the first unknown token.
pub fn parse_token_list<T: std::str::FromStr>(raw: &str) -> Result<Vec<T>, ParseMessageError> {
    split_list(raw)
        .into_iter()
        .map(|item| item.parse().map_err(|_| ParseMessageError::ListItem(item)))
        .collect()
}

/// Normalise a MAC address to 12 lower-case hex digits without separators.
///
/// # Errors
///
/// Returns [`ParseMessageError::MacAddress`] if the result is not exactly
/// 12 hexadecimal digits.
pub fn normalize_mac_address(raw: &str) -> Result<String, ParseMessageError> {
    let mac: String = raw
        .trim()
        .chars()
        .filter(|c| *c != ':' && *c != '-')
        .collect::<String>()
        .to_lowercase();

    if mac.len() != 12 || !mac.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ParseMessageError::MacAddress(raw.to_string()));
    }
    Ok(mac)
}
