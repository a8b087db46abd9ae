//! Wire-level protocol constants and versions.

use std::str::FromStr;

use crate::error::InvalidArgumentError;
use crate::token::closed_set;

/// Payload meaning "no value provided". Distinct from the empty string.
pub const VALUE_NOT_SET: &str = "N/A";

/// Boolean `true` literal used by `settable` / `queryable` payloads.
pub const PAYLOAD_BOOL_TRUE: &str = "true";

/// Boolean `false` literal used by `settable` / `queryable` payloads.
pub const PAYLOAD_BOOL_FALSE: &str = "false";

closed_set!(
    /// FB MQTT protocol version, selected once per connector.
    ProtocolVersion, "protocol version" {
        V1 => "v1",
        V2 => "v2",
    }
);

impl ProtocolVersion {
    /// Topic prefix every message of this version starts with.
    #[must_use]
    pub fn topic_prefix(self) -> &'static str {
        match self {
            Self::V1 => "/fb/v1",
            Self::V2 => "/fb/v2",
        }
    }

    /// Parse a version token, accepting surrounding whitespace and any case.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgumentError`] for unknown versions.
    pub fn parse_lenient(value: &str) -> Result<Self, InvalidArgumentError> {
        Self::from_str(&value.trim().to_ascii_lowercase())
    }
}

/// Whether a raw payload is the "not-set" sentinel or empty.
#[must_use]
pub fn is_unset(value: &str) -> bool {
    value.is_empty() || value == VALUE_NOT_SET
}
