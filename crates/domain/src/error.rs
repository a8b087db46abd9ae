//! Common error types used across the workspace.
//!
//! Every layer returns [`FbMqttError`]. Structured causes live in the typed
//! sub-errors so callers can match on them without string inspection.

/// Top-level error for the FB MQTT bridge.
#[derive(Debug, thiserror::Error)]
pub enum FbMqttError {
    /// The topic does not match any known grammar.
    #[error("malformed topic")]
    MalformedTopic(#[from] MalformedTopicError),

    /// The payload is not valid for the matched message kind.
    #[error("failed to parse message payload")]
    ParseMessage(#[from] ParseMessageError),

    /// A value outside a closed set was used to build an entity.
    #[error("invalid argument")]
    InvalidArgument(#[from] InvalidArgumentError),

    /// The operation is not allowed in the entity's current state.
    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    /// An optional downstream store is not available in this deployment.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    /// A looked-up record does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// A store failed.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl FbMqttError {
    /// Whether this error was raised while decoding a wire event.
    ///
    /// Decode-time errors are dropped at the transport boundary.
    #[must_use]
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedTopic(_) | Self::ParseMessage(_) | Self::InvalidArgument(_)
        )
    }
}

/// Why a topic was rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MalformedTopicError {
    /// The topic does not start with the protocol prefix.
    #[error("topic `{topic}` does not start with `{prefix}`")]
    Prefix { topic: String, prefix: &'static str },

    /// The segment layout matches no grammar rule.
    #[error("unexpected topic layout `{0}`")]
    Layout(String),

    /// A device, channel, or property identifier is not valid.
    #[error("invalid identifier `{0}`")]
    Identifier(String),
}

/// Why a payload was rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseMessageError {
    /// Unknown data type token.
    #[error("unknown data type `{0}`")]
    DataType(String),

    /// The format payload matches none of the supported shapes.
    #[error("invalid format `{0}`")]
    Format(String),

    /// A range format has `min` greater than `max`.
    #[error("range format `{0}` has min greater than max")]
    InvertedRange(String),

    /// The payload should have been JSON.
    #[error("payload is not valid JSON")]
    Json,

    /// The schema payload is valid JSON but not an array.
    #[error("schema payload must be a JSON array")]
    SchemaShape,

    /// Unknown connection state token.
    #[error("unknown connection state `{0}`")]
    ConnectionState(String),

    /// Malformed MAC address.
    #[error("invalid MAC address `{0}`")]
    MacAddress(String),

    /// A list entry is not a valid identifier or token.
    #[error("invalid list item `{0}`")]
    ListItem(String),

    /// The payload is not valid UTF-8.
    #[error("payload is not valid UTF-8")]
    Utf8,
}

/// A value outside a closed set.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("`{value}` is not an allowed {kind}")]
pub struct InvalidArgumentError {
    /// The closed set that was violated (e.g. `"property attribute"`).
    pub kind: &'static str,
    /// The rejected value.
    pub value: String,
}

impl InvalidArgumentError {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// A record that could not be found.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("{entity} `{identifier}` is not registered")]
pub struct NotFoundError {
    /// Kind of record (`"Device"`, `"Channel"`, `"Property"`).
    pub entity: &'static str,
    /// Identifier or id that was looked up.
    pub identifier: String,
}
