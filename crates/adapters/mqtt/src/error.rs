//! MQTT adapter error types.

use fbmqtt_domain::error::FbMqttError;
use fbmqtt_domain::protocol::ProtocolVersion;

/// Errors specific to the MQTT adapter.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// No decoder is registered for the configured protocol version.
    #[error("no decoder registered for protocol {0}")]
    UnsupportedVersion(ProtocolVersion),

    /// The session is not running.
    #[error("MQTT client not connected")]
    NotConnected,

    /// The rumqttc client returned an error.
    #[error("MQTT client error")]
    Client(#[source] rumqttc::ClientError),

    /// A domain-level error (decoding, invalid state, etc.).
    #[error("domain error")]
    Domain(#[source] FbMqttError),
}

impl MqttError {
    /// Convert into a domain error. Transport failures become
    /// [`FbMqttError::Storage`].
    #[must_use]
    pub fn into_domain(self) -> FbMqttError {
        match self {
            Self::Domain(err) => err,
            other => FbMqttError::Storage(Box::new(other)),
        }
    }
}

impl From<MqttError> for FbMqttError {
    fn from(err: MqttError) -> Self {
        err.into_domain()
    }
}

impl From<rumqttc::ClientError> for MqttError {
    fn from(err: rumqttc::ClientError) -> Self {
        Self::Client(err)
    }
}
