//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `fbmqtt.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::time::Duration;

use fbmqtt_adapter_mqtt::MqttConfig;
use fbmqtt_domain::data_type::DataType;
use fbmqtt_domain::format::PropertyFormat;
use fbmqtt_domain::id::is_valid_identifier;
use fbmqtt_domain::protocol::ProtocolVersion;
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Broker connection settings.
    pub mqtt: MqttConfig,
    /// Queue drain settings.
    pub connector: ConnectorConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Devices provisioned into the store at startup.
    pub devices: Vec<DeviceSeed>,
}

/// Queue drain configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ConnectorConfig {
    /// Pause between two drains of the ingress queue, in milliseconds.
    pub queue_interval_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// A device known before it first reports.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceSeed {
    pub identifier: String,
    pub name: Option<String>,
    #[serde(default)]
    pub properties: Vec<PropertySeed>,
    #[serde(default)]
    pub channels: Vec<ChannelSeed>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelSeed {
    pub identifier: String,
    pub name: Option<String>,
    #[serde(default)]
    pub properties: Vec<PropertySeed>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PropertySeed {
    pub identifier: String,
    pub name: Option<String>,
    pub data_type: Option<DataType>,
    /// Raw format string, as a device would publish it.
    pub format: Option<String>,
    pub unit: Option<String>,
    #[serde(default)]
    pub settable: bool,
    #[serde(default)]
    pub queryable: bool,
    /// Keep the value on the definition instead of the state store.
    #[serde(default, rename = "static")]
    pub is_static: bool,
    /// Initial value of a static property.
    pub value: Option<String>,
}

impl PropertySeed {
    /// Parsed [`format`](Self::format).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if the format does not parse.
    pub fn parsed_format(&self) -> Result<Option<PropertyFormat>, ConfigError> {
        let Some(raw) = self.format.as_deref() else {
            return Ok(None);
        };
        PropertyFormat::parse(raw).map_err(|err| {
            ConfigError::Validation(format!(
                "property `{}` has an invalid format: {err}",
                self.identifier
            ))
        })
    }
}

impl Config {
    /// Load configuration from `fbmqtt.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// result fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("fbmqtt.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("FBMQTT_BROKER_HOST") {
            self.mqtt.broker_host = val;
        }
        if let Ok(val) = std::env::var("FBMQTT_BROKER_PORT")
            && let Ok(port) = val.parse()
        {
            self.mqtt.broker_port = port;
        }
        if let Ok(val) = std::env::var("FBMQTT_PROTOCOL_VERSION")
            && let Ok(version) = ProtocolVersion::parse_lenient(&val)
        {
            self.mqtt.protocol_version = version;
        }
        if let Ok(val) = std::env::var("FBMQTT_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.mqtt.broker_port == 0 {
            return Err(ConfigError::Validation(
                "broker port must be non-zero".to_string(),
            ));
        }
        if self.connector.queue_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "queue interval must be non-zero".to_string(),
            ));
        }
        for device in &self.devices {
            validate_identifier("device", &device.identifier)?;
            for channel in &device.channels {
                validate_identifier("channel", &channel.identifier)?;
                validate_properties(&channel.properties)?;
            }
            validate_properties(&device.properties)?;
        }
        Ok(())
    }

    /// Pause between two drains of the ingress queue.
    #[must_use]
    pub fn queue_interval(&self) -> Duration {
        Duration::from_millis(self.connector.queue_interval_ms)
    }
}

fn validate_identifier(entity: &str, identifier: &str) -> Result<(), ConfigError> {
    if is_valid_identifier(identifier) {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "invalid {entity} identifier `{identifier}`"
        )))
    }
}

fn validate_properties(properties: &[PropertySeed]) -> Result<(), ConfigError> {
    for property in properties {
        validate_identifier("property", &property.identifier)?;
        property.parsed_format()?;
        if property.value.is_some() && !property.is_static {
            return Err(ConfigError::Validation(format!(
                "property `{}` has a value but is not static",
                property.identifier
            )));
        }
    }
    Ok(())
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            queue_interval_ms: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "fbmqttd=info,fbmqtt=info,rumqttc=warn".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
