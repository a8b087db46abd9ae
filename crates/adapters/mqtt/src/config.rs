//! MQTT connection configuration.

use std::time::Duration;

use fbmqtt_domain::protocol::ProtocolVersion;
use rumqttc::MqttOptions;
use serde::Deserialize;

/// Configuration for the broker connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    /// MQTT broker hostname or IP address.
    pub broker_host: String,
    /// MQTT broker port.
    pub broker_port: u16,
    /// MQTT client identifier.
    pub client_id: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Keep-alive interval in seconds.
    pub keep_alive_secs: u16,
    /// Protocol version devices publish with. Selects the topic grammar.
    pub protocol_version: ProtocolVersion,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker_host: "localhost".to_string(),
            broker_port: 1883,
            client_id: "fbmqtt".to_string(),
            username: None,
            password: None,
            keep_alive_secs: 30,
            protocol_version: ProtocolVersion::V1,
        }
    }
}

impl MqttConfig {
    /// Subscription filter covering every topic of the configured version.
    #[must_use]
    pub fn topic_filter(&self) -> String {
        format!("{}/#", self.protocol_version.topic_prefix())
    }

    /// Build the rumqttc session options.
    #[must_use]
    pub fn options(&self) -> MqttOptions {
        let mut options = MqttOptions::new(&self.client_id, &self.broker_host, self.broker_port);
        options.set_keep_alive(Duration::from_secs(u64::from(self.keep_alive_secs)));
        if let (Some(username), Some(password)) = (&self.username, &self.password) {
            options.set_credentials(username, password);
        }
        options
    }
}
