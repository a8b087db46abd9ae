//! # fbmqtt-adapter-mqtt
//!
//! MQTT adapter: turns FB MQTT wire events into domain messages.
//!
//! ## Responsibilities
//! - Decode topic/payload pairs with the grammar of the configured protocol
//!   version ([`decoder::V1Decoder`], [`decoder::V2Decoder`])
//! - Connect to the broker with rumqttc and subscribe to the version prefix
//! - Append every decoded message to the application's ingress queue; log
//!   and drop everything that fails to decode
//!
//! ## Dependency rule
//! Same as other adapters: depends on `fbmqtt-app` and `fbmqtt-domain`.

pub mod client;
pub mod config;
pub mod decoder;
pub mod error;

pub use client::{MqttBridge, MqttSession};
pub use config::MqttConfig;
pub use decoder::{Decoder, Decoders};
pub use error::MqttError;
