//! # fbmqttd: FB MQTT connector daemon
//!
//! Composition root that wires all adapters together and runs the connector.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialise structured logging
//! - Provision configured devices into the in-memory store
//! - Connect the MQTT bridge to the ingress queue
//! - Start the connector that drains the queue through the consumers
//! - Handle graceful shutdown (SIGINT): wait for the queue to empty, then
//!   disconnect
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer: no domain logic belongs here.

mod config;
mod provision;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use fbmqtt_adapter_memory::{MemoryRepositories, MemoryStore};
use fbmqtt_adapter_mqtt::{Decoders, MqttBridge};
use fbmqtt_app::connector::Connector;
use fbmqtt_app::consumers::Consumers;
use fbmqtt_app::queue::IngressQueue;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Pause between two shutdown attempts while messages are still queued.
const SHUTDOWN_POLL: Duration = Duration::from_millis(50);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Store
    let store = MemoryStore::new();
    let provisioned = provision::provision(&store, &config.devices).await?;
    tracing::info!(devices = provisioned, "store ready");
    let repos = Arc::new(MemoryRepositories::new(&store));

    // Pipeline
    let queue = IngressQueue::new();
    let consumers = Consumers::with_defaults(queue.clone(), &repos);
    let mut connector = Connector::new(consumers, config.queue_interval());
    connector.start()?;

    // Transport
    let version = config.mqtt.protocol_version;
    let bridge = MqttBridge::new(config.mqtt, Decoders::default(), queue)?;
    tracing::info!(%version, client_id = %bridge.client_id(), "starting fbmqttd");
    let mut session = bridge.connect();

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    tracing::info!("shutdown requested");

    if let Err(err) = session.disconnect().await {
        tracing::warn!(%err, "MQTT session was already closed");
    }
    while !connector.terminate().await {
        tokio::time::sleep(SHUTDOWN_POLL).await;
    }

    tracing::info!("fbmqttd stopped");
    Ok(())
}
