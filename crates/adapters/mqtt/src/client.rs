//! Transport bridge between a rumqttc session and the ingress queue.
//!
//! Every incoming publish is decoded with the decoder of the configured
//! protocol version and appended to the [`IngressQueue`]. Decode failures are
//! logged and the event is dropped; nothing is ever published back.

use std::sync::Arc;
use std::time::Duration;

use fbmqtt_app::queue::IngressQueue;
use fbmqtt_domain::id::ClientId;
use rumqttc::{AsyncClient, Event, EventLoop, Packet, QoS};
use tokio::task::JoinHandle;

use crate::config::MqttConfig;
use crate::decoder::Decoders;
use crate::error::MqttError;

/// Capacity of the rumqttc request channel.
const REQUEST_CAPACITY: usize = 32;

/// Pause after a connection error before polling again.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Decodes wire events and feeds them into the ingress queue.
pub struct MqttBridge {
    config: MqttConfig,
    decoders: Decoders,
    queue: IngressQueue,
    client_id: ClientId,
}

impl MqttBridge {
    /// Create a bridge for the protocol version selected in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`MqttError::UnsupportedVersion`] when `decoders` has no
    /// decoder for that version.
    pub fn new(
        config: MqttConfig,
        decoders: Decoders,
        queue: IngressQueue,
    ) -> Result<Self, MqttError> {
        if decoders.get(config.protocol_version).is_none() {
            return Err(MqttError::UnsupportedVersion(config.protocol_version));
        }
        Ok(Self {
            config,
            decoders,
            queue,
            client_id: ClientId::new(),
        })
    }

    /// Session identifier stamped on every decoded message.
    #[must_use]
    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    /// Decode one publish and queue the result.
    ///
    /// Returns `false` when the event was dropped.
    pub fn handle_publish(&self, topic: &str, payload: &[u8], retained: bool) -> bool {
        let version = self.config.protocol_version;
        let Some(decoder) = self.decoders.get(version) else {
            tracing::warn!(%version, topic, "no decoder registered, dropping event");
            return false;
        };

        match decoder.decode(self.client_id, topic, payload, retained) {
            Ok(message) => {
                self.queue.append(message);
                true
            }
            Err(err) => {
                tracing::warn!(topic, error = %err, "failed to decode message, dropping event");
                false
            }
        }
    }

    /// Connect to the broker and start the receive loop.
    ///
    /// The subscription is renewed on every connection acknowledgement so it
    /// survives reconnects.
    #[must_use]
    pub fn connect(self) -> MqttSession {
        let (client, eventloop) = AsyncClient::new(self.config.options(), REQUEST_CAPACITY);

        tracing::info!(
            host = %self.config.broker_host,
            port = self.config.broker_port,
            filter = %self.config.topic_filter(),
            "connecting to MQTT broker"
        );

        let handle = tokio::spawn(receive_loop(Arc::new(self), client.clone(), eventloop));
        MqttSession {
            client,
            handle: Some(handle),
        }
    }
}

async fn receive_loop(bridge: Arc<MqttBridge>, client: AsyncClient, mut eventloop: EventLoop) {
    let filter = bridge.config.topic_filter();
    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                bridge.handle_publish(&publish.topic, &publish.payload, publish.retain);
            }
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                tracing::info!("connected to MQTT broker");
                if let Err(err) = client.try_subscribe(filter.as_str(), QoS::AtLeastOnce) {
                    tracing::error!(%err, %filter, "failed to subscribe");
                }
            }
            Ok(Event::Incoming(Packet::Disconnect)) => {
                tracing::warn!("disconnected by MQTT broker");
            }
            Ok(_) => {}
            Err(err) => {
                tracing::error!(%err, "MQTT connection error, retrying");
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
        }
    }
}

/// Running broker session.
pub struct MqttSession {
    client: AsyncClient,
    handle: Option<JoinHandle<()>>,
}

impl MqttSession {
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Disconnect from the broker and stop the receive loop.
    ///
    /// # Errors
    ///
    /// Returns [`MqttError::NotConnected`] if the session was already
    /// closed.
    pub async fn disconnect(&mut self) -> Result<(), MqttError> {
        let handle = self.handle.take().ok_or(MqttError::NotConnected)?;
        if let Err(err) = self.client.disconnect().await {
            tracing::warn!(%err, "failed to send MQTT disconnect");
        }
        handle.abort();
        tracing::info!("MQTT session closed");
        Ok(())
    }
}
