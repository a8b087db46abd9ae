//! # fbmqtt-app
//!
//! Application layer: the message pipeline between the MQTT transport and
//! the stores.
//!
//! ## Responsibilities
//! - Define **port traits** that store adapters must implement:
//!   - `DeviceRepository`, `ChannelRepository`, `PropertyRepository`
//!   - `PropertyStateRepository` for runtime values of dynamic properties
//! - Provide the **ingress queue** the transport appends decoded messages to
//! - Dispatch queued messages to the **consumers**, which reconcile stored
//!   devices, channels, properties and property state
//! - Run the periodic **connector** task that drains the queue
//!
//! ## Dependency rule
//! Depends on `fbmqtt-domain` only (plus `tokio` for the drain task).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod connector;
pub mod consumers;
pub mod ports;
pub mod queue;

#[cfg(test)]
pub(crate) mod testing;
