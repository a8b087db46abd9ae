//! Consumer registry and the message consumers.
//!
//! [`Consumers`] drains the [`IngressQueue`] one message at a time and offers
//! each message to the registered consumers in registration order. The first
//! consumer that reports the message as handled stops the search.

mod channel;
mod control;
mod device;
mod extension;
mod hardware;
mod property;

pub use channel::ChannelMessageConsumer;
pub use control::ControlMessageConsumer;
pub use device::DeviceMessageConsumer;
pub use extension::ExtensionMessageConsumer;
pub use hardware::HardwareMessageConsumer;
pub use property::PropertyMessageConsumer;

use std::sync::Arc;

use fbmqtt_domain::channel::Channel;
use fbmqtt_domain::device::Device;
use fbmqtt_domain::error::FbMqttError;
use fbmqtt_domain::message::{Message, MessageHeader};
use fbmqtt_domain::property::{Property, PropertyOwner};

use crate::ports::{ChannelRepository, DeviceRepository, PropertyRepository, Repositories};
use crate::queue::IngressQueue;

/// A registered consumer.
pub enum MessageConsumer<R> {
    Device(DeviceMessageConsumer<R>),
    Channel(ChannelMessageConsumer<R>),
    Property(PropertyMessageConsumer<R>),
    Control(ControlMessageConsumer<R>),
    Hardware(HardwareMessageConsumer<R>),
    Extension(ExtensionMessageConsumer<R>),
}

impl<R: Repositories> MessageConsumer<R> {
    /// Offer a message to this consumer.
    ///
    /// # Errors
    ///
    /// Propagates store failures raised while applying the message.
    pub async fn consume(&self, message: &Message) -> Result<bool, FbMqttError> {
        match self {
            Self::Device(c) => c.consume(message).await,
            Self::Channel(c) => c.consume(message).await,
            Self::Property(c) => c.consume(message).await,
            Self::Control(c) => c.consume(message).await,
            Self::Hardware(c) => c.consume(message).await,
            Self::Extension(c) => c.consume(message).await,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Device(_) => "device",
            Self::Channel(_) => "channel",
            Self::Property(_) => "property",
            Self::Control(_) => "control",
            Self::Hardware(_) => "hardware",
            Self::Extension(_) => "extension",
        }
    }
}

macro_rules! impl_from_consumer {
    ($($variant:ident => $ty:ident),+ $(,)?) => {
        $(
            impl<R> From<$ty<R>> for MessageConsumer<R> {
                fn from(consumer: $ty<R>) -> Self {
                    Self::$variant(consumer)
                }
            }
        )+
    };
}

impl_from_consumer!(
    Device => DeviceMessageConsumer,
    Channel => ChannelMessageConsumer,
    Property => PropertyMessageConsumer,
    Control => ControlMessageConsumer,
    Hardware => HardwareMessageConsumer,
    Extension => ExtensionMessageConsumer,
);

/// Ordered consumer registry bound to an ingress queue.
pub struct Consumers<R> {
    queue: IngressQueue,
    consumers: Vec<MessageConsumer<R>>,
}

impl<R: Repositories> Consumers<R> {
    /// Create an empty registry draining `queue`.
    #[must_use]
    pub fn new(queue: IngressQueue) -> Self {
        Self {
            queue,
            consumers: Vec::new(),
        }
    }

    /// Create a registry with every consumer registered against `repos`.
    #[must_use]
    pub fn with_defaults(queue: IngressQueue, repos: &Arc<R>) -> Self {
        let mut consumers = Self::new(queue);
        consumers.register(DeviceMessageConsumer::new(Arc::clone(repos)));
        consumers.register(ChannelMessageConsumer::new(Arc::clone(repos)));
        consumers.register(PropertyMessageConsumer::new(Arc::clone(repos)));
        consumers.register(ControlMessageConsumer::new(Arc::clone(repos)));
        consumers.register(HardwareMessageConsumer::new(Arc::clone(repos)));
        consumers.register(ExtensionMessageConsumer::new(Arc::clone(repos)));
        consumers
    }

    /// Append a consumer. Consumers are tried in registration order.
    pub fn register(&mut self, consumer: impl Into<MessageConsumer<R>>) {
        self.consumers.push(consumer.into());
    }

    #[must_use]
    pub fn queue(&self) -> &IngressQueue {
        &self.queue
    }

    /// Dequeue and dispatch a single message.
    ///
    /// Returns `false` when the queue was empty.
    pub async fn consume_one(&self) -> bool {
        let Some(message) = self.queue.dequeue() else {
            return false;
        };
        self.dispatch(&message).await;
        true
    }

    /// Dispatch messages until the queue is empty, returning how many were
    /// dequeued. Each message is fully applied before the next is taken.
    pub async fn consume_all(&self) -> usize {
        let mut count = 0;
        while self.consume_one().await {
            count += 1;
        }
        count
    }

    async fn dispatch(&self, message: &Message) {
        for consumer in &self.consumers {
            match consumer.consume(message).await {
                Ok(true) => return,
                Ok(false) => {}
                Err(err) => {
                    tracing::error!(
                        consumer = consumer.name(),
                        kind = message.kind(),
                        device = %message.header().device,
                        error = %err,
                        "failed to consume message"
                    );
                    return;
                }
            }
        }

        tracing::debug!(
            kind = message.kind(),
            data = %message.to_value(),
            "no consumer handled message"
        );
    }
}

/// Resolved device, or device and channel, a message targets.
pub(crate) enum Target {
    Device(Device),
    Channel(Channel),
}

impl Target {
    pub(crate) fn owner(&self) -> PropertyOwner {
        match self {
            Self::Device(device) => PropertyOwner::Device(device.id),
            Self::Channel(channel) => PropertyOwner::Channel(channel.id),
        }
    }
}

/// Look up the device (and channel, when the header names one) a message
/// targets. Misses are logged and yield `None`.
pub(crate) async fn resolve_target<R: Repositories>(
    repos: &R,
    header: &MessageHeader,
) -> Result<Option<Target>, FbMqttError> {
    let Some(device) = find_device(repos, header).await? else {
        return Ok(None);
    };

    let Some(identifier) = header.channel.as_deref() else {
        return Ok(Some(Target::Device(device)));
    };

    match repos
        .channels()
        .find_by_identifier(device.id, identifier)
        .await?
    {
        Some(channel) => Ok(Some(Target::Channel(channel))),
        None => {
            tracing::error!(
                device = %header.device,
                channel = %identifier,
                "device channel is not registered"
            );
            Ok(None)
        }
    }
}

pub(crate) async fn find_device<R: Repositories>(
    repos: &R,
    header: &MessageHeader,
) -> Result<Option<Device>, FbMqttError> {
    let device = repos.devices().find_by_identifier(&header.device).await?;
    if device.is_none() {
        tracing::error!(device = %header.device, "device is not registered");
    }
    Ok(device)
}

/// Make the property list of `owner` match `identifiers`: unlisted
/// properties are deleted, missing ones are created as dynamic properties
/// of unknown type.
pub(crate) async fn sync_properties<R: Repositories>(
    repos: &R,
    owner: PropertyOwner,
    identifiers: &[String],
) -> Result<(), FbMqttError> {
    let properties = repos.properties();
    let existing = properties.find_by_owner(owner).await?;

    for property in &existing {
        if !identifiers.contains(&property.identifier) {
            tracing::debug!(property = %property.identifier, "removing unlisted property");
            properties.delete(property.id).await?;
        }
    }

    for identifier in identifiers {
        if existing.iter().any(|p| &p.identifier == identifier) {
            continue;
        }
        let property = Property::builder()
            .owner(owner)
            .identifier(identifier.as_str())
            .build()?;
        properties.create(property).await?;
    }
    Ok(())
}
