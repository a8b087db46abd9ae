//! Device attribute reconciler.
//!
//! `$state` and `$name` are written onto the stored device. The list
//! attributes (`$properties`, `$channels`, `$extensions`, `$controls`) make
//! the stored children match the announced list.

use std::sync::Arc;

use fbmqtt_domain::channel::Channel;
use fbmqtt_domain::device::Device;
use fbmqtt_domain::error::FbMqttError;
use fbmqtt_domain::message::{DeviceAttribute, Message};
use fbmqtt_domain::property::PropertyOwner;

use super::{find_device, sync_properties};
use crate::ports::{ChannelRepository, DeviceRepository, Repositories};

/// Consumer for [`Message::Device`].
pub struct DeviceMessageConsumer<R> {
    repos: Arc<R>,
}

impl<R: Repositories> DeviceMessageConsumer<R> {
    #[must_use]
    pub fn new(repos: Arc<R>) -> Self {
        Self { repos }
    }

    /// Apply a device attribute message.
    ///
    /// Unknown devices are logged and reported as handled; they are never
    /// created from attribute messages.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    #[tracing::instrument(name = "device_consumer", skip_all)]
    pub async fn consume(&self, message: &Message) -> Result<bool, FbMqttError> {
        let Message::Device(message) = message else {
            return Ok(false);
        };

        let Some(mut device) = find_device(self.repos.as_ref(), message.header()).await? else {
            return Ok(true);
        };

        match message.attribute() {
            DeviceAttribute::State(state) => {
                device.state = *state;
                self.repos.devices().update(device).await?;
            }
            DeviceAttribute::Name(name) => {
                device.name.clone_from(name);
                self.repos.devices().update(device).await?;
            }
            DeviceAttribute::Properties(identifiers) => {
                sync_properties(
                    self.repos.as_ref(),
                    PropertyOwner::Device(device.id),
                    identifiers,
                )
                .await?;
            }
            DeviceAttribute::Channels(identifiers) => {
                self.sync_channels(&device, identifiers).await?;
            }
            DeviceAttribute::Extensions(extensions) => {
                device.retain_extensions(extensions);
                self.repos.devices().update(device).await?;
            }
            DeviceAttribute::Controls(controls) => {
                device.sync_controls(controls);
                self.repos.devices().update(device).await?;
            }
        }

        tracing::debug!(
            device = %message.header().device,
            attribute = %message.attribute().name(),
            "consumed device message"
        );
        Ok(true)
    }

    async fn sync_channels(&self, device: &Device, identifiers: &[String]) -> Result<(), FbMqttError> {
        let channels = self.repos.channels();
        let existing = channels.find_by_device(device.id).await?;

        for channel in &existing {
            if !identifiers.contains(&channel.identifier) {
                tracing::debug!(channel = %channel.identifier, "removing unlisted channel");
                channels.delete(channel.id).await?;
            }
        }

        for identifier in identifiers {
            if existing.iter().any(|c| &c.identifier == identifier) {
                continue;
            }
            let channel = Channel::builder()
                .device_id(device.id)
                .identifier(identifier.as_str())
                .build()?;
            channels.create(channel).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{InMemoryRepositories, header};
    use fbmqtt_domain::data_type::DataType;
    use fbmqtt_domain::device::ConnectionState;
    use fbmqtt_domain::message::{
        ControlName, DeviceAttributeMessage, ExtensionParameter, ExtensionType,
    };

    fn attribute_message(device: &str, attribute: DeviceAttribute) -> Message {
        DeviceAttributeMessage::new(header(device), attribute).into()
    }

    #[tokio::test]
    async fn should_write_connection_state() {
        let repos = Arc::new(InMemoryRepositories::default());
        let device = repos.seed_device("sensor");
        let consumer = DeviceMessageConsumer::new(Arc::clone(&repos));

        let message = attribute_message("sensor", DeviceAttribute::State(ConnectionState::Ready));
        assert!(consumer.consume(&message).await.unwrap());
        assert_eq!(repos.device(device.id).unwrap().state, ConnectionState::Ready);
    }

    #[tokio::test]
    async fn should_clear_name_when_empty() {
        let repos = Arc::new(InMemoryRepositories::default());
        let device = repos.seed_device("sensor");
        let consumer = DeviceMessageConsumer::new(Arc::clone(&repos));

        let named = attribute_message("sensor", DeviceAttribute::Name(Some("Kitchen".into())));
        consumer.consume(&named).await.unwrap();
        assert_eq!(repos.device(device.id).unwrap().name.as_deref(), Some("Kitchen"));

        consumer
            .consume(&attribute_message("sensor", DeviceAttribute::Name(None)))
            .await
            .unwrap();
        assert!(repos.device(device.id).unwrap().name.is_none());
    }

    #[tokio::test]
    async fn should_not_create_unknown_device() {
        let repos = Arc::new(InMemoryRepositories::default());
        let consumer = DeviceMessageConsumer::new(Arc::clone(&repos));

        let message = attribute_message("ghost", DeviceAttribute::State(ConnectionState::Ready));
        assert!(consumer.consume(&message).await.unwrap());
        assert_eq!(repos.mutations(), 0);
    }

    #[tokio::test]
    async fn should_sync_device_properties() {
        let repos = Arc::new(InMemoryRepositories::default());
        let device = repos.seed_device("sensor");
        repos.seed_dynamic_property(device.id, "rssi", DataType::Int);
        let consumer = DeviceMessageConsumer::new(Arc::clone(&repos));

        let message = attribute_message(
            "sensor",
            DeviceAttribute::Properties(vec!["uptime".into()]),
        );
        consumer.consume(&message).await.unwrap();

        let identifiers: Vec<String> = repos
            .properties_of(PropertyOwner::Device(device.id))
            .into_iter()
            .map(|p| p.identifier)
            .collect();
        assert_eq!(identifiers, ["uptime"]);
    }

    #[tokio::test]
    async fn should_sync_channels_and_cascade_properties() {
        let repos = Arc::new(InMemoryRepositories::default());
        let device = repos.seed_device("sensor");
        let removed = repos.seed_channel(device.id, "relay");
        let orphan = repos.seed_channel_property(removed.id, "switch", DataType::Bool);
        let kept = repos.seed_channel(device.id, "button");
        let consumer = DeviceMessageConsumer::new(Arc::clone(&repos));

        let message = attribute_message(
            "sensor",
            DeviceAttribute::Channels(vec!["button".into(), "led".into()]),
        );
        consumer.consume(&message).await.unwrap();

        let mut identifiers: Vec<String> = repos
            .channels_of(device.id)
            .into_iter()
            .map(|c| c.identifier)
            .collect();
        identifiers.sort();
        assert_eq!(identifiers, ["button", "led"]);
        assert!(repos.channel(kept.id).is_some());
        assert!(repos.channel(removed.id).is_none());
        assert!(repos.property(orphan.id).is_none());
    }

    #[tokio::test]
    async fn should_drop_unlisted_extensions() {
        let repos = Arc::new(InMemoryRepositories::default());
        let mut device = repos.seed_device("sensor");
        device.set_extension(ExtensionType::Sonoff, ExtensionParameter::Version, "3.1");
        device.set_extension(ExtensionType::FastyBird, ExtensionParameter::Version, "1.0");
        repos.seed_existing_device(device.clone());
        let consumer = DeviceMessageConsumer::new(Arc::clone(&repos));

        let message = attribute_message(
            "sensor",
            DeviceAttribute::Extensions(vec![ExtensionType::FastyBird]),
        );
        consumer.consume(&message).await.unwrap();

        let stored = repos.device(device.id).unwrap();
        assert_eq!(stored.extensions.len(), 1);
        assert_eq!(
            stored.extension(ExtensionType::FastyBird, ExtensionParameter::Version),
            Some("1.0")
        );
    }

    #[tokio::test]
    async fn should_sync_device_controls() {
        let repos = Arc::new(InMemoryRepositories::default());
        let device = repos.seed_device("sensor");
        let consumer = DeviceMessageConsumer::new(Arc::clone(&repos));

        let message = attribute_message(
            "sensor",
            DeviceAttribute::Controls(vec![ControlName::Reboot, ControlName::Configure]),
        );
        consumer.consume(&message).await.unwrap();

        let stored = repos.device(device.id).unwrap();
        assert!(stored.control(ControlName::Reboot).is_some());
        assert!(stored.control(ControlName::Configure).is_some());
        assert!(stored.control(ControlName::Reset).is_none());
    }
}
