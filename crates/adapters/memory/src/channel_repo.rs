//! In-memory implementation of [`ChannelRepository`].

use std::future::Future;

use fbmqtt_app::ports::ChannelRepository;
use fbmqtt_domain::channel::Channel;
use fbmqtt_domain::error::{FbMqttError, NotFoundError};
use fbmqtt_domain::id::{ChannelId, DeviceId};
use fbmqtt_domain::property::PropertyOwner;

use crate::error::StorageError;
use crate::store::MemoryStore;

/// Channel table access.
#[derive(Debug, Clone)]
pub struct MemoryChannelRepository {
    store: MemoryStore,
}

impl MemoryChannelRepository {
    #[must_use]
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    fn find_sync(
        &self,
        device_id: DeviceId,
        identifier: &str,
    ) -> Result<Option<Channel>, FbMqttError> {
        Ok(self
            .store
            .read()?
            .channels
            .values()
            .find(|c| c.device_id == device_id && c.identifier == identifier)
            .cloned())
    }

    fn find_by_device_sync(&self, device_id: DeviceId) -> Result<Vec<Channel>, FbMqttError> {
        Ok(self
            .store
            .read()?
            .channels
            .values()
            .filter(|c| c.device_id == device_id)
            .cloned()
            .collect())
    }

    fn create_sync(&self, channel: Channel) -> Result<Channel, FbMqttError> {
        channel.validate()?;
        let mut tables = self.store.write()?;
        if !tables.devices.contains_key(&channel.device_id) {
            return Err(NotFoundError {
                entity: "Device",
                identifier: channel.device_id.to_string(),
            }
            .into());
        }
        if tables
            .channels
            .values()
            .any(|c| c.device_id == channel.device_id && c.identifier == channel.identifier)
        {
            return Err(StorageError::Duplicate {
                entity: "Channel",
                identifier: channel.identifier,
            }
            .into());
        }
        tables.channels.insert(channel.id, channel.clone());
        tracing::debug!(channel = %channel.identifier, device_id = %channel.device_id, "created channel");
        Ok(channel)
    }

    fn update_sync(&self, channel: Channel) -> Result<Channel, FbMqttError> {
        let mut tables = self.store.write()?;
        let Some(stored) = tables.channels.get_mut(&channel.id) else {
            return Err(NotFoundError {
                entity: "Channel",
                identifier: channel.identifier,
            }
            .into());
        };
        stored.clone_from(&channel);
        Ok(channel)
    }

    fn delete_sync(&self, id: ChannelId) -> Result<(), FbMqttError> {
        let mut tables = self.store.write()?;
        tables.channels.remove(&id);

        let owner = PropertyOwner::Channel(id);
        let removed: Vec<_> = tables
            .properties
            .values()
            .filter(|p| p.owner == owner)
            .map(|p| p.id)
            .collect();
        for property_id in &removed {
            tables.properties.remove(property_id);
            tables.states.remove(property_id);
        }
        tracing::debug!(channel_id = %id, properties = removed.len(), "deleted channel");
        Ok(())
    }
}

impl ChannelRepository for MemoryChannelRepository {
    fn find_by_identifier(
        &self,
        device_id: DeviceId,
        identifier: &str,
    ) -> impl Future<Output = Result<Option<Channel>, FbMqttError>> + Send {
        let result = self.find_sync(device_id, identifier);
        async move { result }
    }

    fn find_by_device(
        &self,
        device_id: DeviceId,
    ) -> impl Future<Output = Result<Vec<Channel>, FbMqttError>> + Send {
        let result = self.find_by_device_sync(device_id);
        async move { result }
    }

    fn create(&self, channel: Channel) -> impl Future<Output = Result<Channel, FbMqttError>> + Send {
        let result = self.create_sync(channel);
        async move { result }
    }

    fn update(&self, channel: Channel) -> impl Future<Output = Result<Channel, FbMqttError>> + Send {
        let result = self.update_sync(channel);
        async move { result }
    }

    fn delete(&self, id: ChannelId) -> impl Future<Output = Result<(), FbMqttError>> + Send {
        let result = self.delete_sync(id);
        async move { result }
    }
}
