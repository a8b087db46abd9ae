//! In-memory implementation of [`DeviceRepository`].

use std::future::Future;

use fbmqtt_app::ports::DeviceRepository;
use fbmqtt_domain::device::Device;
use fbmqtt_domain::error::{FbMqttError, NotFoundError};
use fbmqtt_domain::id::DeviceId;

use crate::error::StorageError;
use crate::store::MemoryStore;

/// Device table access.
#[derive(Debug, Clone)]
pub struct MemoryDeviceRepository {
    store: MemoryStore,
}

impl MemoryDeviceRepository {
    #[must_use]
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    /// Register a device. Devices are provisioned out of band; the
    /// consumers never create them.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the identifier is already taken.
    pub fn create(&self, device: Device) -> Result<Device, FbMqttError> {
        device.validate()?;
        let mut tables = self.store.write()?;
        if tables
            .devices
            .values()
            .any(|d| d.identifier == device.identifier)
        {
            return Err(StorageError::Duplicate {
                entity: "Device",
                identifier: device.identifier,
            }
            .into());
        }
        tables.devices.insert(device.id, device.clone());
        tracing::debug!(device = %device.identifier, "registered device");
        Ok(device)
    }

    /// # Errors
    ///
    /// Returns a storage error if the store lock is poisoned.
    pub fn find(&self, id: DeviceId) -> Result<Option<Device>, FbMqttError> {
        Ok(self.store.read()?.devices.get(&id).cloned())
    }

    /// # Errors
    ///
    /// Returns a storage error if the store lock is poisoned.
    pub fn all(&self) -> Result<Vec<Device>, FbMqttError> {
        Ok(self.store.read()?.devices.values().cloned().collect())
    }

    fn find_sync(&self, identifier: &str) -> Result<Option<Device>, FbMqttError> {
        Ok(self
            .store
            .read()?
            .devices
            .values()
            .find(|d| d.identifier == identifier)
            .cloned())
    }

    fn update_sync(&self, device: Device) -> Result<Device, FbMqttError> {
        let mut tables = self.store.write()?;
        let Some(stored) = tables.devices.get_mut(&device.id) else {
            return Err(NotFoundError {
                entity: "Device",
                identifier: device.identifier,
            }
            .into());
        };
        stored.clone_from(&device);
        Ok(device)
    }
}

impl DeviceRepository for MemoryDeviceRepository {
    fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> impl Future<Output = Result<Option<Device>, FbMqttError>> + Send {
        let result = self.find_sync(identifier);
        async move { result }
    }

    fn update(&self, device: Device) -> impl Future<Output = Result<Device, FbMqttError>> + Send {
        let result = self.update_sync(device);
        async move { result }
    }
}
