//! In-memory implementation of [`PropertyRepository`].

use std::future::Future;

use fbmqtt_app::ports::PropertyRepository;
use fbmqtt_domain::error::{FbMqttError, NotFoundError};
use fbmqtt_domain::id::PropertyId;
use fbmqtt_domain::property::{Property, PropertyOwner};

use crate::error::StorageError;
use crate::store::{MemoryStore, Tables};

/// Property definition table access.
#[derive(Debug, Clone)]
pub struct MemoryPropertyRepository {
    store: MemoryStore,
}

fn owner_exists(tables: &Tables, owner: PropertyOwner) -> bool {
    match owner {
        PropertyOwner::Device(id) => tables.devices.contains_key(&id),
        PropertyOwner::Channel(id) => tables.channels.contains_key(&id),
    }
}

impl MemoryPropertyRepository {
    #[must_use]
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    fn find_sync(&self, id: PropertyId) -> Result<Option<Property>, FbMqttError> {
        Ok(self.store.read()?.properties.get(&id).cloned())
    }

    fn find_by_identifier_sync(
        &self,
        owner: PropertyOwner,
        identifier: &str,
    ) -> Result<Option<Property>, FbMqttError> {
        Ok(self
            .store
            .read()?
            .properties
            .values()
            .find(|p| p.owner == owner && p.identifier == identifier)
            .cloned())
    }

    fn find_by_owner_sync(&self, owner: PropertyOwner) -> Result<Vec<Property>, FbMqttError> {
        let tables = self.store.read()?;
        let mut properties: Vec<_> = tables
            .properties
            .values()
            .filter(|p| p.owner == owner)
            .cloned()
            .collect();
        properties.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        Ok(properties)
    }

    fn create_sync(&self, property: Property) -> Result<Property, FbMqttError> {
        property.validate()?;
        let mut tables = self.store.write()?;
        if !owner_exists(&tables, property.owner) {
            let identifier = match property.owner {
                PropertyOwner::Device(id) => id.to_string(),
                PropertyOwner::Channel(id) => id.to_string(),
            };
            return Err(NotFoundError {
                entity: "Property owner",
                identifier,
            }
            .into());
        }
        if tables
            .properties
            .values()
            .any(|p| p.owner == property.owner && p.identifier == property.identifier)
        {
            return Err(StorageError::Duplicate {
                entity: "Property",
                identifier: property.identifier,
            }
            .into());
        }
        tables.properties.insert(property.id, property.clone());
        tracing::debug!(property = %property.identifier, "created property");
        Ok(property)
    }

    fn update_sync(&self, property: Property) -> Result<Property, FbMqttError> {
        let mut tables = self.store.write()?;
        let Some(stored) = tables.properties.get_mut(&property.id) else {
            return Err(NotFoundError {
                entity: "Property",
                identifier: property.identifier,
            }
            .into());
        };
        stored.clone_from(&property);
        Ok(property)
    }

    fn delete_sync(&self, id: PropertyId) -> Result<(), FbMqttError> {
        let mut tables = self.store.write()?;
        tables.properties.remove(&id);
        tables.states.remove(&id);
        Ok(())
    }
}

impl PropertyRepository for MemoryPropertyRepository {
    fn find(
        &self,
        id: PropertyId,
    ) -> impl Future<Output = Result<Option<Property>, FbMqttError>> + Send {
        let result = self.find_sync(id);
        async move { result }
    }

    fn find_by_identifier(
        &self,
        owner: PropertyOwner,
        identifier: &str,
    ) -> impl Future<Output = Result<Option<Property>, FbMqttError>> + Send {
        let result = self.find_by_identifier_sync(owner, identifier);
        async move { result }
    }

    fn find_by_owner(
        &self,
        owner: PropertyOwner,
    ) -> impl Future<Output = Result<Vec<Property>, FbMqttError>> + Send {
        let result = self.find_by_owner_sync(owner);
        async move { result }
    }

    fn create(
        &self,
        property: Property,
    ) -> impl Future<Output = Result<Property, FbMqttError>> + Send {
        let result = self.create_sync(property);
        async move { result }
    }

    fn update(
        &self,
        property: Property,
    ) -> impl Future<Output = Result<Property, FbMqttError>> + Send {
        let result = self.update_sync(property);
        async move { result }
    }

    fn delete(&self, id: PropertyId) -> impl Future<Output = Result<(), FbMqttError>> + Send {
        let result = self.delete_sync(id);
        async move { result }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device_repo::MemoryDeviceRepository;
    use crate::state_repo::MemoryStateRepository;
    use fbmqtt_app::ports::PropertyStateRepository;
    use fbmqtt_domain::device::Device;
    use fbmqtt_domain::id::DeviceId;
    use fbmqtt_domain::property_state::PropertyState;
    use fbmqtt_domain::value::StateValue;

    fn setup() -> (MemoryStore, PropertyOwner) {
        let store = MemoryStore::new();
        let device = MemoryDeviceRepository::new(store.clone())
            .create(Device::builder().identifier("sensor").build().unwrap())
            .unwrap();
        (store, PropertyOwner::Device(device.id))
    }

    fn property(owner: PropertyOwner, identifier: &str) -> Property {
        Property::builder()
            .owner(owner)
            .identifier(identifier)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_list_properties_of_owner_sorted() {
        let (store, owner) = setup();
        let repo = MemoryPropertyRepository::new(store);
        repo.create(property(owner, "temperature")).await.unwrap();
        repo.create(property(owner, "humidity")).await.unwrap();

        let identifiers: Vec<_> = repo
            .find_by_owner(owner)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.identifier)
            .collect();
        assert_eq!(identifiers, ["humidity", "temperature"]);
        assert!(
            repo.find_by_identifier(owner, "humidity")
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn should_allow_same_identifier_under_different_owners() {
        let store = MemoryStore::new();
        let devices = MemoryDeviceRepository::new(store.clone());
        let first = devices
            .create(Device::builder().identifier("first").build().unwrap())
            .unwrap();
        let second = devices
            .create(Device::builder().identifier("second").build().unwrap())
            .unwrap();
        let repo = MemoryPropertyRepository::new(store);

        repo.create(property(PropertyOwner::Device(first.id), "uptime"))
            .await
            .unwrap();
        repo.create(property(PropertyOwner::Device(second.id), "uptime"))
            .await
            .unwrap();
        assert!(
            repo.create(property(PropertyOwner::Device(first.id), "uptime"))
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn should_reject_property_of_unknown_owner() {
        let repo = MemoryPropertyRepository::new(MemoryStore::new());
        let err = repo
            .create(property(PropertyOwner::Device(DeviceId::new()), "uptime"))
            .await
            .unwrap_err();
        assert!(matches!(err, FbMqttError::NotFound(_)));
    }

    #[tokio::test]
    async fn should_drop_state_with_property() {
        let (store, owner) = setup();
        let repo = MemoryPropertyRepository::new(store.clone());
        let states = MemoryStateRepository::new(store);
        let uptime = repo.create(property(owner, "uptime")).await.unwrap();
        states
            .create(PropertyState::reported(uptime.id, Some(StateValue::Int(5))))
            .await
            .unwrap();

        repo.delete(uptime.id).await.unwrap();

        assert!(repo.find(uptime.id).await.unwrap().is_none());
        assert!(states.find_one(uptime.id).await.unwrap().is_none());
    }
}
