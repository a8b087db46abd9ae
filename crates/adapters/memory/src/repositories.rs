//! [`Repositories`] bundle over a single [`MemoryStore`].

use fbmqtt_app::ports::Repositories;

use crate::channel_repo::MemoryChannelRepository;
use crate::device_repo::MemoryDeviceRepository;
use crate::property_repo::MemoryPropertyRepository;
use crate::state_repo::MemoryStateRepository;
use crate::store::MemoryStore;

/// Every in-memory repository, sharing one set of tables.
#[derive(Debug, Clone)]
pub struct MemoryRepositories {
    devices: MemoryDeviceRepository,
    channels: MemoryChannelRepository,
    properties: MemoryPropertyRepository,
    states: MemoryStateRepository,
}

impl MemoryRepositories {
    #[must_use]
    pub fn new(store: &MemoryStore) -> Self {
        Self {
            devices: MemoryDeviceRepository::new(store.clone()),
            channels: MemoryChannelRepository::new(store.clone()),
            properties: MemoryPropertyRepository::new(store.clone()),
            states: MemoryStateRepository::new(store.clone()),
        }
    }

    /// Same tables, but without a property state store.
    #[must_use]
    pub fn without_states(store: &MemoryStore) -> Self {
        Self {
            states: MemoryStateRepository::disabled(),
            ..Self::new(store)
        }
    }
}

impl Repositories for MemoryRepositories {
    type Devices = MemoryDeviceRepository;
    type Channels = MemoryChannelRepository;
    type Properties = MemoryPropertyRepository;
    type States = MemoryStateRepository;

    fn devices(&self) -> &Self::Devices {
        &self.devices
    }

    fn channels(&self) -> &Self::Channels {
        &self.channels
    }

    fn properties(&self) -> &Self::Properties {
        &self.properties
    }

    fn states(&self) -> &Self::States {
        &self.states
    }
}
