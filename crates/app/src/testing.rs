//! In-memory stores and message fixtures for the consumer tests.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use fbmqtt_domain::channel::Channel;
use fbmqtt_domain::data_type::DataType;
use fbmqtt_domain::device::Device;
use fbmqtt_domain::error::FbMqttError;
use fbmqtt_domain::id::{ChannelId, ClientId, DeviceId, PropertyId};
use fbmqtt_domain::message::{HardwareMessage, HardwareParameter, Message, MessageHeader, PropertyMessage};
use fbmqtt_domain::property::{Property, PropertyOwner};
use fbmqtt_domain::property_state::PropertyState;

use crate::ports::{
    ChannelRepository, DeviceRepository, PropertyRepository, PropertyStateRepository,
    Repositories,
};

#[derive(Default)]
struct Tables {
    devices: HashMap<DeviceId, Device>,
    channels: HashMap<ChannelId, Channel>,
    properties: HashMap<PropertyId, Property>,
    states: HashMap<PropertyId, PropertyState>,
}

#[derive(Default)]
struct Shared {
    tables: Mutex<Tables>,
    mutations: AtomicUsize,
    fail_device_update: AtomicBool,
    states_disabled: bool,
}

impl Shared {
    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    fn mutated(&self) {
        self.mutations.fetch_add(1, Ordering::SeqCst);
    }
}

pub(crate) struct Devices(Arc<Shared>);
pub(crate) struct Channels(Arc<Shared>);
pub(crate) struct Properties(Arc<Shared>);
pub(crate) struct States(Arc<Shared>);

/// All four stores over one set of tables. Every write through a port
/// counts as a mutation; seeding does not.
pub(crate) struct InMemoryRepositories {
    shared: Arc<Shared>,
    devices: Devices,
    channels: Channels,
    properties: Properties,
    states: States,
}

impl Default for InMemoryRepositories {
    fn default() -> Self {
        Self::from_shared(Shared::default())
    }
}

impl InMemoryRepositories {
    fn from_shared(shared: Shared) -> Self {
        let shared = Arc::new(shared);
        Self {
            devices: Devices(Arc::clone(&shared)),
            channels: Channels(Arc::clone(&shared)),
            properties: Properties(Arc::clone(&shared)),
            states: States(Arc::clone(&shared)),
            shared,
        }
    }

    /// Stores whose state store answers `NotConfigured`.
    pub(crate) fn without_states() -> Self {
        Self::from_shared(Shared {
            states_disabled: true,
            ..Shared::default()
        })
    }

    pub(crate) fn seed_device(&self, identifier: &str) -> Device {
        let device = Device::builder().identifier(identifier).build().unwrap();
        self.seed_existing_device(device.clone());
        device
    }

    pub(crate) fn seed_existing_device(&self, device: Device) {
        self.shared.tables().devices.insert(device.id, device);
    }

    pub(crate) fn seed_channel(&self, device_id: DeviceId, identifier: &str) -> Channel {
        let channel = Channel::builder()
            .device_id(device_id)
            .identifier(identifier)
            .build()
            .unwrap();
        self.shared.tables().channels.insert(channel.id, channel.clone());
        channel
    }

    pub(crate) fn seed_static_property(&self, device_id: DeviceId, identifier: &str) -> Property {
        self.seed_property(
            Property::builder()
                .owner(PropertyOwner::Device(device_id))
                .identifier(identifier)
                .static_value(None),
        )
    }

    pub(crate) fn seed_dynamic_property(
        &self,
        device_id: DeviceId,
        identifier: &str,
        data_type: DataType,
    ) -> Property {
        self.seed_property(
            Property::builder()
                .owner(PropertyOwner::Device(device_id))
                .identifier(identifier)
                .data_type(data_type),
        )
    }

    pub(crate) fn seed_channel_property(
        &self,
        channel_id: ChannelId,
        identifier: &str,
        data_type: DataType,
    ) -> Property {
        self.seed_property(
            Property::builder()
                .owner(PropertyOwner::Channel(channel_id))
                .identifier(identifier)
                .data_type(data_type),
        )
    }

    fn seed_property(&self, builder: fbmqtt_domain::property::PropertyBuilder) -> Property {
        let property = builder.build().unwrap();
        self.shared
            .tables()
            .properties
            .insert(property.id, property.clone());
        property
    }

    pub(crate) fn seed_state(&self, state: PropertyState) {
        self.shared.tables().states.insert(state.property_id, state);
    }

    pub(crate) fn device(&self, id: DeviceId) -> Option<Device> {
        self.shared.tables().devices.get(&id).cloned()
    }

    pub(crate) fn channel(&self, id: ChannelId) -> Option<Channel> {
        self.shared.tables().channels.get(&id).cloned()
    }

    pub(crate) fn channels_of(&self, device_id: DeviceId) -> Vec<Channel> {
        self.shared
            .tables()
            .channels
            .values()
            .filter(|c| c.device_id == device_id)
            .cloned()
            .collect()
    }

    pub(crate) fn property(&self, id: PropertyId) -> Option<Property> {
        self.shared.tables().properties.get(&id).cloned()
    }

    pub(crate) fn properties_of(&self, owner: PropertyOwner) -> Vec<Property> {
        self.shared
            .tables()
            .properties
            .values()
            .filter(|p| p.owner == owner)
            .cloned()
            .collect()
    }

    pub(crate) fn state(&self, property_id: PropertyId) -> Option<PropertyState> {
        self.shared.tables().states.get(&property_id).cloned()
    }

    pub(crate) fn mutations(&self) -> usize {
        self.shared.mutations.load(Ordering::SeqCst)
    }

    /// Make the next device update fail with a storage error.
    pub(crate) fn fail_next_device_update(&self) {
        self.shared.fail_device_update.store(true, Ordering::SeqCst);
    }
}

impl Repositories for InMemoryRepositories {
    type Devices = Devices;
    type Channels = Channels;
    type Properties = Properties;
    type States = States;

    fn devices(&self) -> &Devices {
        &self.devices
    }

    fn channels(&self) -> &Channels {
        &self.channels
    }

    fn properties(&self) -> &Properties {
        &self.properties
    }

    fn states(&self) -> &States {
        &self.states
    }
}

impl DeviceRepository for Devices {
    fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> impl Future<Output = Result<Option<Device>, FbMqttError>> + Send {
        let result = self
            .0
            .tables()
            .devices
            .values()
            .find(|d| d.identifier == identifier)
            .cloned();
        async { Ok(result) }
    }

    fn update(&self, device: Device) -> impl Future<Output = Result<Device, FbMqttError>> + Send {
        let result = if self.0.fail_device_update.swap(false, Ordering::SeqCst) {
            Err(FbMqttError::Storage("device store unavailable".into()))
        } else {
            self.0.mutated();
            self.0.tables().devices.insert(device.id, device.clone());
            Ok(device)
        };
        async { result }
    }
}

impl ChannelRepository for Channels {
    fn find_by_identifier(
        &self,
        device_id: DeviceId,
        identifier: &str,
    ) -> impl Future<Output = Result<Option<Channel>, FbMqttError>> + Send {
        let result = self
            .0
            .tables()
            .channels
            .values()
            .find(|c| c.device_id == device_id && c.identifier == identifier)
            .cloned();
        async { Ok(result) }
    }

    fn find_by_device(
        &self,
        device_id: DeviceId,
    ) -> impl Future<Output = Result<Vec<Channel>, FbMqttError>> + Send {
        let result: Vec<Channel> = self
            .0
            .tables()
            .channels
            .values()
            .filter(|c| c.device_id == device_id)
            .cloned()
            .collect();
        async { Ok(result) }
    }

    fn create(&self, channel: Channel) -> impl Future<Output = Result<Channel, FbMqttError>> + Send {
        self.0.mutated();
        self.0.tables().channels.insert(channel.id, channel.clone());
        async { Ok(channel) }
    }

    fn update(&self, channel: Channel) -> impl Future<Output = Result<Channel, FbMqttError>> + Send {
        self.0.mutated();
        self.0.tables().channels.insert(channel.id, channel.clone());
        async { Ok(channel) }
    }

    fn delete(&self, id: ChannelId) -> impl Future<Output = Result<(), FbMqttError>> + Send {
        self.0.mutated();
        let mut tables = self.0.tables();
        tables.channels.remove(&id);
        tables
            .properties
            .retain(|_, p| p.owner != PropertyOwner::Channel(id));
        async { Ok(()) }
    }
}

impl PropertyRepository for Properties {
    fn find(
        &self,
        id: PropertyId,
    ) -> impl Future<Output = Result<Option<Property>, FbMqttError>> + Send {
        let result = self.0.tables().properties.get(&id).cloned();
        async { Ok(result) }
    }

    fn find_by_identifier(
        &self,
        owner: PropertyOwner,
        identifier: &str,
    ) -> impl Future<Output = Result<Option<Property>, FbMqttError>> + Send {
        let result = self
            .0
            .tables()
            .properties
            .values()
            .find(|p| p.owner == owner && p.identifier == identifier)
            .cloned();
        async { Ok(result) }
    }

    fn find_by_owner(
        &self,
        owner: PropertyOwner,
    ) -> impl Future<Output = Result<Vec<Property>, FbMqttError>> + Send {
        let result: Vec<Property> = self
            .0
            .tables()
            .properties
            .values()
            .filter(|p| p.owner == owner)
            .cloned()
            .collect();
        async { Ok(result) }
    }

    fn create(
        &self,
        property: Property,
    ) -> impl Future<Output = Result<Property, FbMqttError>> + Send {
        self.0.mutated();
        self.0.tables().properties.insert(property.id, property.clone());
        async { Ok(property) }
    }

    fn update(
        &self,
        property: Property,
    ) -> impl Future<Output = Result<Property, FbMqttError>> + Send {
        self.0.mutated();
        self.0.tables().properties.insert(property.id, property.clone());
        async { Ok(property) }
    }

    fn delete(&self, id: PropertyId) -> impl Future<Output = Result<(), FbMqttError>> + Send {
        self.0.mutated();
        self.0.tables().properties.remove(&id);
        async { Ok(()) }
    }
}

impl States {
    fn store(&self, state: PropertyState) -> Result<PropertyState, FbMqttError> {
        if self.0.states_disabled {
            return Err(FbMqttError::NotConfigured("property state store"));
        }
        self.0.mutated();
        self.0.tables().states.insert(state.property_id, state.clone());
        Ok(state)
    }
}

impl PropertyStateRepository for States {
    fn find_one(
        &self,
        property_id: PropertyId,
    ) -> impl Future<Output = Result<Option<PropertyState>, FbMqttError>> + Send {
        let result = if self.0.states_disabled {
            Err(FbMqttError::NotConfigured("property state store"))
        } else {
            Ok(self.0.tables().states.get(&property_id).cloned())
        };
        async { result }
    }

    fn create(
        &self,
        state: PropertyState,
    ) -> impl Future<Output = Result<PropertyState, FbMqttError>> + Send {
        let result = self.store(state);
        async { result }
    }

    fn update(
        &self,
        state: PropertyState,
    ) -> impl Future<Output = Result<PropertyState, FbMqttError>> + Send {
        let result = self.store(state);
        async { result }
    }
}

pub(crate) fn header(device: &str) -> MessageHeader {
    MessageHeader::new(ClientId::new(), device)
}

pub(crate) fn property_message(
    device: &str,
    channel: Option<&str>,
    property: &str,
) -> PropertyMessage {
    let header = match channel {
        Some(channel) => header(device).with_channel(channel),
        None => header(device),
    };
    PropertyMessage::new(header, property)
}

pub(crate) fn hardware_message(device: &str) -> Message {
    HardwareMessage::new(header(device), HardwareParameter::Manufacturer, "FastyBird")
        .unwrap()
        .into()
}
