//! Storage ports: repository traits for devices, channels, properties and
//! property state.
//!
//! The persistence layer is external to this crate. Consumers only ever see
//! these traits, bundled behind [`Repositories`].

use std::future::Future;

use fbmqtt_domain::channel::Channel;
use fbmqtt_domain::device::Device;
use fbmqtt_domain::error::FbMqttError;
use fbmqtt_domain::id::{ChannelId, DeviceId, PropertyId};
use fbmqtt_domain::property::{Property, PropertyOwner};
use fbmqtt_domain::property_state::PropertyState;

/// Repository for stored [`Device`]s.
pub trait DeviceRepository {
    /// Find a device by its protocol identifier.
    fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> impl Future<Output = Result<Option<Device>, FbMqttError>> + Send;

    /// Persist changes to an existing device.
    fn update(&self, device: Device) -> impl Future<Output = Result<Device, FbMqttError>> + Send;
}

/// Repository for stored [`Channel`]s.
pub trait ChannelRepository {
    /// Find a channel of a device by its protocol identifier.
    fn find_by_identifier(
        &self,
        device_id: DeviceId,
        identifier: &str,
    ) -> impl Future<Output = Result<Option<Channel>, FbMqttError>> + Send;

    /// All channels of a device.
    fn find_by_device(
        &self,
        device_id: DeviceId,
    ) -> impl Future<Output = Result<Vec<Channel>, FbMqttError>> + Send;

    fn create(&self, channel: Channel) -> impl Future<Output = Result<Channel, FbMqttError>> + Send;

    fn update(&self, channel: Channel) -> impl Future<Output = Result<Channel, FbMqttError>> + Send;

    /// Delete a channel together with its properties.
    fn delete(&self, id: ChannelId) -> impl Future<Output = Result<(), FbMqttError>> + Send;
}

/// Repository for stored [`Property`] definitions.
pub trait PropertyRepository {
    fn find(
        &self,
        id: PropertyId,
    ) -> impl Future<Output = Result<Option<Property>, FbMqttError>> + Send;

    /// Find a property of a device or channel by its protocol identifier.
    fn find_by_identifier(
        &self,
        owner: PropertyOwner,
        identifier: &str,
    ) -> impl Future<Output = Result<Option<Property>, FbMqttError>> + Send;

    /// All properties of a device or channel.
    fn find_by_owner(
        &self,
        owner: PropertyOwner,
    ) -> impl Future<Output = Result<Vec<Property>, FbMqttError>> + Send;

    fn create(
        &self,
        property: Property,
    ) -> impl Future<Output = Result<Property, FbMqttError>> + Send;

    fn update(
        &self,
        property: Property,
    ) -> impl Future<Output = Result<Property, FbMqttError>> + Send;

    fn delete(&self, id: PropertyId) -> impl Future<Output = Result<(), FbMqttError>> + Send;
}

/// Store for runtime [`PropertyState`] of dynamic properties.
///
/// Deployments without a state store return
/// [`FbMqttError::NotConfigured`] from every method.
pub trait PropertyStateRepository {
    fn find_one(
        &self,
        property_id: PropertyId,
    ) -> impl Future<Output = Result<Option<PropertyState>, FbMqttError>> + Send;

    fn create(
        &self,
        state: PropertyState,
    ) -> impl Future<Output = Result<PropertyState, FbMqttError>> + Send;

    fn update(
        &self,
        state: PropertyState,
    ) -> impl Future<Output = Result<PropertyState, FbMqttError>> + Send;
}

/// Every store the consumers need, behind one handle.
pub trait Repositories: Send + Sync + 'static {
    type Devices: DeviceRepository + Send + Sync;
    type Channels: ChannelRepository + Send + Sync;
    type Properties: PropertyRepository + Send + Sync;
    type States: PropertyStateRepository + Send + Sync;

    fn devices(&self) -> &Self::Devices;
    fn channels(&self) -> &Self::Channels;
    fn properties(&self) -> &Self::Properties;
    fn states(&self) -> &Self::States;
}
