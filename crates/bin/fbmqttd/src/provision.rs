//! Startup provisioning of configured devices into the store.
//!
//! Consumers never create devices, so anything that should be reconciled
//! has to exist before the first message arrives.

use anyhow::Context;
use fbmqtt_adapter_memory::{
    MemoryChannelRepository, MemoryDeviceRepository, MemoryPropertyRepository, MemoryStore,
};
use fbmqtt_app::ports::{ChannelRepository, PropertyRepository};
use fbmqtt_domain::channel::Channel;
use fbmqtt_domain::device::Device;
use fbmqtt_domain::property::{Property, PropertyOwner};

use crate::config::{DeviceSeed, PropertySeed};

/// Insert every seed. Returns the number of devices created.
///
/// # Errors
///
/// Fails on the first record the store rejects, e.g. a duplicate
/// identifier.
pub async fn provision(store: &MemoryStore, seeds: &[DeviceSeed]) -> anyhow::Result<usize> {
    let devices = MemoryDeviceRepository::new(store.clone());
    let channels = MemoryChannelRepository::new(store.clone());
    let properties = MemoryPropertyRepository::new(store.clone());

    for seed in seeds {
        let mut builder = Device::builder().identifier(&seed.identifier);
        if let Some(name) = &seed.name {
            builder = builder.name(name);
        }
        let device = devices
            .create(builder.build()?)
            .with_context(|| format!("failed to provision device `{}`", seed.identifier))?;

        for property in &seed.properties {
            properties
                .create(build_property(PropertyOwner::Device(device.id), property)?)
                .await
                .with_context(|| format!("failed to provision property `{}`", property.identifier))?;
        }

        for channel_seed in &seed.channels {
            let mut builder = Channel::builder()
                .device_id(device.id)
                .identifier(&channel_seed.identifier);
            if let Some(name) = &channel_seed.name {
                builder = builder.name(name);
            }
            let channel = channels
                .create(builder.build()?)
                .await
                .with_context(|| {
                    format!("failed to provision channel `{}`", channel_seed.identifier)
                })?;

            for property in &channel_seed.properties {
                properties
                    .create(build_property(PropertyOwner::Channel(channel.id), property)?)
                    .await
                    .with_context(|| {
                        format!("failed to provision property `{}`", property.identifier)
                    })?;
            }
        }

        tracing::info!(device = %device.identifier, "provisioned device");
    }

    Ok(seeds.len())
}

fn build_property(owner: PropertyOwner, seed: &PropertySeed) -> anyhow::Result<Property> {
    let mut builder = Property::builder()
        .owner(owner)
        .identifier(&seed.identifier)
        .settable(seed.settable)
        .queryable(seed.queryable);
    if let Some(name) = &seed.name {
        builder = builder.name(name);
    }
    if let Some(data_type) = seed.data_type {
        builder = builder.data_type(data_type);
    }
    if let Some(format) = seed.parsed_format()? {
        builder = builder.format(format);
    }
    if let Some(unit) = &seed.unit {
        builder = builder.unit(unit);
    }
    if seed.is_static {
        builder = builder.static_value(seed.value.clone());
    }
    Ok(builder.build()?)
}
