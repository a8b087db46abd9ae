//! Shared tables behind every in-memory repository.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use fbmqtt_domain::channel::Channel;
use fbmqtt_domain::device::Device;
use fbmqtt_domain::id::{ChannelId, DeviceId, PropertyId};
use fbmqtt_domain::property::Property;
use fbmqtt_domain::property_state::PropertyState;

use crate::error::StorageError;

#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub(crate) devices: HashMap<DeviceId, Device>,
    pub(crate) channels: HashMap<ChannelId, Channel>,
    pub(crate) properties: HashMap<PropertyId, Property>,
    pub(crate) states: HashMap<PropertyId, PropertyState>,
}

/// Handle to the tables. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StorageError> {
        self.tables.read().map_err(|_| StorageError::Poisoned)
    }

    pub(crate) fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StorageError> {
        self.tables.write().map_err(|_| StorageError::Poisoned)
    }
}
