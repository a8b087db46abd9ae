//! In-memory implementation of [`PropertyStateRepository`].

use std::future::Future;

use fbmqtt_app::ports::PropertyStateRepository;
use fbmqtt_domain::error::{FbMqttError, NotFoundError};
use fbmqtt_domain::id::PropertyId;
use fbmqtt_domain::property_state::PropertyState;

use crate::store::MemoryStore;

/// Property state table access.
///
/// A repository built with [`disabled`](Self::disabled) stands in for a
/// deployment without a state store: every call fails with
/// [`FbMqttError::NotConfigured`].
#[derive(Debug, Clone)]
pub struct MemoryStateRepository {
    store: Option<MemoryStore>,
}

impl MemoryStateRepository {
    #[must_use]
    pub fn new(store: MemoryStore) -> Self {
        Self { store: Some(store) }
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self { store: None }
    }

    fn store(&self) -> Result<&MemoryStore, FbMqttError> {
        self.store
            .as_ref()
            .ok_or(FbMqttError::NotConfigured("property state store"))
    }

    fn find_one_sync(
        &self,
        property_id: PropertyId,
    ) -> Result<Option<PropertyState>, FbMqttError> {
        Ok(self.store()?.read()?.states.get(&property_id).cloned())
    }

    fn create_sync(&self, state: PropertyState) -> Result<PropertyState, FbMqttError> {
        let mut tables = self.store()?.write()?;
        if !tables.properties.contains_key(&state.property_id) {
            return Err(NotFoundError {
                entity: "Property",
                identifier: state.property_id.to_string(),
            }
            .into());
        }
        tables.states.insert(state.property_id, state.clone());
        Ok(state)
    }

    fn update_sync(&self, state: PropertyState) -> Result<PropertyState, FbMqttError> {
        let mut tables = self.store()?.write()?;
        let Some(stored) = tables.states.get_mut(&state.property_id) else {
            return Err(NotFoundError {
                entity: "Property state",
                identifier: state.property_id.to_string(),
            }
            .into());
        };
        stored.clone_from(&state);
        Ok(state)
    }
}

impl PropertyStateRepository for MemoryStateRepository {
    fn find_one(
        &self,
        property_id: PropertyId,
    ) -> impl Future<Output = Result<Option<PropertyState>, FbMqttError>> + Send {
        let result = self.find_one_sync(property_id);
        async move { result }
    }

    fn create(
        &self,
        state: PropertyState,
    ) -> impl Future<Output = Result<PropertyState, FbMqttError>> + Send {
        let result = self.create_sync(state);
        async move { result }
    }

    fn update(
        &self,
        state: PropertyState,
    ) -> impl Future<Output = Result<PropertyState, FbMqttError>> + Send {
        let result = self.update_sync(state);
        async move { result }
    }
}
