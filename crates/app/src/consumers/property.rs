//! Property state reconciler.
//!
//! Applies a [`PropertyMessage`] to the stored definition of a device or
//! channel property. Attribute updates are written onto the definition; value
//! updates go onto the definition for static properties and into the state
//! store for dynamic ones.

use std::sync::Arc;

use fbmqtt_domain::error::FbMqttError;
use fbmqtt_domain::message::{Message, PropertyMessage};
use fbmqtt_domain::property::{Property, PropertyKind};
use fbmqtt_domain::property_state::PropertyState;
use fbmqtt_domain::value::normalize;

use super::resolve_target;
use crate::ports::{PropertyRepository, PropertyStateRepository, Repositories};

/// Consumer for [`Message::Property`].
pub struct PropertyMessageConsumer<R> {
    repos: Arc<R>,
}

impl<R: Repositories> PropertyMessageConsumer<R> {
    #[must_use]
    pub fn new(repos: Arc<R>) -> Self {
        Self { repos }
    }

    /// Apply a property message.
    ///
    /// Returns `Ok(false)` for other message kinds. Unknown devices,
    /// channels and properties are logged and reported as handled.
    ///
    /// # Errors
    ///
    /// Propagates store failures other than an unconfigured state store.
    #[tracing::instrument(name = "property_consumer", skip_all)]
    pub async fn consume(&self, message: &Message) -> Result<bool, FbMqttError> {
        let Message::Property(message) = message else {
            return Ok(false);
        };

        let header = message.header();
        let Some(target) = resolve_target(self.repos.as_ref(), header).await? else {
            return Ok(true);
        };

        let Some(property) = self
            .repos
            .properties()
            .find_by_identifier(target.owner(), message.property())
            .await?
        else {
            tracing::error!(
                device = %header.device,
                channel = ?header.channel,
                property = %message.property(),
                "property is not registered"
            );
            return Ok(true);
        };

        match message.value() {
            None => self.apply_attributes(message, property).await?,
            Some(raw) => self.apply_value(message, property, raw).await?,
        }

        tracing::debug!(
            device = %header.device,
            channel = ?header.channel,
            property = %message.property(),
            "consumed property message"
        );
        Ok(true)
    }

    async fn apply_attributes(
        &self,
        message: &PropertyMessage,
        mut property: Property,
    ) -> Result<(), FbMqttError> {
        if message.attributes().is_empty() {
            return Ok(());
        }

        for attribute in message.attributes() {
            property.apply_attribute(attribute);
        }
        self.repos.properties().update(property).await?;
        Ok(())
    }

    async fn apply_value(
        &self,
        message: &PropertyMessage,
        mut property: Property,
        raw: &str,
    ) -> Result<(), FbMqttError> {
        if property.kind.is_static() {
            property.kind = PropertyKind::Static {
                value: Some(raw.to_string()),
            };
            self.repos.properties().update(property).await?;
            return Ok(());
        }

        let actual = normalize(
            property.data_type,
            raw,
            property.format.as_ref(),
            property.invalid.as_deref(),
        );

        let states = self.repos.states();
        let stored = match states.find_one(property.id).await {
            Ok(stored) => stored,
            Err(FbMqttError::NotConfigured(store)) => {
                tracing::warn!(
                    property = %message.property(),
                    property_id = %property.id,
                    store,
                    "state could not be fetched"
                );
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        let result = match stored {
            None => states
                .create(PropertyState::reported(property.id, actual))
                .await
                .map(drop),
            Some(mut state) => {
                state.report(actual);
                states.update(state).await.map(drop)
            }
        };

        match result {
            Err(FbMqttError::NotConfigured(store)) => {
                tracing::warn!(
                    property = %message.property(),
                    property_id = %property.id,
                    store,
                    "state could not be saved"
                );
                Ok(())
            }
            other => other,
        }
    }
}
