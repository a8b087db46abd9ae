use std::sync::Arc;

use fbmqtt_domain::error::FbMqttError;
use fbmqtt_domain::message::Message;

use super::find_device;
use crate::ports::{DeviceRepository, Repositories};

/// Consumer for [`Message::Extension`]: records firmware extension values on
/// the device.
pub struct ExtensionMessageConsumer<R> {
    repos: Arc<R>,
}

impl<R: Repositories> ExtensionMessageConsumer<R> {
    #[must_use]
    pub fn new(repos: Arc<R>) -> Self {
        Self { repos }
    }

    /// # Errors
    ///
    /// Propagates store failures.
    #[tracing::instrument(name = "extension_consumer", skip_all)]
    pub async fn consume(&self, message: &Message) -> Result<bool, FbMqttError> {
        let Message::Extension(message) = message else {
            return Ok(false);
        };

        let Some(mut device) = find_device(self.repos.as_ref(), message.header()).await? else {
            return Ok(true);
        };

        device.set_extension(message.extension(), message.parameter(), message.value());
        self.repos.devices().update(device).await?;

        tracing::debug!(
            device = %message.header().device,
            extension = %message.extension(),
            parameter = %message.parameter(),
            "consumed extension message"
        );
        Ok(true)
    }
}
