use std::sync::Arc;

use fbmqtt_domain::error::FbMqttError;
use fbmqtt_domain::message::Message;

use super::find_device;
use crate::ports::{DeviceRepository, Repositories};

/// Consumer for [`Message::Hardware`]: writes `$hw` values onto the device.
pub struct HardwareMessageConsumer<R> {
    repos: Arc<R>,
}

impl<R: Repositories> HardwareMessageConsumer<R> {
    #[must_use]
    pub fn new(repos: Arc<R>) -> Self {
        Self { repos }
    }

    /// # Errors
    ///
    /// Propagates store failures.
    #[tracing::instrument(name = "hardware_consumer", skip_all)]
    pub async fn consume(&self, message: &Message) -> Result<bool, FbMqttError> {
        let Message::Hardware(message) = message else {
            return Ok(false);
        };

        let Some(mut device) = find_device(self.repos.as_ref(), message.header()).await? else {
            return Ok(true);
        };

        device.hardware.set(message.parameter(), message.value());
        self.repos.devices().update(device).await?;

        tracing::debug!(
            device = %message.header().device,
            parameter = %message.parameter(),
            "consumed hardware message"
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{InMemoryRepositories, hardware_message};
    use fbmqtt_domain::message::HardwareParameter;

    #[tokio::test]
    async fn should_write_hardware_field() {
        let repos = Arc::new(InMemoryRepositories::default());
        let device = repos.seed_device("sensor");
        let consumer = HardwareMessageConsumer::new(Arc::clone(&repos));

        assert!(consumer.consume(&hardware_message("sensor")).await.unwrap());

        let stored = repos.device(device.id).unwrap();
        assert_eq!(
            stored.hardware.get(HardwareParameter::Manufacturer),
            Some("FastyBird")
        );
        assert_eq!(repos.mutations(), 1);
    }

    #[tokio::test]
    async fn should_handle_unknown_device_without_writes() {
        let repos = Arc::new(InMemoryRepositories::default());
        let consumer = HardwareMessageConsumer::new(Arc::clone(&repos));
        assert!(consumer.consume(&hardware_message("ghost")).await.unwrap());
        assert_eq!(repos.mutations(), 0);
    }
}
