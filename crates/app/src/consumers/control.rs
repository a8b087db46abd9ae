use std::sync::Arc;

use fbmqtt_domain::device::ControlRecord;
use fbmqtt_domain::error::FbMqttError;
use fbmqtt_domain::message::{ControlMessage, Message};

use super::{Target, resolve_target};
use crate::ports::{ChannelRepository, DeviceRepository, Repositories};

/// Consumer for [`Message::Control`]: records control values and the
/// `configure` schema on the device or channel.
pub struct ControlMessageConsumer<R> {
    repos: Arc<R>,
}

impl<R: Repositories> ControlMessageConsumer<R> {
    #[must_use]
    pub fn new(repos: Arc<R>) -> Self {
        Self { repos }
    }

    /// # Errors
    ///
    /// Propagates store failures.
    #[tracing::instrument(name = "control_consumer", skip_all)]
    pub async fn consume(&self, message: &Message) -> Result<bool, FbMqttError> {
        let Message::Control(message) = message else {
            return Ok(false);
        };

        match resolve_target(self.repos.as_ref(), message.header()).await? {
            None => return Ok(true),
            Some(Target::Device(mut device)) => {
                apply(device.control_mut(message.control()), message)?;
                self.repos.devices().update(device).await?;
            }
            Some(Target::Channel(mut channel)) => {
                apply(channel.control_mut(message.control()), message)?;
                self.repos.channels().update(channel).await?;
            }
        }

        tracing::debug!(
            device = %message.header().device,
            channel = ?message.header().channel,
            control = %message.control(),
            "consumed control message"
        );
        Ok(true)
    }
}

fn apply(record: &mut ControlRecord, message: &ControlMessage) -> Result<(), FbMqttError> {
    if let Some(value) = message.value() {
        record.value = Some(value.clone());
    }
    if message.is_configuration()
        && let Some(schema) = message.schema()?
    {
        record.schema = Some(schema.to_vec());
    }
    Ok(())
}
