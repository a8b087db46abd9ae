use std::sync::Arc;

use fbmqtt_domain::error::FbMqttError;
use fbmqtt_domain::message::{ChannelAttribute, Message};
use fbmqtt_domain::property::PropertyOwner;

use super::{Target, resolve_target, sync_properties};
use crate::ports::{ChannelRepository, Repositories};

/// Consumer for [`Message::Channel`]: writes `$name` and reconciles the
/// channel's properties and controls against announced lists.
pub struct ChannelMessageConsumer<R> {
    repos: Arc<R>,
}

impl<R: Repositories> ChannelMessageConsumer<R> {
    #[must_use]
    pub fn new(repos: Arc<R>) -> Self {
        Self { repos }
    }

    /// # Errors
    ///
    /// Propagates store failures.
    #[tracing::instrument(name = "channel_consumer", skip_all)]
    pub async fn consume(&self, message: &Message) -> Result<bool, FbMqttError> {
        let Message::Channel(message) = message else {
            return Ok(false);
        };

        let Some(Target::Channel(mut channel)) =
            resolve_target(self.repos.as_ref(), message.header()).await?
        else {
            return Ok(true);
        };

        match message.attribute() {
            ChannelAttribute::Name(name) => {
                channel.name.clone_from(name);
                self.repos.channels().update(channel).await?;
            }
            ChannelAttribute::Properties(identifiers) => {
                sync_properties(
                    self.repos.as_ref(),
                    PropertyOwner::Channel(channel.id),
                    identifiers,
                )
                .await?;
            }
            ChannelAttribute::Controls(controls) => {
                channel.sync_controls(controls);
                self.repos.channels().update(channel).await?;
            }
        }

        tracing::debug!(
            device = %message.header().device,
            channel = %message.channel(),
            attribute = %message.attribute().name(),
            "consumed channel message"
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{InMemoryRepositories, header};
    use fbmqtt_domain::data_type::DataType;
    use fbmqtt_domain::message::{ChannelAttributeMessage, ControlName};

    fn attribute_message(channel: &str, attribute: ChannelAttribute) -> Message {
        ChannelAttributeMessage::new(header("sensor").with_channel(channel), attribute).into()
    }

    #[tokio::test]
    async fn should_rename_channel() {
        let repos = Arc::new(InMemoryRepositories::default());
        let device = repos.seed_device("sensor");
        let channel = repos.seed_channel(device.id, "relay");
        let consumer = ChannelMessageConsumer::new(Arc::clone(&repos));

        let message = attribute_message("relay", ChannelAttribute::Name(Some("Relay 1".into())));
        assert!(consumer.consume(&message).await.unwrap());
        assert_eq!(repos.channel(channel.id).unwrap().name.as_deref(), Some("Relay 1"));
    }

    #[tokio::test]
    async fn should_sync_channel_properties() {
        let repos = Arc::new(InMemoryRepositories::default());
        let device = repos.seed_device("sensor");
        let channel = repos.seed_channel(device.id, "relay");
        let kept = repos.seed_channel_property(channel.id, "switch", DataType::Bool);
        repos.seed_channel_property(channel.id, "power", DataType::Float);
        let consumer = ChannelMessageConsumer::new(Arc::clone(&repos));

        let message = attribute_message(
            "relay",
            ChannelAttribute::Properties(vec!["switch".into(), "energy".into()]),
        );
        consumer.consume(&message).await.unwrap();

        let mut identifiers: Vec<String> = repos
            .properties_of(PropertyOwner::Channel(channel.id))
            .into_iter()
            .map(|p| p.identifier)
            .collect();
        identifiers.sort();
        assert_eq!(identifiers, ["energy", "switch"]);
        assert_eq!(repos.property(kept.id).unwrap().data_type, DataType::Bool);
    }

    #[tokio::test]
    async fn should_sync_channel_controls() {
        let repos = Arc::new(InMemoryRepositories::default());
        let device = repos.seed_device("sensor");
        let channel = repos.seed_channel(device.id, "relay");
        let consumer = ChannelMessageConsumer::new(Arc::clone(&repos));

        let message = attribute_message(
            "relay",
            ChannelAttribute::Controls(vec![ControlName::Configure]),
        );
        consumer.consume(&message).await.unwrap();
        assert!(
            repos
                .channel(channel.id)
                .unwrap()
                .control(ControlName::Configure)
                .is_some()
        );
    }

    #[tokio::test]
    async fn should_handle_unknown_channel_without_writes() {
        let repos = Arc::new(InMemoryRepositories::default());
        repos.seed_device("sensor");
        let consumer = ChannelMessageConsumer::new(Arc::clone(&repos));

        let message = attribute_message("ghost", ChannelAttribute::Name(None));
        assert!(consumer.consume(&message).await.unwrap());
        assert_eq!(repos.mutations(), 0);
    }
}
