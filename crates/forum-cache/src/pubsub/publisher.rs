//! Redis Pub/Sub publisher

use crate::pool::{RedisPool, RedisResult};
use crate::pubsub::PubSubChannel;
use forum_core::events::VoteUpdatedEvent;
use forum_core::{DomainEvent, Snowflake};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};

/// Envelope for every published message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PubSubEvent {
    /// e.g. `VOTE_UPDATED`
    pub event_type: String,
    pub data: serde_json::Value,
}

impl PubSubEvent {
    #[must_use]
    pub fn new(event_type: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            event_type: event_type.into(),
            data,
        }
    }

    pub fn from_domain(event: &DomainEvent) -> Result<Self, serde_json::Error> {
        Ok(Self::new(event.event_type(), serde_json::to_value(event)?))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Clone, Debug)]
pub struct Publisher {
    pool: RedisPool,
}

impl Publisher {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// Returns the number of subscribers that received it
    pub async fn publish(&self, channel: &PubSubChannel, event: &PubSubEvent) -> RedisResult<u32> {
        let mut conn = self.pool.get().await?;
        let channel_name = channel.name();
        let payload = event.to_json()?;

        let receivers: u32 = conn.publish(&channel_name, &payload).await?;

        tracing::debug!(
            channel = %channel_name,
            event_type = %event.event_type,
            receivers,
            "Published event"
        );

        Ok(receivers)
    }

    pub async fn publish_domain_event(
        &self,
        channel: &PubSubChannel,
        event: &DomainEvent,
    ) -> RedisResult<u32> {
        let event = PubSubEvent::from_domain(event)?;
        self.publish(channel, &event).await
    }

    /// Fresh counters go to the channel of the post the target lives on
    pub async fn publish_vote_updated(
        &self,
        post_id: Snowflake,
        event: VoteUpdatedEvent,
    ) -> RedisResult<u32> {
        self.publish_domain_event(&PubSubChannel::post(post_id), &DomainEvent::VoteUpdated(event))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forum_core::events::PostCreatedEvent;

    #[test]
    fn test_pubsub_event_creation() {
        let data = serde_json::json!({"id": "12345"});
        let event = PubSubEvent::new("POST_CREATED", data.clone());
        assert_eq!(event.event_type, "POST_CREATED");
        assert_eq!(event.data, data);
    }

    #[test]
    fn test_from_domain_event() {
        let domain = DomainEvent::PostCreated(PostCreatedEvent::new(
            Snowflake::new(1),
            Snowflake::new(2),
            Snowflake::new(3),
        ));
        let event = PubSubEvent::from_domain(&domain).unwrap();
        assert_eq!(event.event_type, "POST_CREATED");
        assert_eq!(event.data["post_id"], "1");

        let json = event.to_json().unwrap();
        assert!(json.contains("\"event_type\":\"POST_CREATED\""));
    }
}
