//! Redis Pub/Sub publisher.
//!
//! Domain events are wrapped in a [`PubSubEvent`] and fanned out on the
//! channel of the video they concern. Delivery is fire-and-forget.

use crate::pool::{RedisPool, RedisResult};
use crate::pubsub::PubSubChannel;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use tube_core::DomainEvent;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PubSubEvent {
    /// e.g. `VIDEO_REACTION_UPDATE`
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

#[derive(Clone)]
pub struct Publisher {
    pool: RedisPool,
}

impl Publisher {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// Returns the number of subscribers that received the message.
    pub async fn publish(&self, channel: &PubSubChannel, event: &PubSubEvent) -> RedisResult<u32> {
        let mut conn = self.pool.get().await?;
        let channel_name = channel.name();
        let payload = event.to_json()?;

        let receivers: u32 = conn.publish(&channel_name, &payload).await?;

        tracing::debug!(
            channel = %channel_name,
            event_type = %event.event_type,
            receivers = receivers,
            "Published event"
        );

        Ok(receivers)
    }

    pub async fn publish_many(
        &self,
        channels: &[PubSubChannel],
        event: &PubSubEvent,
    ) -> RedisResult<u32> {
        let payload = event.to_json()?;
        let mut total_receivers = 0;
        let mut conn = self.pool.get().await?;

        for channel in channels {
            let receivers: u32 = conn.publish(channel.name(), &payload).await?;
            total_receivers += receivers;
        }

        tracing::debug!(
            channels = channels.len(),
            event_type = %event.event_type,
            total_receivers = total_receivers,
            "Published event to multiple channels"
        );

        Ok(total_receivers)
    }

    /// Publish on `video:{id}`; reaction changes also go to the actor's own
    /// channel so their other sessions can update.
    pub async fn publish_domain(&self, event: &DomainEvent) -> RedisResult<u32> {
        let payload = PubSubEvent::from_domain(event)?;
        let mut channels = vec![PubSubChannel::video(event.video_id())];
        if let DomainEvent::ReactionChanged(e) = event {
            channels.push(PubSubChannel::user(e.actor_id));
        }
        self.publish_many(&channels, &payload).await
    }
}
