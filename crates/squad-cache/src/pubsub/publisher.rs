//! Redis Pub/Sub publisher.
//!
//! Publishes events to Redis channels for distribution to WebSocket clients.

use crate::pool::{RedisPool, RedisResult};
use crate::pubsub::PubSubChannel;
use async_trait::async_trait;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use squad_core::{DomainError, DomainEvent, EventPublisher, RepoResult};

/// Event wrapper for Pub/Sub messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PubSubEvent {
    /// Event type name (e.g., "ORDER_UPDATED", "CHAT_MESSAGE_CREATED")
    pub event_type: String,
    /// Event payload
    pub data: serde_json::Value,
}

impl PubSubEvent {
    /// Create a new event
    #[must_use]
    pub fn new(event_type: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            event_type: event_type.into(),
            data,
        }
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<&DomainEvent> for PubSubEvent {
    fn from(event: &DomainEvent) -> Self {
        Self::new(event.event_type(), event.payload())
    }
}

/// Redis Pub/Sub publisher
#[derive(Clone)]
pub struct Publisher {
    pool: RedisPool,
}

impl Publisher {
    /// Create a new publisher
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// Publish an event to a channel
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

    /// Publish to multiple channels
    pub async fn publish_many(
        &self,
        channels: &[PubSubChannel],
        event: &PubSubEvent,
    ) -> RedisResult<u32> {
        let payload = event.to_json()?;
        let mut total_receivers = 0;
        let mut conn = self.pool.get().await?;

        for channel in channels {
            let channel_name = channel.name();
            let receivers: u32 = conn.publish(&channel_name, &payload).await?;
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
}

/// Domain-facing publisher: every recipient of an event gets it once on
/// their own user channel.
#[derive(Clone)]
pub struct RedisEventPublisher {
    publisher: Publisher,
}

impl RedisEventPublisher {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self {
            publisher: Publisher::new(pool),
        }
    }

    /// Channels for an event's recipients, first occurrence wins
    fn channels_for(event: &DomainEvent) -> Vec<PubSubChannel> {
        let mut recipients = event.recipients();
        let mut seen = std::collections::HashSet::new();
        recipients.retain(|id| !id.is_nil() && seen.insert(*id));
        recipients.into_iter().map(PubSubChannel::user).collect()
    }
}

#[async_trait]
impl EventPublisher for RedisEventPublisher {
    async fn publish(&self, event: &DomainEvent) -> RepoResult<()> {
        let channels = Self::channels_for(event);
        if channels.is_empty() {
            return Ok(());
        }

        self.publisher
            .publish_many(&channels, &PubSubEvent::from(event))
            .await
            .map(|_| ())
            .map_err(DomainError::from)
    }
}
