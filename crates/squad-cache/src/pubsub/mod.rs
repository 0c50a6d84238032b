//! Redis Pub/Sub module.
//!
//! Domain events travel from the API to the gateway over per-user channels.

mod channels;
mod publisher;
mod subscriber;

pub use channels::{PubSubChannel, BROADCAST_CHANNEL, CHANNEL_NAMESPACE, USER_CHANNEL_PREFIX};
pub use publisher::{PubSubEvent, Publisher, RedisEventPublisher};
pub use subscriber::{
    ReceivedMessage, Subscriber, SubscriberConfig, SubscriberError, SubscriberResult,
};
