//! # squad-cache
//!
//! Redis layer for realtime event fan-out and per-pro declined orders.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Pub/Sub**: Domain events published to per-user channels and consumed by the gateway
//! - **Declined orders**: The set of quick matches each pro has hidden
//!
//! ## Example
//!
//! ```ignore
//! use squad_cache::{RedisEventPublisher, RedisPool, RedisPoolConfig};
//! use squad_core::EventPublisher;
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let publisher = RedisEventPublisher::new(pool.clone());
//!
//! // Every recipient of the event gets it on `squadup:user:{id}`
//! publisher.publish(&event).await?;
//! ```

pub mod declined;
pub mod pool;
pub mod pubsub;

// Re-export pool types
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};

pub use declined::RedisDeclinedOrderStore;

// Re-export pubsub types
pub use pubsub::{
    PubSubChannel, PubSubEvent, Publisher, ReceivedMessage, RedisEventPublisher, Subscriber,
    SubscriberConfig, SubscriberError, SubscriberResult, BROADCAST_CHANNEL, CHANNEL_NAMESPACE,
    USER_CHANNEL_PREFIX,
};
