//! Event dispatcher
//!
//! Receives events from Redis Pub/Sub and dispatches them to WebSocket connections.

use crate::connection::ConnectionManager;
use crate::events::GatewayEventType;
use squad_cache::{PubSubChannel, ReceivedMessage, Subscriber, SubscriberConfig, SubscriberError};
use squad_core::Id;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Routes Redis Pub/Sub messages to WebSocket connections.
///
/// Only users with at least one live connection on this process are
/// subscribed; the broadcast channel is always on.
pub struct EventDispatcher {
    connection_manager: Arc<ConnectionManager>,
    subscriber: Subscriber,
    running: Arc<AtomicBool>,
}

impl EventDispatcher {
    pub fn new(
        config: SubscriberConfig,
        connection_manager: Arc<ConnectionManager>,
    ) -> Result<Self, SubscriberError> {
        let subscriber = Subscriber::spawn(config, &[PubSubChannel::broadcast()])?;

        Ok(Self {
            connection_manager,
            subscriber,
            running: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Start receiving a user's events
    pub async fn subscribe_user(&self, user_id: Id) -> Result<(), SubscriberError> {
        self.subscriber.subscribe(&[PubSubChannel::user(user_id)]).await
    }

    /// Stop receiving a user's events
    pub async fn unsubscribe_user(&self, user_id: Id) -> Result<(), SubscriberError> {
        self.subscriber
            .unsubscribe(&[PubSubChannel::user(user_id)])
            .await
    }

    /// Spawn the receive loop
    pub fn start(self: Arc<Self>) {
        if self.running.swap(true, Ordering::SeqCst) {
            tracing::warn!("Event dispatcher is already running");
            return;
        }

        let dispatcher = self.clone();
        tokio::spawn(async move {
            dispatcher.run().await;
        });

        tracing::info!("Event dispatcher started");
    }

    pub async fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        if let Err(e) = self.subscriber.shutdown().await {
            tracing::debug!(error = %e, "Subscriber already stopped");
        }
        tracing::info!("Event dispatcher stopped");
    }

    async fn run(&self) {
        let mut receiver = self.subscriber.receiver();

        while self.running.load(Ordering::SeqCst) {
            match receiver.recv().await {
                Ok(msg) => {
                    route_message(&self.connection_manager, &msg).await;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(lagged = n, "Event dispatcher lagged behind");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::warn!("Event dispatcher channel closed");
                    break;
                }
            }
        }

        self.running.store(false, Ordering::SeqCst);
        tracing::info!("Event dispatcher loop ended");
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Drop for EventDispatcher {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

/// Deliver one Pub/Sub message to the connections it targets.
///
/// Returns how many connections got the dispatch.
pub async fn route_message(manager: &ConnectionManager, msg: &ReceivedMessage) -> usize {
    let Some(event) = &msg.event else {
        tracing::debug!(channel = %msg.channel, "Received non-event message, ignoring");
        return 0;
    };

    let event_type = match event.event_type.parse::<GatewayEventType>() {
        Ok(GatewayEventType::Ready) | Err(_) => {
            tracing::debug!(
                channel = %msg.channel,
                event_type = %event.event_type,
                "Unknown event type, ignoring"
            );
            return 0;
        }
        Ok(t) => t,
    };

    let sent = match &msg.channel {
        PubSubChannel::User(user_id) => {
            manager
                .send_to_user(*user_id, event_type.as_str(), &event.data)
                .await
        }
        PubSubChannel::Broadcast => manager.broadcast(event_type.as_str(), &event.data).await,
        PubSubChannel::Custom(name) => {
            tracing::debug!(channel = %name, event_type = %event_type, "Event on custom channel, ignoring");
            0
        }
    };

    tracing::trace!(channel = %msg.channel, event_type = %event_type, sent, "Event dispatched");

    sent
}
