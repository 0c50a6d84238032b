//! Non-database ports: realtime event publishing and per-pro declines

use async_trait::async_trait;
use std::collections::HashSet;

use crate::events::DomainEvent;
use crate::value_objects::Id;

use super::RepoResult;

/// Pushes domain events to live clients
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Deliver the event to each of its recipients
    async fn publish(&self, event: &DomainEvent) -> RepoResult<()>;
}

/// Per-pro set of hidden orders.
///
/// Declining never changes an order; it only hides it from that pro's
/// listing of available orders.
#[async_trait]
pub trait DeclinedOrderStore: Send + Sync {
    async fn decline(&self, pro_id: Id, order_id: Id) -> RepoResult<()>;

    async fn declined(&self, pro_id: Id) -> RepoResult<HashSet<Id>>;
}

/// Publisher that drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPublisher;

#[async_trait]
impl EventPublisher for NoopPublisher {
    async fn publish(&self, _event: &DomainEvent) -> RepoResult<()> {
        Ok(())
    }
}
