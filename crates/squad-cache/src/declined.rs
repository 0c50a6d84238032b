//! Per-pro declined orders.
//!
//! A decline only hides a quick match from one pro's available list, so it
//! lives in a Redis set instead of touching the order row.

use async_trait::async_trait;
use redis::AsyncCommands;
use squad_core::{DeclinedOrderStore, DomainError, Id, RepoResult};
use std::collections::HashSet;

use crate::pool::RedisPool;
use crate::pubsub::CHANNEL_NAMESPACE;

/// Declines are forgotten after 30 days
pub const DECLINED_TTL_SECS: i64 = 30 * 24 * 60 * 60;

/// Redis-backed [`DeclinedOrderStore`]
#[derive(Clone)]
pub struct RedisDeclinedOrderStore {
    pool: RedisPool,
}

impl RedisDeclinedOrderStore {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    fn key(pro_id: Id) -> String {
        format!("{CHANNEL_NAMESPACE}declined:{pro_id}")
    }
}

#[async_trait]
impl DeclinedOrderStore for RedisDeclinedOrderStore {
    #[tracing::instrument(skip(self))]
    async fn decline(&self, pro_id: Id, order_id: Id) -> RepoResult<()> {
        let mut conn = self.pool.get().await.map_err(DomainError::from)?;
        let key = Self::key(pro_id);

        let (): () = redis::pipe()
            .atomic()
            .sadd(&key, order_id.to_string())
            .ignore()
            .expire(&key, DECLINED_TTL_SECS)
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(|e| DomainError::CacheError(e.to_string()))?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn declined(&self, pro_id: Id) -> RepoResult<HashSet<Id>> {
        let mut conn = self.pool.get().await.map_err(DomainError::from)?;

        let members: Vec<String> = conn
            .smembers(Self::key(pro_id))
            .await
            .map_err(|e| DomainError::CacheError(e.to_string()))?;

        Ok(members
            .iter()
            .filter_map(|raw| match Id::parse(raw) {
                Ok(id) => Some(id),
                Err(_) => {
                    tracing::warn!(value = %raw, "Skipping malformed declined order id");
                    None
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_format() {
        let pro = Id::new();
        assert_eq!(
            RedisDeclinedOrderStore::key(pro),
            format!("squadup:declined:{pro}")
        );
    }

    #[test]
    fn test_default_ttl_is_thirty_days() {
        assert_eq!(DECLINED_TTL_SECS, 2_592_000);
    }
}
