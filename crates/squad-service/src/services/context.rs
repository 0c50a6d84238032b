//! Service context - dependency container for services
//!
//! Holds the repositories, the realtime publisher and the marketplace
//! settings that every service reads.

use std::sync::Arc;

use squad_cache::{RedisDeclinedOrderStore, RedisEventPublisher, RedisPool};
use squad_common::MarketplaceConfig;
use squad_core::traits::{
    ChatMessageRepository, ChatRoomRepository, DeclinedOrderStore, EventPublisher,
    GameProfileRepository, GameRepository, NotificationRepository, OrderRepository,
    ProfileRepository, ReviewRepository,
};
use squad_core::DomainEvent;
use squad_db::{
    PgChatMessageRepository, PgChatRoomRepository, PgGameProfileRepository, PgGameRepository,
    PgNotificationRepository, PgOrderRepository, PgPool, PgProfileRepository, PgReviewRepository,
};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// Repositories and stores are trait objects so the same services run
/// against PostgreSQL/Redis in the binaries and in-memory stores in tests.
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    profile_repo: Arc<dyn ProfileRepository>,
    game_repo: Arc<dyn GameRepository>,
    order_repo: Arc<dyn OrderRepository>,
    chat_room_repo: Arc<dyn ChatRoomRepository>,
    chat_message_repo: Arc<dyn ChatMessageRepository>,
    notification_repo: Arc<dyn NotificationRepository>,
    review_repo: Arc<dyn ReviewRepository>,
    game_profile_repo: Arc<dyn GameProfileRepository>,

    // Redis-backed ports
    declined_store: Arc<dyn DeclinedOrderStore>,
    publisher: Arc<dyn EventPublisher>,

    marketplace: MarketplaceConfig,
}

impl ServiceContext {
    /// Wire every repository to PostgreSQL and the ports to Redis
    pub fn connect(pool: PgPool, redis_pool: RedisPool, marketplace: MarketplaceConfig) -> Self {
        Self {
            profile_repo: Arc::new(PgProfileRepository::new(pool.clone())),
            game_repo: Arc::new(PgGameRepository::new(pool.clone())),
            order_repo: Arc::new(PgOrderRepository::new(pool.clone())),
            chat_room_repo: Arc::new(PgChatRoomRepository::new(pool.clone())),
            chat_message_repo: Arc::new(PgChatMessageRepository::new(pool.clone())),
            notification_repo: Arc::new(PgNotificationRepository::new(pool.clone())),
            review_repo: Arc::new(PgReviewRepository::new(pool.clone())),
            game_profile_repo: Arc::new(PgGameProfileRepository::new(pool)),
            declined_store: Arc::new(RedisDeclinedOrderStore::new(redis_pool.clone())),
            publisher: Arc::new(RedisEventPublisher::new(redis_pool)),
            marketplace,
        }
    }

    // === Repositories ===

    pub fn profile_repo(&self) -> &dyn ProfileRepository {
        self.profile_repo.as_ref()
    }

    pub fn game_repo(&self) -> &dyn GameRepository {
        self.game_repo.as_ref()
    }

    pub fn order_repo(&self) -> &dyn OrderRepository {
        self.order_repo.as_ref()
    }

    pub fn chat_room_repo(&self) -> &dyn ChatRoomRepository {
        self.chat_room_repo.as_ref()
    }

    pub fn chat_message_repo(&self) -> &dyn ChatMessageRepository {
        self.chat_message_repo.as_ref()
    }

    pub fn notification_repo(&self) -> &dyn NotificationRepository {
        self.notification_repo.as_ref()
    }

    pub fn review_repo(&self) -> &dyn ReviewRepository {
        self.review_repo.as_ref()
    }

    pub fn game_profile_repo(&self) -> &dyn GameProfileRepository {
        self.game_profile_repo.as_ref()
    }

    // === Ports ===

    pub fn declined_store(&self) -> &dyn DeclinedOrderStore {
        self.declined_store.as_ref()
    }

    /// Marketplace tunables (page size, retention, fan-out batch)
    pub fn marketplace(&self) -> &MarketplaceConfig {
        &self.marketplace
    }

    /// Push an event to its recipients' live connections.
    ///
    /// Realtime delivery is best-effort: failures are logged and the
    /// calling operation still succeeds.
    pub async fn publish(&self, event: DomainEvent) {
        if let Err(e) = self.publisher.publish(&event).await {
            tracing::warn!(
                event_type = event.event_type(),
                error = %e,
                "Failed to publish realtime event"
            );
        }
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("marketplace", &self.marketplace)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom implementations
#[derive(Default)]
pub struct ServiceContextBuilder {
    profile_repo: Option<Arc<dyn ProfileRepository>>,
    game_repo: Option<Arc<dyn GameRepository>>,
    order_repo: Option<Arc<dyn OrderRepository>>,
    chat_room_repo: Option<Arc<dyn ChatRoomRepository>>,
    chat_message_repo: Option<Arc<dyn ChatMessageRepository>>,
    notification_repo: Option<Arc<dyn NotificationRepository>>,
    review_repo: Option<Arc<dyn ReviewRepository>>,
    game_profile_repo: Option<Arc<dyn GameProfileRepository>>,
    declined_store: Option<Arc<dyn DeclinedOrderStore>>,
    publisher: Option<Arc<dyn EventPublisher>>,
    marketplace: Option<MarketplaceConfig>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profile_repo(mut self, repo: Arc<dyn ProfileRepository>) -> Self {
        self.profile_repo = Some(repo);
        self
    }

    pub fn game_repo(mut self, repo: Arc<dyn GameRepository>) -> Self {
        self.game_repo = Some(repo);
        self
    }

    pub fn order_repo(mut self, repo: Arc<dyn OrderRepository>) -> Self {
        self.order_repo = Some(repo);
        self
    }

    pub fn chat_room_repo(mut self, repo: Arc<dyn ChatRoomRepository>) -> Self {
        self.chat_room_repo = Some(repo);
        self
    }

    pub fn chat_message_repo(mut self, repo: Arc<dyn ChatMessageRepository>) -> Self {
        self.chat_message_repo = Some(repo);
        self
    }

    pub fn notification_repo(mut self, repo: Arc<dyn NotificationRepository>) -> Self {
        self.notification_repo = Some(repo);
        self
    }

    pub fn review_repo(mut self, repo: Arc<dyn ReviewRepository>) -> Self {
        self.review_repo = Some(repo);
        self
    }

    pub fn game_profile_repo(mut self, repo: Arc<dyn GameProfileRepository>) -> Self {
        self.game_profile_repo = Some(repo);
        self
    }

    pub fn declined_store(mut self, store: Arc<dyn DeclinedOrderStore>) -> Self {
        self.declined_store = Some(store);
        self
    }

    pub fn publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    pub fn marketplace(mut self, marketplace: MarketplaceConfig) -> Self {
        self.marketplace = Some(marketplace);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Internal` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext {
            profile_repo: self
                .profile_repo
                .ok_or_else(|| ServiceError::internal("profile_repo is required"))?,
            game_repo: self
                .game_repo
                .ok_or_else(|| ServiceError::internal("game_repo is required"))?,
            order_repo: self
                .order_repo
                .ok_or_else(|| ServiceError::internal("order_repo is required"))?,
            chat_room_repo: self
                .chat_room_repo
                .ok_or_else(|| ServiceError::internal("chat_room_repo is required"))?,
            chat_message_repo: self
                .chat_message_repo
                .ok_or_else(|| ServiceError::internal("chat_message_repo is required"))?,
            notification_repo: self
                .notification_repo
                .ok_or_else(|| ServiceError::internal("notification_repo is required"))?,
            review_repo: self
                .review_repo
                .ok_or_else(|| ServiceError::internal("review_repo is required"))?,
            game_profile_repo: self
                .game_profile_repo
                .ok_or_else(|| ServiceError::internal("game_profile_repo is required"))?,
            declined_store: self
                .declined_store
                .ok_or_else(|| ServiceError::internal("declined_store is required"))?,
            publisher: self
                .publisher
                .unwrap_or_else(|| Arc::new(squad_core::NoopPublisher)),
            marketplace: self.marketplace.unwrap_or_default(),
        })
    }
}
