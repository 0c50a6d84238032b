//! In-memory implementations of the repository and port traits, used by
//! the service tests. Each table lives behind one mutex, so conditional
//! updates are atomic the same way a single SQL statement is.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use squad_common::MarketplaceConfig;
use squad_core::traits::{
    ChatMessageRepository, ChatRoomRepository, DeclinedOrderStore, EventPublisher,
    GameProfileRepository, GameRepository, NotificationRepository, OrderRepository,
    ProfileRepository, ReviewRepository,
};
use squad_core::{
    AccountType, ChatMessage, ChatRoom, ChatRoomStatus, DomainError, DomainEvent, Game,
    GameProfile, Id, MessagePage, Notification, Order, OrderQuery, OrderStatus, Profile,
    RepoResult, Review, StatusCount,
};

use super::context::{ServiceContext, ServiceContextBuilder};

#[derive(Default)]
pub struct MemoryStore {
    pub profiles: Mutex<HashMap<Id, Profile>>,
    pub games: Mutex<Vec<Game>>,
    pub orders: Mutex<HashMap<Id, Order>>,
    pub rooms: Mutex<Vec<ChatRoom>>,
    pub messages: Mutex<Vec<ChatMessage>>,
    pub notifications: Mutex<Vec<Notification>>,
    pub reviews: Mutex<Vec<Review>>,
    pub game_profiles: Mutex<Vec<GameProfile>>,
    pub declined: Mutex<HashMap<Id, HashSet<Id>>>,
    pub events: Mutex<Vec<DomainEvent>>,
    /// Sizes of every `create_many` call
    pub batches: Mutex<Vec<usize>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Insert a profile directly and return its id
    pub fn add_profile(&self, username: &str, account_type: AccountType) -> Id {
        let profile = Profile::new(Id::new(), username.to_string(), account_type);
        let id = profile.id;
        self.profiles.lock().insert(id, profile);
        id
    }

    pub fn order(&self, id: Id) -> Order {
        self.orders.lock()[&id].clone()
    }

    pub fn notifications_for(&self, user_id: Id) -> Vec<Notification> {
        self.notifications
            .lock()
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn event_types(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(DomainEvent::event_type).collect()
    }

    /// Backdate a message, for archival tests
    pub fn age_message(&self, id: Id, created_at: DateTime<Utc>) {
        if let Some(m) = self.messages.lock().iter_mut().find(|m| m.id == id) {
            m.created_at = created_at;
        }
    }
}

/// Context over a fresh store with the default marketplace settings
pub fn context(store: &Arc<MemoryStore>) -> ServiceContext {
    context_with(store, MarketplaceConfig::default())
}

pub fn context_with(store: &Arc<MemoryStore>, marketplace: MarketplaceConfig) -> ServiceContext {
    ServiceContextBuilder::new()
        .profile_repo(store.clone())
        .game_repo(store.clone())
        .order_repo(store.clone())
        .chat_room_repo(store.clone())
        .chat_message_repo(store.clone())
        .notification_repo(store.clone())
        .review_repo(store.clone())
        .game_profile_repo(store.clone())
        .declined_store(store.clone())
        .publisher(store.clone())
        .marketplace(marketplace)
        .build()
        .expect("all dependencies provided")
}

#[async_trait]
impl ProfileRepository for MemoryStore {
    async fn find_by_id(&self, id: Id) -> RepoResult<Option<Profile>> {
        Ok(self.profiles.lock().get(&id).cloned())
    }

    async fn find_many(&self, ids: &[Id]) -> RepoResult<Vec<Profile>> {
        let profiles = self.profiles.lock();
        Ok(ids.iter().filter_map(|id| profiles.get(id).cloned()).collect())
    }

    async fn create(&self, profile: &Profile) -> RepoResult<()> {
        let mut profiles = self.profiles.lock();
        if profiles.contains_key(&profile.id) {
            return Err(DomainError::ProfileExists);
        }
        profiles.insert(profile.id, profile.clone());
        Ok(())
    }

    async fn update(&self, profile: &Profile) -> RepoResult<()> {
        match self.profiles.lock().get_mut(&profile.id) {
            Some(existing) => {
                *existing = profile.clone();
                Ok(())
            }
            None => Err(DomainError::ProfileNotFound(profile.id)),
        }
    }

    async fn list_ids_by_account_type(&self, account_type: AccountType) -> RepoResult<Vec<Id>> {
        Ok(self
            .profiles
            .lock()
            .values()
            .filter(|p| p.account_type == account_type)
            .map(|p| p.id)
            .collect())
    }
}

#[async_trait]
impl GameRepository for MemoryStore {
    async fn find_by_id(&self, id: Id) -> RepoResult<Option<Game>> {
        Ok(self.games.lock().iter().find(|g| g.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Game>> {
        Ok(self.games.lock().iter().find(|g| g.matches_name(name)).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Game>> {
        Ok(self.games.lock().iter().find(|g| g.slug == slug).cloned())
    }

    async fn list(&self) -> RepoResult<Vec<Game>> {
        let mut games = self.games.lock().clone();
        games.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(games)
    }

    async fn create(&self, game: &Game) -> RepoResult<()> {
        self.games.lock().push(game.clone());
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn find_by_id(&self, id: Id) -> RepoResult<Option<Order>> {
        Ok(self.orders.lock().get(&id).cloned())
    }

    async fn create(&self, order: &Order) -> RepoResult<()> {
        self.orders.lock().insert(order.id, order.clone());
        Ok(())
    }

    async fn list(&self, query: &OrderQuery) -> RepoResult<Vec<Order>> {
        let mut orders: Vec<Order> = self
            .orders
            .lock()
            .values()
            .filter(|o| query.customer_id.map_or(true, |c| o.customer_id == c))
            .filter(|o| query.pro_id.map_or(true, |p| o.pro_id == Some(p)))
            .filter(|o| query.status.map_or(true, |s| o.status == s))
            .filter(|o| !query.unclaimed || o.pro_id.is_none())
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(orders
            .into_iter()
            .skip(query.offset.max(0) as usize)
            .take(query.limit.max(1) as usize)
            .collect())
    }

    async fn count_by_status(&self) -> RepoResult<Vec<StatusCount>> {
        let orders = self.orders.lock();
        Ok(OrderStatus::ALL
            .iter()
            .map(|&status| StatusCount {
                status,
                count: orders.values().filter(|o| o.status == status).count() as i64,
            })
            .filter(|c| c.count > 0)
            .collect())
    }

    async fn accept(&self, id: Id, pro_id: Id) -> RepoResult<bool> {
        let mut orders = self.orders.lock();
        Ok(orders.get_mut(&id).is_some_and(|o| o.accept(pro_id)))
    }

    async fn transition(&self, id: Id, from: &[OrderStatus], to: OrderStatus) -> RepoResult<bool> {
        let mut orders = self.orders.lock();
        match orders.get_mut(&id) {
            Some(order) if from.contains(&order.status) => {
                order.force_status(to);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn set_status(&self, id: Id, status: OrderStatus) -> RepoResult<bool> {
        let mut orders = self.orders.lock();
        match orders.get_mut(&id) {
            Some(order) => {
                order.force_status(status);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl ChatRoomRepository for MemoryStore {
    async fn find_by_id(&self, id: Id) -> RepoResult<Option<ChatRoom>> {
        Ok(self.rooms.lock().iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_order(&self, order_id: Id) -> RepoResult<Option<ChatRoom>> {
        Ok(self.rooms.lock().iter().find(|r| r.order_id == order_id).cloned())
    }

    async fn list_for_user(&self, user_id: Id) -> RepoResult<Vec<ChatRoom>> {
        let mut rooms: Vec<ChatRoom> = self
            .rooms
            .lock()
            .iter()
            .filter(|r| r.is_participant(user_id))
            .cloned()
            .collect();
        rooms.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(rooms)
    }

    async fn create_if_absent(&self, room: &ChatRoom) -> RepoResult<(ChatRoom, bool)> {
        let mut rooms = self.rooms.lock();
        if let Some(existing) = rooms.iter().find(|r| r.order_id == room.order_id) {
            return Ok((existing.clone(), false));
        }
        rooms.push(room.clone());
        Ok((room.clone(), true))
    }

    async fn set_status(&self, id: Id, status: ChatRoomStatus) -> RepoResult<bool> {
        let mut rooms = self.rooms.lock();
        match rooms.iter_mut().find(|r| r.id == id) {
            Some(room) => {
                room.status = status;
                room.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn touch(&self, id: Id) -> RepoResult<()> {
        if let Some(room) = self.rooms.lock().iter_mut().find(|r| r.id == id) {
            room.updated_at = Utc::now();
        }
        Ok(())
    }
}

#[async_trait]
impl ChatMessageRepository for MemoryStore {
    async fn create(&self, message: &ChatMessage) -> RepoResult<()> {
        self.messages.lock().push(message.clone());
        Ok(())
    }

    async fn list_page(&self, chat_room_id: Id, page: MessagePage) -> RepoResult<Vec<ChatMessage>> {
        let mut messages: Vec<ChatMessage> = self
            .messages
            .lock()
            .iter()
            .filter(|m| m.chat_room_id == chat_room_id && (page.include_archived || !m.archived))
            .cloned()
            .collect();
        // Insertion order breaks ties between equal timestamps
        messages.reverse();
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(messages
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.page_size as usize)
            .collect())
    }

    async fn count(&self, chat_room_id: Id, include_archived: bool) -> RepoResult<i64> {
        Ok(self
            .messages
            .lock()
            .iter()
            .filter(|m| m.chat_room_id == chat_room_id && (include_archived || !m.archived))
            .count() as i64)
    }

    async fn mark_read_from(&self, chat_room_id: Id, sender_id: Id) -> RepoResult<u64> {
        let mut updated = 0;
        for m in self.messages.lock().iter_mut() {
            if m.chat_room_id == chat_room_id && m.sender_id == sender_id && !m.read {
                m.read = true;
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn count_unread_for(&self, user_id: Id) -> RepoResult<i64> {
        let rooms: Vec<Id> = self
            .rooms
            .lock()
            .iter()
            .filter(|r| r.is_participant(user_id))
            .map(|r| r.id)
            .collect();
        Ok(self
            .messages
            .lock()
            .iter()
            .filter(|m| rooms.contains(&m.chat_room_id) && m.sender_id != user_id && !m.read)
            .count() as i64)
    }

    async fn archive_before(&self, cutoff: DateTime<Utc>) -> RepoResult<u64> {
        let closed: Vec<Id> = self
            .rooms
            .lock()
            .iter()
            .filter(|r| r.is_closed())
            .map(|r| r.id)
            .collect();

        let mut archived = 0;
        for m in self.messages.lock().iter_mut() {
            if closed.contains(&m.chat_room_id) && m.created_at < cutoff && !m.archived {
                m.archived = true;
                archived += 1;
            }
        }
        Ok(archived)
    }
}

#[async_trait]
impl NotificationRepository for MemoryStore {
    async fn find_by_id(&self, id: Id) -> RepoResult<Option<Notification>> {
        Ok(self.notifications.lock().iter().find(|n| n.id == id).cloned())
    }

    async fn create(&self, notification: &Notification) -> RepoResult<()> {
        self.notifications.lock().push(notification.clone());
        Ok(())
    }

    async fn create_many(&self, notifications: &[Notification]) -> RepoResult<u64> {
        self.batches.lock().push(notifications.len());
        self.notifications.lock().extend_from_slice(notifications);
        Ok(notifications.len() as u64)
    }

    async fn list_for_user(
        &self,
        user_id: Id,
        unread_only: bool,
        limit: i64,
    ) -> RepoResult<Vec<Notification>> {
        let mut list: Vec<Notification> = self
            .notifications
            .lock()
            .iter()
            .filter(|n| n.user_id == user_id && (!unread_only || !n.read))
            .cloned()
            .collect();
        list.reverse();
        list.truncate(limit.max(1) as usize);
        Ok(list)
    }

    async fn count_unread(&self, user_id: Id) -> RepoResult<i64> {
        Ok(self
            .notifications
            .lock()
            .iter()
            .filter(|n| n.user_id == user_id && !n.read)
            .count() as i64)
    }

    async fn mark_read(&self, id: Id, user_id: Id) -> RepoResult<bool> {
        let mut list = self.notifications.lock();
        match list.iter_mut().find(|n| n.id == id && n.user_id == user_id) {
            Some(n) => {
                n.read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_all_read(&self, user_id: Id) -> RepoResult<u64> {
        let mut updated = 0;
        for n in self.notifications.lock().iter_mut() {
            if n.user_id == user_id && !n.read {
                n.read = true;
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn delete(&self, id: Id, user_id: Id) -> RepoResult<bool> {
        let mut list = self.notifications.lock();
        let before = list.len();
        list.retain(|n| !(n.id == id && n.user_id == user_id));
        Ok(list.len() < before)
    }
}

#[async_trait]
impl ReviewRepository for MemoryStore {
    async fn find_by_id(&self, id: Id) -> RepoResult<Option<Review>> {
        Ok(self.reviews.lock().iter().find(|r| r.id == id).cloned())
    }

    async fn create(&self, review: &Review) -> RepoResult<()> {
        let mut reviews = self.reviews.lock();
        if reviews.iter().any(|r| r.order_id == review.order_id) {
            return Err(DomainError::ReviewExists);
        }
        reviews.push(review.clone());
        Ok(())
    }

    async fn list_for_reviewee(&self, reviewee_id: Id, limit: i64) -> RepoResult<Vec<Review>> {
        let mut list: Vec<Review> = self
            .reviews
            .lock()
            .iter()
            .filter(|r| r.reviewee_id == reviewee_id)
            .cloned()
            .collect();
        list.reverse();
        list.truncate(limit.max(1) as usize);
        Ok(list)
    }

    async fn list(&self, limit: i64, offset: i64) -> RepoResult<Vec<Review>> {
        let mut list = self.reviews.lock().clone();
        list.reverse();
        Ok(list
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(1) as usize)
            .collect())
    }

    async fn delete(&self, id: Id) -> RepoResult<bool> {
        let mut list = self.reviews.lock();
        let before = list.len();
        list.retain(|r| r.id != id);
        Ok(list.len() < before)
    }
}

#[async_trait]
impl GameProfileRepository for MemoryStore {
    async fn find(&self, profile_id: Id, game_id: Id) -> RepoResult<Option<GameProfile>> {
        Ok(self
            .game_profiles
            .lock()
            .iter()
            .find(|gp| gp.profile_id == profile_id && gp.game_id == game_id)
            .cloned())
    }

    async fn list_for_profile(&self, profile_id: Id) -> RepoResult<Vec<GameProfile>> {
        Ok(self
            .game_profiles
            .lock()
            .iter()
            .filter(|gp| gp.profile_id == profile_id)
            .cloned()
            .collect())
    }

    async fn upsert(&self, game_profile: &GameProfile) -> RepoResult<()> {
        let mut list = self.game_profiles.lock();
        match list
            .iter_mut()
            .find(|gp| gp.profile_id == game_profile.profile_id && gp.game_id == game_profile.game_id)
        {
            Some(existing) => *existing = game_profile.clone(),
            None => list.push(game_profile.clone()),
        }
        Ok(())
    }
}

#[async_trait]
impl DeclinedOrderStore for MemoryStore {
    async fn decline(&self, pro_id: Id, order_id: Id) -> RepoResult<()> {
        self.declined.lock().entry(pro_id).or_default().insert(order_id);
        Ok(())
    }

    async fn declined(&self, pro_id: Id) -> RepoResult<HashSet<Id>> {
        Ok(self.declined.lock().get(&pro_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl EventPublisher for MemoryStore {
    async fn publish(&self, event: &DomainEvent) -> RepoResult<()> {
        self.events.lock().push(event.clone());
        Ok(())
    }
}
