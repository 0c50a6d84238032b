//! Per-session application state
//!
//! [`SessionStore`] owns everything the client keeps between requests: the
//! signed-in profile, the newest notifications with their unread count, the
//! cart and the orders this pro declined. State lives behind a
//! `tokio::sync::watch` channel so views can subscribe to changes. Nothing is
//! persisted; [`SessionStore::teardown`] forgets it all.

use std::collections::HashSet;

use squad_core::events::{NotificationCreatedEvent, NotificationsReadEvent};
use squad_core::{DomainEvent, Id};
use squad_service::dto::{
    NotificationResponse, NotificationsQuery, OrderResponse, ProfileResponse,
};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::cart::{Cart, CartItem};
use crate::error::ClientResult;
use crate::realtime::RealtimeEvent;

/// Snapshot of the session
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub user_id: Option<Id>,
    /// `None` until sign-up is complete
    pub profile: Option<ProfileResponse>,
    /// Newest first, at most [`SessionStore::NOTIFICATION_LIMIT`]
    pub notifications: Vec<NotificationResponse>,
    pub unread_count: i64,
    pub unread_messages: i64,
    pub cart: Cart,
    /// Orders this pro declined; hidden from the available list
    pub hidden_orders: HashSet<Id>,
    /// Read receipts already counted for notifications outside `notifications`
    read_uncached: HashSet<Id>,
}

impl SessionState {
    pub fn is_signed_in(&self) -> bool {
        self.user_id.is_some()
    }

    fn prepend_notification(&mut self, notification: NotificationResponse) {
        if self.notifications.iter().any(|n| n.id == notification.id) {
            return;
        }
        if !notification.read {
            self.unread_count += 1;
        }
        self.notifications.insert(0, notification);
        self.notifications.truncate(SessionStore::NOTIFICATION_LIMIT);
    }

    fn mark_read(&mut self, notification_id: Option<Id>) {
        match notification_id {
            Some(id) => match self.notifications.iter_mut().find(|n| n.id == id) {
                Some(n) => {
                    if !n.read {
                        n.read = true;
                        self.unread_count = (self.unread_count - 1).max(0);
                    }
                }
                None => {
                    if self.read_uncached.insert(id) {
                        self.unread_count = (self.unread_count - 1).max(0);
                    }
                }
            },
            None => {
                for n in &mut self.notifications {
                    n.read = true;
                }
                self.unread_count = 0;
                self.read_uncached.clear();
            }
        }
    }

    fn remove_notification(&mut self, notification_id: Id) {
        if let Some(index) = self.notifications.iter().position(|n| n.id == notification_id) {
            let removed = self.notifications.remove(index);
            if !removed.read {
                self.unread_count = (self.unread_count - 1).max(0);
            }
        }
    }

    fn is_mine(&self, user_id: Id) -> bool {
        self.user_id.map_or(true, |me| me == user_id)
    }
}

fn notification_from_event(e: &NotificationCreatedEvent) -> NotificationResponse {
    NotificationResponse {
        id: e.id,
        notification_type: e.notification_type,
        title: e.title.clone(),
        message: e.message.clone(),
        data: e.data.clone(),
        read: e.read,
        created_at: e.created_at,
    }
}

/// Application state store for one signed-in session
pub struct SessionStore {
    state: watch::Sender<SessionState>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub const NOTIFICATION_LIMIT: usize = 50;

    pub fn new() -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self { state }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Load profile and notifications for the signed-in user.
    ///
    /// A user who has not finished sign-up gets an empty profile instead of
    /// an error. The cart survives re-initialization.
    pub async fn init(&self, api: &ApiClient) -> ClientResult<()> {
        let profile = match api.me().await {
            Ok(profile) => Some(profile),
            Err(e) if e.is_profile_required() => None,
            Err(e) => return Err(e),
        };

        let query = NotificationsQuery {
            unread_only: false,
            limit: Some(Self::NOTIFICATION_LIMIT as i64),
        };
        let notifications = if profile.is_some() {
            api.notifications(&query).await?
        } else {
            Vec::new()
        };
        let unread_count = if profile.is_some() {
            api.unread_count().await?
        } else {
            0
        };

        info!(
            user_id = ?profile.as_ref().map(|p| p.id),
            notifications = notifications.len(),
            unread_count,
            "Session initialized"
        );

        self.state.send_modify(|state| {
            state.user_id = profile.as_ref().map(|p| p.id);
            state.profile = profile;
            state.notifications = notifications;
            state.notifications.truncate(Self::NOTIFICATION_LIMIT);
            state.unread_count = unread_count;
            state.read_uncached.clear();
        });
        Ok(())
    }

    /// Forget everything, cart included
    pub fn teardown(&self) {
        self.state.send_replace(SessionState::default());
        debug!("Session torn down");
    }

    /// Fold a realtime event into the state
    pub fn apply(&self, event: &RealtimeEvent) {
        match event {
            RealtimeEvent::Ready(ready) => self.state.send_modify(|state| {
                state.user_id = Some(ready.user_id);
                if ready.profile.is_some() {
                    state.profile = ready.profile.clone();
                }
                state.unread_count = ready.unread_notifications;
                state.read_uncached.clear();
                state.unread_messages = ready.unread_messages;
            }),
            RealtimeEvent::Domain(event) => self.apply_domain(event),
            RealtimeEvent::Unknown { event_type, .. } => {
                debug!(%event_type, "Ignoring unknown realtime event");
            }
            RealtimeEvent::Closed { .. } => {}
        }
    }

    fn apply_domain(&self, event: &DomainEvent) {
        match event {
            DomainEvent::NotificationCreated(e) => {
                self.state.send_if_modified(|state| {
                    if !state.is_mine(e.user_id) {
                        return false;
                    }
                    state.prepend_notification(notification_from_event(e));
                    true
                });
            }
            DomainEvent::NotificationsRead(NotificationsReadEvent {
                user_id,
                notification_id,
                ..
            }) => {
                self.state.send_if_modified(|state| {
                    if !state.is_mine(*user_id) {
                        return false;
                    }
                    state.mark_read(*notification_id);
                    true
                });
            }
            DomainEvent::NotificationDeleted(e) => {
                self.state.send_if_modified(|state| {
                    if !state.is_mine(e.user_id) {
                        return false;
                    }
                    state.remove_notification(e.notification_id);
                    true
                });
            }
            DomainEvent::ChatMessageCreated(e) => {
                self.state.send_if_modified(|state| match state.user_id {
                    Some(me) if me != e.sender_id => {
                        state.unread_messages += 1;
                        true
                    }
                    _ => false,
                });
            }
            DomainEvent::ChatMessagesRead(e) => {
                self.state.send_if_modified(|state| match state.user_id {
                    Some(me) if me == e.reader_id => {
                        let count = i64::try_from(e.count).unwrap_or(i64::MAX);
                        state.unread_messages = (state.unread_messages - count).max(0);
                        true
                    }
                    _ => false,
                });
            }
            DomainEvent::OrderCreated(_)
            | DomainEvent::OrderUpdated(_)
            | DomainEvent::ChatRoomCreated(_)
            | DomainEvent::ChatRoomClosed(_) => {}
        }
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    pub async fn mark_notification_read(&self, api: &ApiClient, id: Id) -> ClientResult<()> {
        api.mark_notification_read(id).await?;
        self.state.send_modify(|state| state.mark_read(Some(id)));
        Ok(())
    }

    pub async fn mark_all_notifications_read(&self, api: &ApiClient) -> ClientResult<()> {
        api.mark_all_notifications_read().await?;
        self.state.send_modify(|state| state.mark_read(None));
        Ok(())
    }

    pub async fn delete_notification(&self, api: &ApiClient, id: Id) -> ClientResult<()> {
        api.delete_notification(id).await?;
        self.state.send_modify(|state| state.remove_notification(id));
        Ok(())
    }

    // =========================================================================
    // Cart
    // =========================================================================

    pub fn add_to_cart(&self, item: CartItem) {
        self.state.send_modify(|state| state.cart.add(item));
    }

    pub fn remove_from_cart(&self, id: &str) -> Option<CartItem> {
        let mut removed = None;
        self.state.send_if_modified(|state| {
            removed = state.cart.remove(id);
            removed.is_some()
        });
        removed
    }

    pub fn update_cart_quantity(&self, id: &str, game_count: i32) -> bool {
        self.state
            .send_if_modified(|state| state.cart.update_quantity(id, game_count))
    }

    pub fn clear_cart(&self) {
        self.state.send_modify(|state| state.cart.clear());
    }

    /// Place one order per cart line, in order.
    ///
    /// Stops at the first failure. Lines already placed are removed from the
    /// cart either way, so retrying never orders them twice.
    pub async fn checkout(
        &self,
        api: &ApiClient,
        discord_username: &str,
        notes: &str,
    ) -> ClientResult<Vec<OrderResponse>> {
        let items = self.state.borrow().cart.items().to_vec();
        let mut placed = Vec::with_capacity(items.len());

        for item in &items {
            let request = item.to_order_request(discord_username, notes);
            match api.create_order(&request).await {
                Ok(order) => {
                    self.state.send_modify(|state| {
                        state.cart.remove(&item.id);
                    });
                    placed.push(order);
                }
                Err(e) => {
                    warn!(
                        item = %item.id,
                        placed = placed.len(),
                        error = %e,
                        "Checkout stopped"
                    );
                    return Err(e);
                }
            }
        }

        info!(orders = placed.len(), "Checkout complete");
        Ok(placed)
    }

    // =========================================================================
    // Declined orders
    // =========================================================================

    /// Decline an order and hide it locally
    pub async fn decline(&self, api: &ApiClient, order_id: Id) -> ClientResult<()> {
        api.decline_order(order_id).await?;
        self.hide_order(order_id);
        Ok(())
    }

    pub fn hide_order(&self, order_id: Id) {
        self.state
            .send_if_modified(|state| state.hidden_orders.insert(order_id));
    }

    /// Drop orders this session has hidden
    pub fn filter_available(&self, orders: Vec<OrderResponse>) -> Vec<OrderResponse> {
        let state = self.state.borrow();
        orders
            .into_iter()
            .filter(|o| !state.hidden_orders.contains(&o.id))
            .collect()
    }
}
