//! Loaded history of one chat room

use squad_core::{ChatRoomStatus, DomainEvent, Id};
use squad_service::dto::{ChatMessageResponse, ChatRoomResponse, MessagePageResponse, MessagesQuery};
use tracing::debug;

use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::realtime::RealtimeEvent;

/// Messages of one room, oldest first.
///
/// Pages are fetched newest first (page 0 is the latest); older pages are
/// prepended as the user scrolls back.
#[derive(Debug, Clone)]
pub struct ChatFeed {
    room_id: Id,
    messages: Vec<ChatMessageResponse>,
    page: i64,
    has_more: bool,
    closed: bool,
}

impl ChatFeed {
    /// Empty feed for a room; nothing is fetched yet
    pub fn new(room: &ChatRoomResponse) -> Self {
        Self {
            room_id: room.id,
            messages: Vec::new(),
            page: 0,
            has_more: false,
            closed: room.status == ChatRoomStatus::Closed,
        }
    }

    /// Feed with the newest page loaded
    pub async fn open(api: &ApiClient, room: &ChatRoomResponse) -> ClientResult<Self> {
        let mut feed = Self::new(room);
        feed.refresh(api).await?;
        Ok(feed)
    }

    pub fn room_id(&self) -> Id {
        self.room_id
    }

    pub fn messages(&self) -> &[ChatMessageResponse] {
        &self.messages
    }

    /// Oldest page loaded so far
    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Fetch the next older page. Returns how many messages were added.
    pub async fn load_older(&mut self, api: &ApiClient) -> ClientResult<usize> {
        if !self.has_more {
            return Ok(0);
        }
        let query = MessagesQuery {
            page: Some(self.page + 1),
            include_archived: false,
        };
        let page = api.messages(self.room_id, &query).await?;
        Ok(self.prepend_page(page))
    }

    /// Re-fetch the newest page and merge it in
    pub async fn refresh(&mut self, api: &ApiClient) -> ClientResult<usize> {
        let page = api.messages(self.room_id, &MessagesQuery::default()).await?;
        Ok(self.merge_latest(page))
    }

    /// Send a message and add it to the feed
    pub async fn send(&mut self, api: &ApiClient, text: &str) -> ClientResult<ChatMessageResponse> {
        let message = api.send_message(self.room_id, text).await?;
        self.merge(vec![message.clone()]);
        Ok(message)
    }

    /// Mark the other participant's messages read
    pub async fn mark_read(&mut self, api: &ApiClient, me: Id) -> ClientResult<u64> {
        let updated = api.mark_messages_read(self.room_id).await?;
        self.mark_read_from_others(me);
        Ok(updated)
    }

    /// React to a realtime event. Returns whether the feed changed.
    pub async fn handle_event(&mut self, api: &ApiClient, event: &RealtimeEvent) -> ClientResult<bool> {
        let RealtimeEvent::Domain(event) = event else {
            return Ok(false);
        };
        match event {
            DomainEvent::ChatMessageCreated(e) if e.chat_room_id == self.room_id => {
                Ok(self.refresh(api).await? > 0)
            }
            DomainEvent::ChatMessagesRead(e) if e.chat_room_id == self.room_id => {
                Ok(self.mark_read_by_sender(e.sender_id) > 0)
            }
            DomainEvent::ChatRoomClosed(e) if e.chat_room_id == self.room_id => {
                let changed = !self.closed;
                self.closed = true;
                Ok(changed)
            }
            _ => Ok(false),
        }
    }

    // =========================================================================
    // Merging
    // =========================================================================

    fn prepend_page(&mut self, page: MessagePageResponse) -> usize {
        self.page = page.page;
        self.has_more = page.has_more;

        let mut older: Vec<ChatMessageResponse> = page
            .messages
            .into_iter()
            .filter(|m| !self.messages.iter().any(|existing| existing.id == m.id))
            .collect();
        older.reverse();
        let added = older.len();

        older.append(&mut self.messages);
        self.messages = older;
        debug!(room_id = %self.room_id, page = self.page, added, "Loaded older messages");
        added
    }

    fn merge_latest(&mut self, page: MessagePageResponse) -> usize {
        if self.messages.is_empty() {
            self.has_more = page.has_more;
        }
        self.merge(page.messages)
    }

    /// Insert or replace by id, keeping chronological order
    fn merge(&mut self, incoming: Vec<ChatMessageResponse>) -> usize {
        let mut added = 0;
        for message in incoming {
            match self.messages.iter_mut().find(|m| m.id == message.id) {
                Some(existing) => *existing = message,
                None => {
                    self.messages.push(message);
                    added += 1;
                }
            }
        }
        self.messages
            .sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        added
    }

    fn mark_read_by_sender(&mut self, sender_id: Id) -> usize {
        let mut flipped = 0;
        for m in self.messages.iter_mut().filter(|m| m.sender_id == sender_id && !m.read) {
            m.read = true;
            flipped += 1;
        }
        flipped
    }

    fn mark_read_from_others(&mut self, me: Id) {
        for m in self.messages.iter_mut().filter(|m| m.sender_id != me) {
            m.read = true;
        }
    }
}
