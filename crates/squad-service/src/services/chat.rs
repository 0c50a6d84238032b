//! Chat service
//!
//! One room per order, opened when a pro claims it. Participants exchange
//! messages until the room is closed; history is paged newest first.

use serde_json::json;
use squad_core::events::{ChatMessageCreatedEvent, ChatMessagesReadEvent, ChatRoomEvent};
use squad_core::{
    ChatMessage, ChatRoom, ChatRoomStatus, DomainError, DomainEvent, Id, MessagePage,
    NotificationType, Order,
};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::dto::{
    ChatMessageResponse, ChatRoomResponse, MessagePageResponse, MessagesQuery, SendMessageRequest,
};

use super::access::{can_view_order, can_view_room, AccessService};
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::notification::NotificationService;

/// Characters of a message quoted in its notification
pub const PREVIEW_CHARS: usize = 50;

/// Chat service
pub struct ChatService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ChatService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create the order's room, or return the one it already has.
    ///
    /// Only a newly created room gets the welcome message and a
    /// `CHAT_ROOM_CREATED` event.
    #[instrument(skip(self, order), fields(order_id = %order.id))]
    pub async fn open_for_order(&self, order: &Order, pro_id: Id) -> ServiceResult<ChatRoom> {
        let candidate = ChatRoom::new(Id::new(), order.id, pro_id, order.customer_id);
        let (room, created) = self.ctx.chat_room_repo().create_if_absent(&candidate).await?;

        if created {
            info!(chat_room_id = %room.id, "Chat room created");

            let welcome = ChatMessage::new(
                Id::new(),
                room.id,
                pro_id,
                self.ctx.marketplace().welcome_message.clone(),
            );
            if let Err(e) = self.ctx.chat_message_repo().create(&welcome).await {
                warn!(chat_room_id = %room.id, error = %e, "Failed to seed welcome message");
            }

            self.ctx
                .publish(DomainEvent::ChatRoomCreated(ChatRoomEvent::from(&room)))
                .await;
        }

        Ok(room)
    }

    /// The room attached to an order, if any
    #[instrument(skip(self))]
    pub async fn room_for_order(
        &self,
        user_id: Id,
        order_id: Id,
    ) -> ServiceResult<Option<ChatRoomResponse>> {
        let order = self
            .ctx
            .order_repo()
            .find_by_id(order_id)
            .await?
            .ok_or(DomainError::OrderNotFound(order_id))?;

        let profile = AccessService::new(self.ctx).profile(user_id).await?;
        if !can_view_order(&profile, &order) {
            return Err(DomainError::NotParticipant.into());
        }

        let room = self.ctx.chat_room_repo().find_by_order(order_id).await?;
        Ok(room.map(ChatRoomResponse::from))
    }

    /// Rooms the caller takes part in
    #[instrument(skip(self))]
    pub async fn list_rooms(&self, user_id: Id) -> ServiceResult<Vec<ChatRoomResponse>> {
        let rooms = self.ctx.chat_room_repo().list_for_user(user_id).await?;
        Ok(rooms.into_iter().map(ChatRoomResponse::from).collect())
    }

    /// One page of history; page 0 is the newest
    #[instrument(skip(self))]
    pub async fn list_messages(
        &self,
        user_id: Id,
        room_id: Id,
        query: &MessagesQuery,
    ) -> ServiceResult<MessagePageResponse> {
        let room = self.viewable_room(user_id, room_id).await?;

        let page = MessagePage {
            page: query.page.unwrap_or(0).max(0),
            page_size: self.ctx.marketplace().chat_page_size,
            include_archived: query.include_archived,
        };

        let repo = self.ctx.chat_message_repo();
        let messages = repo.list_page(room.id, page).await?;
        let total = repo.count(room.id, page.include_archived).await?;

        Ok(MessagePageResponse::new(
            messages.into_iter().map(ChatMessageResponse::from).collect(),
            page.page,
            page.page_size,
            total,
        ))
    }

    /// Message total, used to decide whether older pages exist
    #[instrument(skip(self))]
    pub async fn count_messages(
        &self,
        user_id: Id,
        room_id: Id,
        include_archived: bool,
    ) -> ServiceResult<i64> {
        let room = self.viewable_room(user_id, room_id).await?;
        Ok(self
            .ctx
            .chat_message_repo()
            .count(room.id, include_archived)
            .await?)
    }

    /// Post a message into an active room
    #[instrument(skip(self, request))]
    pub async fn send_message(
        &self,
        sender_id: Id,
        room_id: Id,
        request: SendMessageRequest,
    ) -> ServiceResult<ChatMessageResponse> {
        request.validate()?;

        let max = self.ctx.marketplace().max_message_length;
        if request.message.chars().count() > max {
            return Err(DomainError::ContentTooLong { max }.into());
        }

        let room = self.room(room_id).await?;
        if !room.is_participant(sender_id) {
            return Err(DomainError::NotParticipant.into());
        }
        if room.is_closed() {
            return Err(DomainError::ChatRoomClosed.into());
        }

        let message = ChatMessage::new(Id::new(), room.id, sender_id, request.message);
        if message.is_empty() {
            return Err(DomainError::ValidationError("message must not be blank".to_string()).into());
        }
        self.ctx.chat_message_repo().create(&message).await?;

        if let Err(e) = self.ctx.chat_room_repo().touch(room.id).await {
            warn!(chat_room_id = %room.id, error = %e, "Failed to bump chat room activity");
        }

        info!(message_id = %message.id, chat_room_id = %room.id, "Chat message sent");

        if let Some(recipient) = room.counterpart(sender_id) {
            NotificationService::new(self.ctx)
                .notify(
                    recipient,
                    NotificationType::NewMessage,
                    "New Message",
                    &message.preview(PREVIEW_CHARS),
                    json!({
                        "chat_room_id": room.id,
                        "order_id": room.order_id,
                        "message_id": message.id,
                        "sender_id": sender_id,
                    }),
                )
                .await;
        }

        self.ctx
            .publish(DomainEvent::ChatMessageCreated(ChatMessageCreatedEvent::new(
                &message, &room,
            )))
            .await;

        Ok(ChatMessageResponse::from(message))
    }

    /// Mark everything the other participant sent as read.
    /// The reader's own messages are never touched.
    #[instrument(skip(self))]
    pub async fn mark_read(&self, reader_id: Id, room_id: Id) -> ServiceResult<u64> {
        let room = self.room(room_id).await?;
        let sender_id = room
            .counterpart(reader_id)
            .ok_or(DomainError::NotParticipant)?;

        let updated = self
            .ctx
            .chat_message_repo()
            .mark_read_from(room.id, sender_id)
            .await?;

        if updated > 0 {
            self.ctx
                .publish(DomainEvent::ChatMessagesRead(ChatMessagesReadEvent::new(
                    room.id, reader_id, sender_id, updated,
                )))
                .await;
        }

        Ok(updated)
    }

    /// Close a room; closing twice is a no-op
    #[instrument(skip(self))]
    pub async fn close_room(&self, user_id: Id, room_id: Id) -> ServiceResult<ChatRoomResponse> {
        let mut room = self.viewable_room(user_id, room_id).await?;
        if !room.is_closed() {
            self.close(&mut room).await?;
        }
        Ok(ChatRoomResponse::from(room))
    }

    /// Close the order's room after completion. Failures are logged.
    pub async fn close_for_order(&self, order_id: Id) {
        let result = match self.ctx.chat_room_repo().find_by_order(order_id).await {
            Ok(Some(mut room)) if !room.is_closed() => self.close(&mut room).await,
            Ok(_) => Ok(()),
            Err(e) => Err(e.into()),
        };

        if let Err(e) = result {
            warn!(order_id = %order_id, error = %e, "Failed to close chat room");
        }
    }

    async fn close(&self, room: &mut ChatRoom) -> ServiceResult<()> {
        self.ctx
            .chat_room_repo()
            .set_status(room.id, ChatRoomStatus::Closed)
            .await?;
        room.status = ChatRoomStatus::Closed;

        info!(chat_room_id = %room.id, order_id = %room.order_id, "Chat room closed");
        self.ctx
            .publish(DomainEvent::ChatRoomClosed(ChatRoomEvent::from(&*room)))
            .await;
        Ok(())
    }

    async fn room(&self, room_id: Id) -> ServiceResult<ChatRoom> {
        Ok(self
            .ctx
            .chat_room_repo()
            .find_by_id(room_id)
            .await?
            .ok_or(DomainError::ChatRoomNotFound(room_id))?)
    }

    /// Room the caller may read: a participant, or staff
    async fn viewable_room(&self, user_id: Id, room_id: Id) -> ServiceResult<ChatRoom> {
        let room = self.room(room_id).await?;
        if room.is_participant(user_id) {
            return Ok(room);
        }

        let profile = AccessService::new(self.ctx).profile(user_id).await?;
        if !can_view_room(&profile, &room) {
            return Err(DomainError::NotParticipant.into());
        }
        Ok(room)
    }
}
