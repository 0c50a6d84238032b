//! Chat room and message entity <-> model mapper

use squad_core::entities::{ChatMessage, ChatRoom, ChatRoomStatus};
use squad_core::{DomainError, Id};

use crate::models::{ChatMessageModel, ChatRoomModel};

use super::corrupt_column;

impl TryFrom<ChatRoomModel> for ChatRoom {
    type Error = DomainError;

    fn try_from(model: ChatRoomModel) -> Result<Self, Self::Error> {
        let status = ChatRoomStatus::parse(&model.status)
            .ok_or_else(|| corrupt_column("chat room status", &model.status))?;
        Ok(ChatRoom {
            id: Id::from_uuid(model.id),
            order_id: Id::from_uuid(model.order_id),
            pro_id: Id::from_uuid(model.pro_id),
            customer_id: Id::from_uuid(model.customer_id),
            status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<ChatMessageModel> for ChatMessage {
    fn from(model: ChatMessageModel) -> Self {
        ChatMessage {
            id: Id::from_uuid(model.id),
            chat_room_id: Id::from_uuid(model.chat_room_id),
            sender_id: Id::from_uuid(model.sender_id),
            message: model.message,
            read: model.read,
            archived: model.archived,
            created_at: model.created_at,
        }
    }
}
