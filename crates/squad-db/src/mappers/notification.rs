//! Notification entity <-> model mapper

use squad_core::entities::{Notification, NotificationType};
use squad_core::{DomainError, Id};

use crate::models::NotificationModel;

use super::corrupt_column;

impl TryFrom<NotificationModel> for Notification {
    type Error = DomainError;

    fn try_from(model: NotificationModel) -> Result<Self, Self::Error> {
        let notification_type = NotificationType::parse(&model.notification_type)
            .ok_or_else(|| corrupt_column("notification type", &model.notification_type))?;
        Ok(Notification {
            id: Id::from_uuid(model.id),
            user_id: Id::from_uuid(model.user_id),
            notification_type,
            title: model.title,
            message: model.message,
            data: model.data,
            read: model.read,
            created_at: model.created_at,
        })
    }
}
