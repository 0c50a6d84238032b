//! Notification service
//!
//! Creates notifications as side effects of order and chat activity, fans
//! quick matches out to every pro, and serves the recipient's inbox.

use squad_core::events::{NotificationCreatedEvent, NotificationDeletedEvent, NotificationsReadEvent};
use squad_core::{DomainError, DomainEvent, Id, Notification, NotificationType};
use tracing::{info, instrument, warn};

use crate::dto::{NotificationResponse, NotificationsQuery};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Default inbox size
pub const DEFAULT_NOTIFICATION_LIMIT: i64 = 50;

/// Notification service
pub struct NotificationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> NotificationService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Insert one notification and push it to the recipient
    #[instrument(skip(self, title, message, data))]
    pub async fn create(
        &self,
        user_id: Id,
        notification_type: NotificationType,
        title: &str,
        message: &str,
        data: serde_json::Value,
    ) -> ServiceResult<NotificationResponse> {
        let notification = Notification::new(user_id, notification_type, title, message, data)?;
        self.ctx.notification_repo().create(&notification).await?;

        self.ctx
            .publish(DomainEvent::NotificationCreated(NotificationCreatedEvent::from(
                &notification,
            )))
            .await;

        Ok(NotificationResponse::from(notification))
    }

    /// Side-effect variant of [`create`](Self::create): failures are logged
    /// and never reach the caller.
    pub async fn notify(
        &self,
        user_id: Id,
        notification_type: NotificationType,
        title: &str,
        message: &str,
        data: serde_json::Value,
    ) {
        if let Err(e) = self
            .create(user_id, notification_type, title, message, data)
            .await
        {
            warn!(
                user_id = %user_id,
                notification_type = notification_type.as_str(),
                error = %e,
                "Failed to create notification"
            );
        }
    }

    /// Send the same notification to many users in bounded batches.
    ///
    /// Each batch is one insert; a failed batch is logged and skipped.
    /// Returns how many notifications were stored.
    #[instrument(skip(self, user_ids, title, message, data), fields(recipients = user_ids.len()))]
    pub async fn fan_out(
        &self,
        user_ids: &[Id],
        notification_type: NotificationType,
        title: &str,
        message: &str,
        data: &serde_json::Value,
    ) -> u64 {
        let batch_size = self.ctx.marketplace().fanout_batch_size.max(1);
        let mut stored = 0;

        for chunk in user_ids.chunks(batch_size) {
            let batch: Vec<Notification> = chunk
                .iter()
                .filter_map(|&user_id| {
                    Notification::new(user_id, notification_type, title, message, data.clone()).ok()
                })
                .collect();

            match self.ctx.notification_repo().create_many(&batch).await {
                Ok(count) => {
                    stored += count;
                    for notification in &batch {
                        self.ctx
                            .publish(DomainEvent::NotificationCreated(
                                NotificationCreatedEvent::from(notification),
                            ))
                            .await;
                    }
                }
                Err(e) => {
                    warn!(batch = batch.len(), error = %e, "Failed to store notification batch");
                }
            }
        }

        info!(stored, "Fan-out complete");
        stored
    }

    /// The caller's notifications, newest first
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        user_id: Id,
        query: &NotificationsQuery,
    ) -> ServiceResult<Vec<NotificationResponse>> {
        let limit = query.limit.unwrap_or(DEFAULT_NOTIFICATION_LIMIT);
        let notifications = self
            .ctx
            .notification_repo()
            .list_for_user(user_id, query.unread_only, limit)
            .await?;

        Ok(notifications
            .into_iter()
            .map(NotificationResponse::from)
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn unread_count(&self, user_id: Id) -> ServiceResult<i64> {
        Ok(self.ctx.notification_repo().count_unread(user_id).await?)
    }

    /// Mark one of the caller's notifications read
    #[instrument(skip(self))]
    pub async fn mark_read(&self, user_id: Id, notification_id: Id) -> ServiceResult<()> {
        if !self
            .ctx
            .notification_repo()
            .mark_read(notification_id, user_id)
            .await?
        {
            return Err(DomainError::NotificationNotFound(notification_id).into());
        }

        self.ctx
            .publish(DomainEvent::NotificationsRead(NotificationsReadEvent::new(
                user_id,
                Some(notification_id),
            )))
            .await;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn mark_all_read(&self, user_id: Id) -> ServiceResult<u64> {
        let updated = self.ctx.notification_repo().mark_all_read(user_id).await?;

        if updated > 0 {
            self.ctx
                .publish(DomainEvent::NotificationsRead(NotificationsReadEvent::new(
                    user_id, None,
                )))
                .await;
        }
        Ok(updated)
    }

    /// Delete one of the caller's notifications
    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: Id, notification_id: Id) -> ServiceResult<()> {
        if !self
            .ctx
            .notification_repo()
            .delete(notification_id, user_id)
            .await?
        {
            return Err(DomainError::NotificationNotFound(notification_id).into());
        }

        info!(notification_id = %notification_id, "Notification deleted");
        self.ctx
            .publish(DomainEvent::NotificationDeleted(NotificationDeletedEvent::new(
                user_id,
                notification_id,
            )))
            .await;
        Ok(())
    }
}
