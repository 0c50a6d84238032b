//! Identify handler (op 2)

use super::{HandlerError, HandlerResult};
use crate::connection::Connection;
use crate::events::{GatewayEventType, ReadyEvent};
use crate::protocol::IdentifyPayload;
use crate::server::GatewayState;
use squad_common::JwtService;
use squad_core::Id;
use squad_service::dto::ProfileResponse;
use squad_service::{NotificationService, ServiceContext};
use std::sync::Arc;

pub struct IdentifyHandler;

impl IdentifyHandler {
    /// Authenticate the connection, subscribe the user's event channel and
    /// reply with READY.
    pub async fn handle(
        state: &GatewayState,
        connection: &Arc<Connection>,
        payload: IdentifyPayload,
    ) -> HandlerResult<()> {
        if connection.is_authenticated().await {
            return Err(HandlerError::AlreadyAuthenticated);
        }

        let user_id = Self::authenticate(state.jwt_service(), &payload)?;
        let session_id = connection.session_id().to_string();
        let ready = Self::build_ready(state.service_context(), user_id, session_id.clone()).await?;

        let first = state
            .connection_manager()
            .authenticate_connection(&session_id, user_id)
            .await
            .ok_or_else(|| HandlerError::Internal("Connection vanished during Identify".to_string()))?;

        if first {
            state
                .event_dispatcher()
                .subscribe_user(user_id)
                .await
                .map_err(|e| HandlerError::Internal(format!("Failed to subscribe user: {e}")))?;
        }

        let data = serde_json::to_value(&ready)
            .map_err(|e| HandlerError::Internal(format!("Failed to encode READY: {e}")))?;
        connection
            .dispatch(GatewayEventType::Ready.as_str(), data)
            .await
            .map_err(|e| HandlerError::Internal(format!("Failed to send READY: {e}")))?;

        tracing::info!(
            session_id = %session_id,
            user_id = %user_id,
            has_profile = ready.profile.is_some(),
            "Client identified"
        );

        Ok(())
    }

    /// Resolve the token to a user id
    pub fn authenticate(jwt: &JwtService, payload: &IdentifyPayload) -> HandlerResult<Id> {
        jwt.validate_access_token(payload.bare_token()).map_err(|e| {
            tracing::debug!(error = %e, "Token validation failed");
            HandlerError::AuthenticationFailed(e.to_string())
        })
    }

    async fn build_ready(ctx: &ServiceContext, user_id: Id, session_id: String) -> HandlerResult<ReadyEvent> {
        let profile = ctx
            .profile_repo()
            .find_by_id(user_id)
            .await?
            .map(ProfileResponse::from);
        let unread_notifications = NotificationService::new(ctx).unread_count(user_id).await?;
        let unread_messages = ctx.chat_message_repo().count_unread_for(user_id).await?;

        Ok(ReadyEvent {
            v: ReadyEvent::VERSION,
            session_id,
            user_id,
            profile,
            unread_notifications,
            unread_messages,
        })
    }
}
