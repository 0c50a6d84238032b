//! Access service
//!
//! Resolves the caller's profile and checks roles and order/room membership.
//! Roles always come from the profile row, never from the token.

use squad_common::AppError;
use squad_core::{ChatRoom, DomainError, Id, Order, Profile};
use tracing::instrument;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Access control for marketplace operations
pub struct AccessService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AccessService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// The caller's profile; callers without one must finish sign-up first
    #[instrument(skip(self))]
    pub async fn profile(&self, user_id: Id) -> ServiceResult<Profile> {
        self.ctx
            .profile_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(ServiceError::App(AppError::ProfileRequired))
    }

    /// Caller must hold a pro account
    pub async fn require_pro(&self, user_id: Id) -> ServiceResult<Profile> {
        let profile = self.profile(user_id).await?;
        if !profile.is_pro() {
            return Err(DomainError::RoleRequired("pro").into());
        }
        Ok(profile)
    }

    /// Caller must be admin or head admin
    pub async fn require_staff(&self, user_id: Id) -> ServiceResult<Profile> {
        let profile = self.profile(user_id).await?;
        if !profile.is_staff() {
            return Err(DomainError::RoleRequired("admin").into());
        }
        Ok(profile)
    }
}

/// Participants and staff may see an order
pub fn can_view_order(profile: &Profile, order: &Order) -> bool {
    profile.is_staff() || order.is_participant(profile.id)
}

/// Only the assigned pro or staff may complete an order
pub fn can_complete_order(profile: &Profile, order: &Order) -> bool {
    profile.is_staff() || order.pro_id == Some(profile.id)
}

/// Participants and staff may read or close a room; only participants send
pub fn can_view_room(profile: &Profile, room: &ChatRoom) -> bool {
    profile.is_staff() || room.is_participant(profile.id)
}
