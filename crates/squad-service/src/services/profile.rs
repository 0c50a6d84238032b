//! Profile service
//!
//! Sign-up completion, self-edit, public lookup and pro application review.

use squad_core::{AccountType, ApplicationStatus, DomainError, Id, Profile};
use tracing::{info, instrument};
use validator::Validate;

use crate::dto::{ProfileResponse, ReviewApplicationRequest, UpsertProfileRequest};

use super::access::AccessService;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Profile service
pub struct ProfileService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ProfileService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// The caller's own profile
    #[instrument(skip(self))]
    pub async fn get_current(&self, user_id: Id) -> ServiceResult<ProfileResponse> {
        let profile = AccessService::new(self.ctx).profile(user_id).await?;
        Ok(ProfileResponse::from(profile))
    }

    /// Create the caller's profile on first call, edit it afterwards.
    /// Returns the profile and whether it was created.
    #[instrument(skip(self, request))]
    pub async fn upsert_current(
        &self,
        user_id: Id,
        request: UpsertProfileRequest,
    ) -> ServiceResult<(ProfileResponse, bool)> {
        request.validate()?;

        let requested_type = request
            .account_type
            .as_deref()
            .map(parse_self_assignable)
            .transpose()?;

        let repo = self.ctx.profile_repo();
        match repo.find_by_id(user_id).await? {
            Some(mut profile) => {
                if requested_type.is_some_and(|t| t != profile.account_type) {
                    return Err(ServiceError::validation("account_type cannot be changed"));
                }

                profile.username = request.username;
                profile.avatar_url = request.avatar_url;
                profile.bio = request.bio;
                profile.location = request.location;
                repo.update(&profile).await?;

                info!(user_id = %user_id, "Profile updated");
                Ok((ProfileResponse::from(profile), false))
            }
            None => {
                let account_type = requested_type.unwrap_or(AccountType::Player);
                let mut profile = Profile::new(user_id, request.username, account_type);
                profile.avatar_url = request.avatar_url;
                profile.bio = request.bio;
                profile.location = request.location;
                repo.create(&profile).await?;

                info!(user_id = %user_id, account_type = account_type.as_str(), "Profile created");
                Ok((ProfileResponse::from(profile), true))
            }
        }
    }

    /// Any profile by id
    #[instrument(skip(self))]
    pub async fn get(&self, profile_id: Id) -> ServiceResult<ProfileResponse> {
        let profile = self
            .ctx
            .profile_repo()
            .find_by_id(profile_id)
            .await?
            .ok_or(DomainError::ProfileNotFound(profile_id))?;
        Ok(ProfileResponse::from(profile))
    }

    /// Staff approve or reject a pro's application
    #[instrument(skip(self, request))]
    pub async fn review_application(
        &self,
        staff_id: Id,
        profile_id: Id,
        request: ReviewApplicationRequest,
    ) -> ServiceResult<ProfileResponse> {
        AccessService::new(self.ctx).require_staff(staff_id).await?;

        let status = match ApplicationStatus::parse(&request.status) {
            Some(s @ (ApplicationStatus::Approved | ApplicationStatus::Rejected)) => s,
            _ => {
                return Err(ServiceError::validation(
                    "status must be 'approved' or 'rejected'",
                ))
            }
        };

        let repo = self.ctx.profile_repo();
        let mut profile = repo
            .find_by_id(profile_id)
            .await?
            .ok_or(DomainError::ProfileNotFound(profile_id))?;

        if !profile.is_pro() {
            return Err(ServiceError::validation("only pro accounts have applications"));
        }

        profile.set_application_status(status);
        repo.update(&profile).await?;

        info!(
            profile_id = %profile_id,
            staff_id = %staff_id,
            status = status.as_str(),
            "Pro application reviewed"
        );
        Ok(ProfileResponse::from(profile))
    }
}

/// Accounts may only sign themselves up as players or pros
fn parse_self_assignable(value: &str) -> ServiceResult<AccountType> {
    match AccountType::parse(value) {
        Some(t @ (AccountType::Player | AccountType::Pro)) => Ok(t),
        Some(_) => Err(ServiceError::forbidden("staff roles cannot be self-assigned")),
        None => Err(ServiceError::validation(format!("unknown account type '{value}'"))),
    }
}
