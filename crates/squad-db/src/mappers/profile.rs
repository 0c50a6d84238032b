//! Profile entity <-> model mapper

use squad_core::entities::{AccountType, ApplicationStatus, Profile};
use squad_core::{DomainError, Id};

use crate::models::ProfileModel;

use super::corrupt_column;

impl TryFrom<ProfileModel> for Profile {
    type Error = DomainError;

    fn try_from(model: ProfileModel) -> Result<Self, Self::Error> {
        let account_type = AccountType::parse(&model.account_type)
            .ok_or_else(|| corrupt_column("account_type", &model.account_type))?;
        let application_status = model
            .application_status
            .as_deref()
            .map(|s| ApplicationStatus::parse(s).ok_or_else(|| corrupt_column("application_status", s)))
            .transpose()?;

        Ok(Profile {
            id: Id::from_uuid(model.id),
            username: model.username,
            account_type,
            application_status,
            is_verified: model.is_verified,
            avatar_url: model.avatar_url,
            bio: model.bio,
            location: model.location,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn model(account_type: &str) -> ProfileModel {
        ProfileModel {
            id: Uuid::new_v4(),
            username: "ace".to_string(),
            account_type: account_type.to_string(),
            application_status: Some("approved".to_string()),
            is_verified: true,
            avatar_url: None,
            bio: None,
            location: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_profile_from_model() {
        let profile = Profile::try_from(model("pro")).unwrap();
        assert_eq!(profile.account_type, AccountType::Pro);
        assert_eq!(profile.application_status, Some(ApplicationStatus::Approved));
        assert!(profile.is_verified);
    }

    #[test]
    fn test_unknown_account_type() {
        let err = Profile::try_from(model("wizard")).unwrap_err();
        assert!(matches!(err, DomainError::DatabaseError(_)));
    }
}
