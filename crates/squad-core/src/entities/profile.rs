//! Profile entity - a marketplace account (player, pro or staff)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::Id;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    #[default]
    Player,
    Pro,
    Admin,
    HeadAdmin,
}

impl AccountType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Pro => "pro",
            Self::Admin => "admin",
            Self::HeadAdmin => "head_admin",
        }
    }

    /// Parse the stored representation. `customer` is an older name for `player`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "player" | "customer" => Some(Self::Player),
            "pro" => Some(Self::Pro),
            "admin" => Some(Self::Admin),
            "head_admin" => Some(Self::HeadAdmin),
            _ => None,
        }
    }

    /// Admin or head admin
    #[inline]
    #[must_use]
    pub const fn is_staff(self) -> bool {
        matches!(self, Self::Admin | Self::HeadAdmin)
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Review state of a pro application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Profile entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: Id,
    pub username: String,
    pub account_type: AccountType,
    /// Only meaningful for pros
    pub application_status: Option<ApplicationStatus>,
    pub is_verified: bool,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Create a profile for a freshly signed-up account.
    /// Pros start with a pending application.
    #[must_use]
    pub fn new(id: Id, username: String, account_type: AccountType) -> Self {
        let now = Utc::now();
        let application_status =
            (account_type == AccountType::Pro).then_some(ApplicationStatus::Pending);

        Self {
            id,
            username,
            account_type,
            application_status,
            is_verified: false,
            avatar_url: None,
            bio: None,
            location: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_pro(&self) -> bool {
        self.account_type == AccountType::Pro
    }

    #[inline]
    pub fn is_staff(&self) -> bool {
        self.account_type.is_staff()
    }

    /// Approve or reject a pro application
    pub fn set_application_status(&mut self, status: ApplicationStatus) {
        self.application_status = Some(status);
        self.is_verified = status == ApplicationStatus::Approved;
        self.updated_at = Utc::now();
    }
}
