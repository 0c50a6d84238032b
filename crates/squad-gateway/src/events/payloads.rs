//! Dispatch payloads produced by the gateway itself

use serde::Serialize;
use squad_core::Id;
use squad_service::dto::ProfileResponse;

/// Payload of the READY dispatch
#[derive(Debug, Clone, Serialize)]
pub struct ReadyEvent {
    /// Gateway protocol version
    pub v: u8,
    pub session_id: String,
    pub user_id: Id,
    /// `None` until the user finishes sign-up
    pub profile: Option<ProfileResponse>,
    pub unread_notifications: i64,
    pub unread_messages: i64,
}

impl ReadyEvent {
    pub const VERSION: u8 = 1;
}
