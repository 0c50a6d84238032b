//! Pub/Sub channel definitions.
//!
//! Defines the channel naming conventions for Redis Pub/Sub.

use squad_core::Id;

/// Namespace shared by every channel
pub const CHANNEL_NAMESPACE: &str = "squadup:";
/// Channel prefix for user-specific events
pub const USER_CHANNEL_PREFIX: &str = "squadup:user:";
/// Channel for broadcast events (all connected clients)
pub const BROADCAST_CHANNEL: &str = "squadup:broadcast";

/// Pub/Sub channel types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PubSubChannel {
    /// Events for a specific user (all their connections)
    User(Id),
    /// Broadcast to all connected clients
    Broadcast,
    /// Custom channel name
    Custom(String),
}

impl PubSubChannel {
    /// Create a user channel
    #[must_use]
    pub fn user(user_id: Id) -> Self {
        Self::User(user_id)
    }

    /// Create a broadcast channel
    #[must_use]
    pub fn broadcast() -> Self {
        Self::Broadcast
    }

    /// Create a custom channel
    #[must_use]
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }

    /// Pattern matching every user channel (for `PSUBSCRIBE`)
    #[must_use]
    pub fn all_users_pattern() -> String {
        format!("{USER_CHANNEL_PREFIX}*")
    }

    /// Get the Redis channel name
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::User(id) => format!("{USER_CHANNEL_PREFIX}{id}"),
            Self::Broadcast => BROADCAST_CHANNEL.to_string(),
            Self::Custom(name) => name.clone(),
        }
    }

    /// Parse a channel name back to a `PubSubChannel`
    #[must_use]
    pub fn parse(name: &str) -> Self {
        if name == BROADCAST_CHANNEL {
            return Self::Broadcast;
        }

        if let Some(id_str) = name.strip_prefix(USER_CHANNEL_PREFIX) {
            if let Ok(id) = Id::parse(id_str) {
                return Self::User(id);
            }
        }

        Self::Custom(name.to_string())
    }
}

impl std::fmt::Display for PubSubChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_names() {
        let user_id = Id::parse("7a0c7f46-1f0e-4a8c-b7a4-1f6a0d3c9e21").unwrap();

        assert_eq!(
            PubSubChannel::user(user_id).name(),
            "squadup:user:7a0c7f46-1f0e-4a8c-b7a4-1f6a0d3c9e21"
        );
        assert_eq!(PubSubChannel::broadcast().name(), "squadup:broadcast");
        assert_eq!(PubSubChannel::custom("test").name(), "test");
        assert_eq!(PubSubChannel::all_users_pattern(), "squadup:user:*");
    }

    #[test]
    fn test_channel_parse() {
        let user_id = Id::new();
        let name = PubSubChannel::user(user_id).name();
        assert_eq!(PubSubChannel::parse(&name), PubSubChannel::User(user_id));

        assert_eq!(PubSubChannel::parse("squadup:broadcast"), PubSubChannel::Broadcast);

        let custom = PubSubChannel::parse("squadup:user:not-a-uuid");
        assert_eq!(
            custom,
            PubSubChannel::Custom("squadup:user:not-a-uuid".to_string())
        );
    }
}
