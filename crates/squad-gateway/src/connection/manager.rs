//! Connection manager
//!
//! Manages all active WebSocket connections using DashMap for thread-safe access.

use super::{Connection, ConnectionState};
use crate::protocol::Outbound;
use dashmap::DashMap;
use squad_core::Id;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Manages all active WebSocket connections
///
/// A user may hold several connections (tabs, devices); every one of them
/// receives the user's events.
pub struct ConnectionManager {
    /// Active connections by session ID
    connections: DashMap<String, Arc<Connection>>,

    /// User ID to session IDs mapping
    user_connections: DashMap<Id, HashSet<String>>,
}

impl ConnectionManager {
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            user_connections: DashMap::new(),
        }
    }

    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a new, not yet identified connection
    pub fn add_connection(&self, session_id: String, sender: mpsc::Sender<Outbound>) -> Arc<Connection> {
        let connection = Connection::new(session_id.clone(), sender);
        self.connections.insert(session_id.clone(), connection.clone());

        tracing::debug!(session_id = %session_id, "Connection added");

        connection
    }

    /// Remove a connection.
    ///
    /// Returns the user id when this was the user's last live connection.
    pub async fn remove_connection(&self, session_id: &str) -> Option<Id> {
        let (_, connection) = self.connections.remove(session_id)?;
        connection.set_state(ConnectionState::Disconnected).await;

        let user_id = connection.user_id().await?;

        if let Some(mut sessions) = self.user_connections.get_mut(&user_id) {
            sessions.remove(session_id);
        }
        let last = self
            .user_connections
            .remove_if(&user_id, |_, sessions| sessions.is_empty())
            .is_some();

        tracing::debug!(session_id = %session_id, user_id = %user_id, last, "Connection removed");

        last.then_some(user_id)
    }

    pub fn get_connection(&self, session_id: &str) -> Option<Arc<Connection>> {
        self.connections.get(session_id).map(|r| r.clone())
    }

    /// Bind a connection to its user.
    ///
    /// Returns `None` for an unknown session, otherwise whether this is the
    /// user's first live connection.
    pub async fn authenticate_connection(&self, session_id: &str, user_id: Id) -> Option<bool> {
        let connection = self.get_connection(session_id)?;
        connection.set_user_id(user_id).await;
        connection.set_state(ConnectionState::Connected).await;

        let mut sessions = self.user_connections.entry(user_id).or_default();
        let first = sessions.is_empty();
        sessions.insert(session_id.to_string());

        tracing::debug!(
            session_id = %session_id,
            user_id = %user_id,
            first,
            "Connection authenticated"
        );

        Some(first)
    }

    /// Get all connections for a user
    pub fn get_user_connections(&self, user_id: Id) -> Vec<Arc<Connection>> {
        self.user_connections
            .get(&user_id)
            .map(|sessions| {
                sessions
                    .iter()
                    .filter_map(|sid| self.get_connection(sid))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Dispatch an event to every connection of a user
    pub async fn send_to_user(&self, user_id: Id, event_type: &str, data: &serde_json::Value) -> usize {
        let mut sent = 0;

        for conn in self.get_user_connections(user_id) {
            if conn.dispatch(event_type, data.clone()).await.is_ok() {
                sent += 1;
            }
        }

        tracing::trace!(user_id = %user_id, event_type, sent, "Event sent to user connections");

        sent
    }

    /// Dispatch an event to every identified connection
    pub async fn broadcast(&self, event_type: &str, data: &serde_json::Value) -> usize {
        // Snapshot first so no shard lock is held across an await
        let connections: Vec<Arc<Connection>> =
            self.connections.iter().map(|r| r.value().clone()).collect();
        let mut sent = 0;

        for conn in connections {
            if conn.state().await != ConnectionState::Connected {
                continue;
            }
            if conn.dispatch(event_type, data.clone()).await.is_ok() {
                sent += 1;
            }
        }

        tracing::debug!(event_type, sent, "Event broadcast to all connections");

        sent
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Number of distinct identified users
    pub fn user_count(&self) -> usize {
        self.user_connections.len()
    }

    pub fn has_session(&self, session_id: &str) -> bool {
        self.connections.contains_key(session_id)
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("connections", &self.connections.len())
            .field("users", &self.user_connections.len())
            .finish()
    }
}
