//! Individual WebSocket connection

use crate::protocol::{CloseCode, GatewayMessage, Outbound};
use squad_core::Id;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio::sync::{mpsc, RwLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Waiting for Identify
    Connecting,
    /// Identified; receives dispatches
    Connected,
    Disconnected,
}

/// A single WebSocket connection
pub struct Connection {
    session_id: String,

    /// Authenticated user (None until Identify)
    user_id: RwLock<Option<Id>>,

    state: RwLock<ConnectionState>,

    /// Feeds the socket writer task
    sender: mpsc::Sender<Outbound>,

    /// Last sequence number sent
    sequence: AtomicU64,

    last_heartbeat: RwLock<Instant>,

    created_at: Instant,
}

impl Connection {
    pub fn new(session_id: String, sender: mpsc::Sender<Outbound>) -> Arc<Self> {
        Arc::new(Self {
            session_id,
            user_id: RwLock::new(None),
            state: RwLock::new(ConnectionState::Connecting),
            sender,
            sequence: AtomicU64::new(0),
            last_heartbeat: RwLock::new(Instant::now()),
            created_at: Instant::now(),
        })
    }

    /// Fresh random session id
    pub fn generate_session_id() -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub async fn user_id(&self) -> Option<Id> {
        *self.user_id.read().await
    }

    pub async fn set_user_id(&self, user_id: Id) {
        *self.user_id.write().await = Some(user_id);
    }

    pub async fn state(&self) -> ConnectionState {
        *self.state.read().await
    }

    pub async fn set_state(&self, state: ConnectionState) {
        *self.state.write().await = state;
    }

    pub async fn is_authenticated(&self) -> bool {
        self.user_id.read().await.is_some()
    }

    pub fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current_sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    pub async fn record_heartbeat(&self) {
        *self.last_heartbeat.write().await = Instant::now();
    }

    pub async fn time_since_heartbeat(&self) -> Duration {
        self.last_heartbeat.read().await.elapsed()
    }

    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Queue a frame for the socket writer
    pub async fn send(&self, message: GatewayMessage) -> Result<(), mpsc::error::SendError<Outbound>> {
        self.sender.send(Outbound::Frame(message)).await
    }

    /// Queue a dispatch frame stamped with this connection's next sequence number
    pub async fn dispatch(
        &self,
        event_type: &str,
        data: serde_json::Value,
    ) -> Result<u64, mpsc::error::SendError<Outbound>> {
        let seq = self.next_sequence();
        self.send(GatewayMessage::dispatch(event_type, seq, data)).await?;
        Ok(seq)
    }

    /// Ask the writer to close the socket with `code`
    pub async fn close(&self, code: CloseCode) {
        if self.sender.send(Outbound::Close(code)).await.is_err() {
            tracing::trace!(session_id = %self.session_id, "Writer already gone");
        }
    }

    /// Whether the writer half has gone away
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("session_id", &self.session_id)
            .field("sequence", &self.sequence.load(Ordering::SeqCst))
            .field("age", &self.created_at.elapsed())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::OpCode;

    #[tokio::test]
    async fn test_connection_creation() {
        let (tx, _rx) = mpsc::channel(10);
        let conn = Connection::new("session123".to_string(), tx);

        assert_eq!(conn.session_id(), "session123");
        assert!(conn.user_id().await.is_none());
        assert_eq!(conn.state().await, ConnectionState::Connecting);
        assert!(!conn.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_connection_authentication() {
        let (tx, _rx) = mpsc::channel(10);
        let conn = Connection::new("session123".to_string(), tx);

        let user_id = Id::new();
        conn.set_user_id(user_id).await;
        conn.set_state(ConnectionState::Connected).await;

        assert!(conn.is_authenticated().await);
        assert_eq!(conn.user_id().await, Some(user_id));
    }

    #[tokio::test]
    async fn test_dispatch_stamps_increasing_sequence() {
        let (tx, mut rx) = mpsc::channel(10);
        let conn = Connection::new("s".to_string(), tx);

        conn.dispatch("ORDER_CREATED", serde_json::json!({})).await.unwrap();
        conn.dispatch("ORDER_UPDATED", serde_json::json!({})).await.unwrap();
        assert_eq!(conn.current_sequence(), 2);

        let Some(Outbound::Frame(first)) = rx.recv().await else {
            panic!("expected a frame");
        };
        assert_eq!(first.op, OpCode::Dispatch);
        assert_eq!(first.t.as_deref(), Some("ORDER_CREATED"));
        assert_eq!(first.s, Some(1));

        let Some(Outbound::Frame(second)) = rx.recv().await else {
            panic!("expected a frame");
        };
        assert_eq!(second.s, Some(2));
    }

    #[tokio::test]
    async fn test_close_queues_close_code() {
        let (tx, mut rx) = mpsc::channel(10);
        let conn = Connection::new("s".to_string(), tx);

        conn.close(CloseCode::SessionTimeout).await;
        assert!(matches!(
            rx.recv().await,
            Some(Outbound::Close(CloseCode::SessionTimeout))
        ));
    }

    #[tokio::test]
    async fn test_closed_writer() {
        let (tx, rx) = mpsc::channel(10);
        let conn = Connection::new("s".to_string(), tx);
        drop(rx);

        assert!(conn.is_closed());
        assert!(conn.send(GatewayMessage::heartbeat_ack()).await.is_err());
    }

    #[tokio::test]
    async fn test_heartbeat_resets_timer() {
        let (tx, _rx) = mpsc::channel(10);
        let conn = Connection::new("s".to_string(), tx);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(conn.time_since_heartbeat().await >= Duration::from_millis(20));

        conn.record_heartbeat().await;
        assert!(conn.time_since_heartbeat().await < Duration::from_millis(20));
    }

    #[test]
    fn test_session_ids_are_unique() {
        let a = Connection::generate_session_id();
        let b = Connection::generate_session_id();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }
}
