//! Heartbeat handler (op 1)

use super::{HandlerError, HandlerResult};
use crate::connection::Connection;
use crate::protocol::GatewayMessage;
use std::sync::Arc;

pub struct HeartbeatHandler;

impl HeartbeatHandler {
    /// Reset the connection's heartbeat timer and acknowledge.
    ///
    /// `last_sequence` is the last dispatch sequence the client has seen.
    pub async fn handle(connection: &Arc<Connection>, last_sequence: Option<u64>) -> HandlerResult<()> {
        connection.record_heartbeat().await;

        tracing::trace!(
            session_id = %connection.session_id(),
            client_seq = ?last_sequence,
            server_seq = connection.current_sequence(),
            "Heartbeat received"
        );

        connection
            .send(GatewayMessage::heartbeat_ack())
            .await
            .map_err(|_| HandlerError::Internal("Failed to send heartbeat ACK".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{OpCode, Outbound};
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_heartbeat_is_acked() {
        let (tx, mut rx) = mpsc::channel(4);
        let conn = Connection::new("s".to_string(), tx);

        HeartbeatHandler::handle(&conn, Some(3)).await.unwrap();

        let Some(Outbound::Frame(ack)) = rx.recv().await else {
            panic!("expected an ACK frame");
        };
        assert_eq!(ack.op, OpCode::HeartbeatAck);
    }

    #[tokio::test]
    async fn test_heartbeat_on_closed_writer_fails() {
        let (tx, rx) = mpsc::channel(4);
        let conn = Connection::new("s".to_string(), tx);
        drop(rx);

        assert!(HeartbeatHandler::handle(&conn, None).await.is_err());
    }
}
