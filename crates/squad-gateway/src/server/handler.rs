//! WebSocket handler
//!
//! Runs one upgraded socket: a reader, a writer and a heartbeat watchdog.

use crate::connection::Connection;
use crate::handlers::MessageDispatcher;
use crate::protocol::{CloseCode, GatewayMessage, HelloPayload, Outbound};
use crate::server::GatewayState;
use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval, timeout};

/// Heartbeat interval announced in Hello
pub const HEARTBEAT_INTERVAL_MS: u64 = 45_000;

/// Silence after which the connection is considered dead
const HEARTBEAT_TIMEOUT: Duration = Duration::from_millis(HEARTBEAT_INTERVAL_MS * 2);

/// How long a connection may stay unidentified
const IDENTIFY_TIMEOUT: Duration = Duration::from_millis(HEARTBEAT_INTERVAL_MS);

/// Time allowed for the close frame to reach the client
const CLOSE_FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

/// Channel buffer size for outgoing frames
const MESSAGE_BUFFER_SIZE: usize = 100;

pub async fn gateway_handler(
    State(state): State<GatewayState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(state, socket))
}

async fn handle_socket(state: GatewayState, socket: WebSocket) {
    let session_id = Connection::generate_session_id();
    let (tx, rx) = mpsc::channel::<Outbound>(MESSAGE_BUFFER_SIZE);
    let connection = state
        .connection_manager()
        .add_connection(session_id.clone(), tx);

    tracing::info!(session_id = %session_id, "WebSocket connection established");

    let (mut ws_sink, ws_stream) = socket.split();

    let hello = GatewayMessage::hello(&HelloPayload::with_interval(HEARTBEAT_INTERVAL_MS));
    let sent = match hello.to_json() {
        Ok(json) => ws_sink.send(Message::Text(json)).await.is_ok(),
        Err(_) => false,
    };
    if !sent {
        tracing::warn!(session_id = %session_id, "Failed to send Hello message");
        cleanup_connection(&state, &session_id).await;
        return;
    }

    let mut recv_task = tokio::spawn(read_frames(state.clone(), connection.clone(), ws_stream));
    let mut send_task = tokio::spawn(write_frames(session_id.clone(), ws_sink, rx));
    let mut heartbeat_task = tokio::spawn(watch_heartbeat(connection.clone()));

    let close_code = tokio::select! {
        result = &mut recv_task => result.ok().flatten(),
        result = &mut heartbeat_task => result.ok(),
        _ = &mut send_task => None,
    };

    if let Some(code) = close_code {
        tracing::debug!(session_id = %session_id, close_code = %code, "Closing connection");
        let flushed = timeout(CLOSE_FLUSH_TIMEOUT, async {
            connection.close(code).await;
            let _ = (&mut send_task).await;
        })
        .await;
        if flushed.is_err() {
            tracing::debug!(session_id = %session_id, "Close frame not flushed in time");
        }
    }

    recv_task.abort();
    send_task.abort();
    heartbeat_task.abort();

    cleanup_connection(&state, &session_id).await;
}

/// Read client frames until the socket ends. Returns the close code to
/// send when the client broke the protocol.
async fn read_frames(
    state: GatewayState,
    connection: Arc<Connection>,
    mut ws_stream: futures_util::stream::SplitStream<WebSocket>,
) -> Option<CloseCode> {
    let session_id = connection.session_id().to_string();

    while let Some(msg) = ws_stream.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                if let Err(code) = handle_text_message(&state, &connection, &text).await {
                    return Some(code);
                }
            }
            Ok(Message::Binary(_)) => {
                tracing::debug!(session_id = %session_id, "Binary frames not supported");
                return Some(CloseCode::DecodeError);
            }
            // Pong replies are handled by axum
            Ok(Message::Ping(_) | Message::Pong(_)) => {}
            Ok(Message::Close(_)) => {
                tracing::info!(session_id = %session_id, "Client closed connection");
                return None;
            }
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "WebSocket error");
                return None;
            }
        }
    }
    None
}

/// Forward queued frames to the socket
async fn write_frames(
    session_id: String,
    mut ws_sink: futures_util::stream::SplitSink<WebSocket, Message>,
    mut rx: mpsc::Receiver<Outbound>,
) {
    while let Some(outbound) = rx.recv().await {
        match outbound {
            Outbound::Frame(msg) => {
                let Ok(json) = msg.to_json() else {
                    tracing::warn!(session_id = %session_id, message = %msg, "Failed to encode frame");
                    continue;
                };
                if ws_sink.send(Message::Text(json)).await.is_err() {
                    tracing::warn!(session_id = %session_id, "Failed to send message to WebSocket");
                    break;
                }
            }
            Outbound::Close(code) => {
                let frame = CloseFrame {
                    code: code.as_u16(),
                    reason: code.description().into(),
                };
                if ws_sink.send(Message::Close(Some(frame))).await.is_err() {
                    tracing::debug!(session_id = %session_id, "Peer gone before close frame");
                }
                break;
            }
        }
    }

    let _ = ws_sink.close().await;
}

/// Resolves with a close code once the connection misses its deadlines
async fn watch_heartbeat(connection: Arc<Connection>) -> CloseCode {
    let mut check_interval = interval(Duration::from_millis(HEARTBEAT_INTERVAL_MS / 2));

    loop {
        check_interval.tick().await;

        if !connection.is_authenticated().await && connection.age() > IDENTIFY_TIMEOUT {
            tracing::warn!(session_id = %connection.session_id(), "No Identify received");
            return CloseCode::NotAuthenticated;
        }

        let since = connection.time_since_heartbeat().await;
        if since > HEARTBEAT_TIMEOUT {
            tracing::warn!(
                session_id = %connection.session_id(),
                time_since_ms = since.as_millis(),
                "Connection timed out (no heartbeat)"
            );
            return CloseCode::SessionTimeout;
        }
    }
}

async fn handle_text_message(
    state: &GatewayState,
    connection: &Arc<Connection>,
    text: &str,
) -> Result<(), CloseCode> {
    let message = GatewayMessage::from_json(text).map_err(|e| {
        tracing::debug!(session_id = %connection.session_id(), error = %e, "Failed to parse message");
        CloseCode::DecodeError
    })?;

    tracing::trace!(session_id = %connection.session_id(), op = %message.op, "Received message");

    MessageDispatcher::dispatch(state, connection, message)
        .await
        .map_err(|e| {
            tracing::warn!(session_id = %connection.session_id(), error = %e, "Handler error");
            e.close_code()
        })
}

/// Drop the connection and release the user's channel when it was their last
async fn cleanup_connection(state: &GatewayState, session_id: &str) {
    tracing::info!(session_id = %session_id, "Cleaning up connection");

    if let Some(user_id) = state.connection_manager().remove_connection(session_id).await {
        if let Err(e) = state.event_dispatcher().unsubscribe_user(user_id).await {
            tracing::warn!(user_id = %user_id, error = %e, "Failed to unsubscribe user");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_unidentified_connection_is_closed() {
        let (tx, _rx) = mpsc::channel(4);
        let conn = Connection::new("s".to_string(), tx);

        let code = watch_heartbeat(conn).await;
        assert_eq!(code, CloseCode::NotAuthenticated);
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_connection_times_out() {
        let (tx, _rx) = mpsc::channel(4);
        let conn = Connection::new("s".to_string(), tx);
        conn.set_user_id(squad_core::Id::new()).await;

        let code = watch_heartbeat(conn).await;
        assert_eq!(code, CloseCode::SessionTimeout);
    }
}
