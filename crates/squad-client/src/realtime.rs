//! Realtime gateway connection
//!
//! Connects to `/gateway`, identifies with the access token, keeps the
//! heartbeat going and turns dispatch frames into [`RealtimeEvent`]s.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use squad_core::{DomainEvent, Id};
use squad_service::dto::ProfileResponse;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const OP_DISPATCH: u8 = 0;
const OP_HEARTBEAT: u8 = 1;
const OP_IDENTIFY: u8 = 2;
const OP_HELLO: u8 = 10;
const OP_HEARTBEAT_ACK: u8 = 11;

const EVENT_BUFFER: usize = 256;

/// Wire frame `{op, t, s, d}`
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Frame {
    op: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    t: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    s: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    d: Option<Value>,
}

impl Frame {
    fn identify(token: &str) -> Self {
        Self {
            op: OP_IDENTIFY,
            t: None,
            s: None,
            d: Some(json!({ "token": token })),
        }
    }

    fn heartbeat(last_seq: Option<u64>) -> Self {
        Self {
            op: OP_HEARTBEAT,
            t: None,
            s: None,
            d: last_seq.map(Value::from),
        }
    }

    fn to_message(&self) -> ClientResult<Message> {
        Ok(Message::Text(serde_json::to_string(self)?))
    }
}

/// Payload of the READY dispatch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadyPayload {
    pub v: u8,
    pub session_id: String,
    pub user_id: Id,
    /// `None` until sign-up is complete
    pub profile: Option<ProfileResponse>,
    pub unread_notifications: i64,
    pub unread_messages: i64,
}

/// Something the gateway told us
#[derive(Debug, Clone)]
pub enum RealtimeEvent {
    Ready(ReadyPayload),
    Domain(DomainEvent),
    /// Dispatch this client does not know how to decode
    Unknown { event_type: String, data: Value },
    /// The server closed the connection
    Closed { code: Option<u16>, reason: String },
}

impl RealtimeEvent {
    /// Decode a dispatch by its event name
    pub fn decode(event_type: &str, data: Value) -> Self {
        if event_type == "READY" {
            match serde_json::from_value(data.clone()) {
                Ok(ready) => return Self::Ready(ready),
                Err(e) => warn!(error = %e, "Malformed READY payload"),
            }
        } else if let Value::Object(mut map) = data.clone() {
            // Domain event payloads are sent without their tag
            map.insert("type".to_string(), Value::String(event_type.to_string()));
            if let Ok(event) = serde_json::from_value::<DomainEvent>(Value::Object(map)) {
                return Self::Domain(event);
            }
        }

        Self::Unknown {
            event_type: event_type.to_string(),
            data,
        }
    }

    pub fn event_type(&self) -> &str {
        match self {
            Self::Ready(_) => "READY",
            Self::Domain(event) => event.event_type(),
            Self::Unknown { event_type, .. } => event_type,
            Self::Closed { .. } => "CLOSED",
        }
    }
}

/// Live gateway connection
pub struct RealtimeConnection {
    events: mpsc::Receiver<RealtimeEvent>,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
    heartbeat_interval: Duration,
}

impl RealtimeConnection {
    /// Connect, wait for Hello and identify with `token`.
    ///
    /// The handshake is bounded by the configured request timeout.
    pub async fn connect(config: &ClientConfig, token: &str) -> ClientResult<Self> {
        let timeout_ms = config.timeout.as_millis() as u64;
        let handshake = handshake(&config.gateway_url, token);
        let (ws, heartbeat_interval) = tokio::time::timeout(config.timeout, handshake)
            .await
            .map_err(|_| ClientError::Timeout(timeout_ms))??;

        info!(
            url = %config.gateway_url,
            heartbeat_ms = heartbeat_interval.as_millis() as u64,
            "Connected to gateway"
        );

        let (tx, events) = mpsc::channel(EVENT_BUFFER);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(run_session(ws, heartbeat_interval, tx, shutdown_rx));

        Ok(Self {
            events,
            shutdown: Some(shutdown_tx),
            task,
            heartbeat_interval,
        })
    }

    /// Next event; `None` once the connection is gone
    pub async fn next_event(&mut self) -> Option<RealtimeEvent> {
        self.events.recv().await
    }

    pub fn heartbeat_interval(&self) -> Duration {
        self.heartbeat_interval
    }

    /// Send a close frame and wait for the session task to end
    pub async fn close(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        let _ = (&mut self.task).await;
    }
}

impl Drop for RealtimeConnection {
    fn drop(&mut self) {
        if self.shutdown.is_some() {
            self.task.abort();
        }
    }
}

async fn handshake(url: &str, token: &str) -> ClientResult<(WsStream, Duration)> {
    let (mut ws, _response) = tokio_tungstenite::connect_async(url).await?;

    let interval = loop {
        match ws.next().await {
            Some(Ok(Message::Text(text))) => {
                let frame: Frame = serde_json::from_str(&text)?;
                if frame.op != OP_HELLO {
                    return Err(ClientError::Gateway(format!(
                        "expected Hello, got op {}",
                        frame.op
                    )));
                }
                let ms = frame
                    .d
                    .as_ref()
                    .and_then(|d| d.get("heartbeat_interval"))
                    .and_then(Value::as_u64)
                    .ok_or_else(|| ClientError::InvalidResponse("Hello without interval".into()))?;
                break Duration::from_millis(ms);
            }
            Some(Ok(Message::Close(frame))) => {
                let reason = frame.map(|f| f.reason.to_string()).unwrap_or_default();
                return Err(ClientError::Gateway(format!("closed before Hello: {reason}")));
            }
            Some(Ok(_)) => continue,
            Some(Err(e)) => return Err(e.into()),
            None => return Err(ClientError::Gateway("stream ended before Hello".into())),
        }
    };

    let token = token.strip_prefix("Bearer ").unwrap_or(token);
    ws.send(Frame::identify(token).to_message()?).await?;
    Ok((ws, interval))
}

async fn run_session(
    ws: WsStream,
    heartbeat_interval: Duration,
    events: mpsc::Sender<RealtimeEvent>,
    mut shutdown: oneshot::Receiver<()>,
) {
    let (mut sink, mut stream) = ws.split();
    let mut last_seq: Option<u64> = None;

    let mut heartbeat = tokio::time::interval(heartbeat_interval);
    heartbeat.tick().await;

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                debug!("Closing gateway connection");
                let _ = sink.close().await;
                return;
            }

            _ = heartbeat.tick() => {
                let sent = match Frame::heartbeat(last_seq).to_message() {
                    Ok(message) => sink.send(message).await.is_ok(),
                    Err(_) => false,
                };
                if !sent {
                    warn!("Heartbeat failed, dropping connection");
                    return;
                }
            }

            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let frame: Frame = match serde_json::from_str(&text) {
                            Ok(frame) => frame,
                            Err(e) => {
                                warn!(error = %e, "Invalid gateway frame");
                                continue;
                            }
                        };
                        match frame.op {
                            OP_DISPATCH => {
                                if frame.s.is_some() {
                                    last_seq = frame.s;
                                }
                                let Some(event_type) = frame.t else { continue };
                                let event = RealtimeEvent::decode(&event_type, frame.d.unwrap_or(Value::Null));
                                if events.send(event).await.is_err() {
                                    let _ = sink.close().await;
                                    return;
                                }
                            }
                            OP_HEARTBEAT_ACK => {}
                            op => debug!(op, "Ignoring gateway frame"),
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(frame))) => {
                        let (code, reason) = match frame {
                            Some(f) => (Some(u16::from(f.code)), f.reason.to_string()),
                            None => (None, String::new()),
                        };
                        info!(?code, %reason, "Gateway closed the connection");
                        let _ = events.send(RealtimeEvent::Closed { code, reason }).await;
                        return;
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "Gateway connection error");
                        let _ = events
                            .send(RealtimeEvent::Closed { code: None, reason: e.to_string() })
                            .await;
                        return;
                    }
                    None => return,
                    _ => {}
                }
            }
        }
    }
}
