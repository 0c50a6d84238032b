//! Redis Pub/Sub listener feeding the gateway.
//!
//! One connection per process. The channel set grows and shrinks as users
//! connect and leave, and is replayed in full after every reconnect.

use crate::pubsub::{PubSubChannel, PubSubEvent};
use futures_util::StreamExt;
use redis::Client;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, RwLock};
use tracing::{debug, error, info, trace, warn};

#[derive(Debug, thiserror::Error)]
pub enum SubscriberError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Subscriber has stopped")]
    Stopped,
}

pub type SubscriberResult<T> = Result<T, SubscriberError>;

/// One Pub/Sub delivery
#[derive(Debug, Clone)]
pub struct ReceivedMessage {
    pub channel: PubSubChannel,
    /// `None` when the payload is not a [`PubSubEvent`]
    pub event: Option<PubSubEvent>,
    pub payload: String,
}

impl ReceivedMessage {
    fn decode(channel_name: &str, payload: String) -> Self {
        Self {
            channel: PubSubChannel::parse(channel_name),
            event: serde_json::from_str(&payload).ok(),
            payload,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SubscriberConfig {
    pub redis_url: String,
    /// Deliveries buffered per receiver before it starts lagging
    pub delivery_buffer: usize,
    /// First reconnect delay; doubles on each failure up to the max
    pub reconnect_delay_ms: u64,
    pub max_reconnect_delay_ms: u64,
}

impl SubscriberConfig {
    #[must_use]
    pub fn new(redis_url: impl Into<String>) -> Self {
        Self {
            redis_url: redis_url.into(),
            ..Self::default()
        }
    }

    fn backoff(&self) -> Backoff {
        Backoff {
            initial: Duration::from_millis(self.reconnect_delay_ms),
            max: Duration::from_millis(self.max_reconnect_delay_ms.max(self.reconnect_delay_ms)),
            current: Duration::from_millis(self.reconnect_delay_ms),
        }
    }
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379".to_string(),
            delivery_buffer: 1024,
            reconnect_delay_ms: 500,
            max_reconnect_delay_ms: 30_000,
        }
    }
}

#[derive(Debug)]
struct Backoff {
    initial: Duration,
    max: Duration,
    current: Duration,
}

impl Backoff {
    fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = (self.current * 2).min(self.max);
        delay
    }

    fn reset(&mut self) {
        self.current = self.initial;
    }
}

#[derive(Debug)]
enum Command {
    Subscribe(Vec<String>),
    Unsubscribe(Vec<String>),
    Shutdown,
}

/// Why a connection stopped listening
enum Exit {
    Shutdown,
    StreamEnded,
}

/// Handle to the background listener
pub struct Subscriber {
    channels: Arc<RwLock<HashSet<String>>>,
    deliveries: broadcast::Sender<ReceivedMessage>,
    control: mpsc::Sender<Command>,
}

impl Subscriber {
    /// Start listening on `initial` channels.
    ///
    /// Fails only on a malformed Redis URL; connection errors are retried in
    /// the background.
    pub fn spawn(config: SubscriberConfig, initial: &[PubSubChannel]) -> SubscriberResult<Self> {
        let client = Client::open(config.redis_url.as_str())?;
        let channels: HashSet<String> = initial.iter().map(PubSubChannel::name).collect();
        let channels = Arc::new(RwLock::new(channels));
        let (deliveries, _) = broadcast::channel(config.delivery_buffer.max(1));
        let (control, control_rx) = mpsc::channel(64);

        tokio::spawn(listen(
            client,
            config.backoff(),
            channels.clone(),
            deliveries.clone(),
            control_rx,
        ));

        Ok(Self {
            channels,
            deliveries,
            control,
        })
    }

    pub async fn subscribe(&self, channels: &[PubSubChannel]) -> SubscriberResult<()> {
        self.send(Command::Subscribe(channels.iter().map(PubSubChannel::name).collect()))
            .await
    }

    pub async fn unsubscribe(&self, channels: &[PubSubChannel]) -> SubscriberResult<()> {
        self.send(Command::Unsubscribe(channels.iter().map(PubSubChannel::name).collect()))
            .await
    }

    /// New receiver; it only sees deliveries made after this call
    #[must_use]
    pub fn receiver(&self) -> broadcast::Receiver<ReceivedMessage> {
        self.deliveries.subscribe()
    }

    pub async fn channels(&self) -> Vec<String> {
        let mut names: Vec<String> = self.channels.read().await.iter().cloned().collect();
        names.sort();
        names
    }

    pub async fn shutdown(&self) -> SubscriberResult<()> {
        self.send(Command::Shutdown).await
    }

    async fn send(&self, command: Command) -> SubscriberResult<()> {
        self.control
            .send(command)
            .await
            .map_err(|_| SubscriberError::Stopped)
    }
}

async fn listen(
    client: Client,
    mut backoff: Backoff,
    channels: Arc<RwLock<HashSet<String>>>,
    deliveries: broadcast::Sender<ReceivedMessage>,
    mut control: mpsc::Receiver<Command>,
) {
    loop {
        match run_connection(&client, &mut backoff, &channels, &deliveries, &mut control).await {
            Ok(Exit::Shutdown) => {
                info!("Subscriber stopped");
                return;
            }
            Ok(Exit::StreamEnded) => warn!("Pub/Sub stream ended, reconnecting"),
            Err(e) => error!(error = %e, "Pub/Sub connection failed, reconnecting"),
        }

        let delay = backoff.next_delay();
        debug!(delay_ms = delay.as_millis() as u64, "Waiting before reconnect");
        tokio::time::sleep(delay).await;
    }
}

/// Listen on one connection until it drops or a shutdown arrives.
///
/// The shared set is updated before Redis is told, so a failed
/// (un)subscribe is repaired by the replay on the next connection.
async fn run_connection(
    client: &Client,
    backoff: &mut Backoff,
    channels: &RwLock<HashSet<String>>,
    deliveries: &broadcast::Sender<ReceivedMessage>,
    control: &mut mpsc::Receiver<Command>,
) -> SubscriberResult<Exit> {
    let mut pubsub = client.get_async_pubsub().await?;

    let replay: Vec<String> = channels.read().await.iter().cloned().collect();
    if !replay.is_empty() {
        pubsub.subscribe(&replay).await?;
    }
    backoff.reset();
    info!(channels = replay.len(), "Subscriber connected to Redis");

    loop {
        let command = {
            let mut stream = pubsub.on_message();
            loop {
                tokio::select! {
                    msg = stream.next() => {
                        let Some(msg) = msg else {
                            return Ok(Exit::StreamEnded);
                        };
                        let channel_name = msg.get_channel_name().to_string();
                        let payload: String = match msg.get_payload() {
                            Ok(payload) => payload,
                            Err(e) => {
                                warn!(channel = %channel_name, error = %e, "Dropping unreadable Pub/Sub payload");
                                continue;
                            }
                        };
                        trace!(channel = %channel_name, "Received Pub/Sub message");
                        if deliveries.send(ReceivedMessage::decode(&channel_name, payload)).is_err() {
                            trace!("No receivers for Pub/Sub message");
                        }
                    }
                    command = control.recv() => break command,
                }
            }
        };

        match command {
            Some(Command::Subscribe(names)) => {
                let added: Vec<String> = {
                    let mut set = channels.write().await;
                    names.into_iter().filter(|name| set.insert(name.clone())).collect()
                };
                if !added.is_empty() {
                    pubsub.subscribe(&added).await?;
                    debug!(channels = ?added, "Subscribed");
                }
            }
            Some(Command::Unsubscribe(names)) => {
                let removed: Vec<String> = {
                    let mut set = channels.write().await;
                    names.into_iter().filter(|name| set.remove(name)).collect()
                };
                if !removed.is_empty() {
                    pubsub.unsubscribe(&removed).await?;
                    debug!(channels = ?removed, "Unsubscribed");
                }
            }
            Some(Command::Shutdown) | None => return Ok(Exit::Shutdown),
        }
    }
}
