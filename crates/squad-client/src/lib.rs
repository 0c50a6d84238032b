//! # squad-client
//!
//! Client library for the SquadUp API:
//! - [`ApiClient`]: typed HTTP calls with bearer auth
//! - [`RealtimeConnection`]: gateway events over WebSocket
//! - [`SessionStore`]: profile, notifications, cart and hidden orders
//! - [`ChatFeed`]: paged history of one chat room
//! - [`FallbackStrategy`]: primary data source with a timed fallback

pub mod api;
pub mod cart;
pub mod chat_feed;
pub mod config;
pub mod error;
pub mod fallback;
pub mod realtime;
pub mod session;

pub use api::ApiClient;
pub use cart::{Cart, CartItem};
pub use chat_feed::ChatFeed;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use fallback::{
    AdminOrdersFetcher, ApiOrdersSource, DataSource, FallbackStrategy, FetchSource, Fetched,
    ServiceOrdersSource,
};
pub use realtime::{ReadyPayload, RealtimeConnection, RealtimeEvent};
pub use session::{SessionState, SessionStore};
