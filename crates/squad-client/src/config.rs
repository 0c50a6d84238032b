//! Client configuration

use std::time::Duration;

/// Where the client talks to and how long it waits
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL (e.g., "http://localhost:8080")
    pub api_url: String,

    /// Gateway WebSocket URL (e.g., "ws://localhost:8081/gateway")
    pub gateway_url: String,

    /// Per-request timeout
    pub timeout: Duration,

    /// Time the primary data source gets before the fallback is used
    pub fallback_timeout: Duration,
}

impl ClientConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
    pub const DEFAULT_FALLBACK_TIMEOUT: Duration = Duration::from_secs(3);

    /// Create a configuration; the gateway URL is derived from the API URL
    pub fn new(api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        let gateway_url = derive_gateway_url(&api_url);
        Self {
            api_url,
            gateway_url,
            timeout: Self::DEFAULT_TIMEOUT,
            fallback_timeout: Self::DEFAULT_FALLBACK_TIMEOUT,
        }
    }

    pub fn with_gateway_url(mut self, url: impl Into<String>) -> Self {
        self.gateway_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_fallback_timeout(mut self, timeout: Duration) -> Self {
        self.fallback_timeout = timeout;
        self
    }
}

fn derive_gateway_url(api_url: &str) -> String {
    let ws = if let Some(rest) = api_url.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = api_url.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        api_url.to_string()
    };
    format!("{ws}/gateway")
}
