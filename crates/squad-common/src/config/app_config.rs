//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub gateway: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub marketplace: MarketplaceConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
    /// Emit JSON log lines
    #[serde(default)]
    pub log_json: bool,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Server configuration (for both API and Gateway)
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Apply pending migrations on startup
    #[serde(default)]
    pub run_migrations: bool,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "default_redis_max_connections")]
    pub max_connections: u32,
}

/// JWT configuration.
///
/// Tokens are issued by the external identity provider; the backend only
/// validates them.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default)]
    pub issuer: Option<String>,
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Marketplace tunables
#[derive(Debug, Clone, Deserialize)]
pub struct MarketplaceConfig {
    /// Messages per chat history page
    #[serde(default = "default_chat_page_size")]
    pub chat_page_size: i64,
    /// Closed-room messages older than this are archived
    #[serde(default = "default_message_retention_days")]
    pub message_retention_days: i64,
    /// Notifications inserted per statement during quick-match fan-out
    #[serde(default = "default_fanout_batch_size")]
    pub fanout_batch_size: usize,
    /// First message of every new chat room
    #[serde(default = "default_welcome_message")]
    pub welcome_message: String,
    #[serde(default = "default_max_message_length")]
    pub max_message_length: usize,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            chat_page_size: default_chat_page_size(),
            message_retention_days: default_message_retention_days(),
            fanout_batch_size: default_fanout_batch_size(),
            welcome_message: default_welcome_message(),
            max_message_length: default_max_message_length(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "squadup".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_redis_max_connections() -> u32 {
    10
}

fn default_access_token_expiry() -> i64 {
    3600 // 1 hour
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

fn default_chat_page_size() -> i64 {
    50
}

fn default_message_retention_days() -> i64 {
    30
}

fn default_fanout_batch_size() -> usize {
    500
}

fn default_welcome_message() -> String {
    "Chat room created! You can now communicate about your order.".to_string()
}

fn default_max_message_length() -> usize {
    2000
}

/// Parse an optional variable, falling back to `default` when unset
fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        Err(_) => Ok(default),
    }
}

fn required_var(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

fn flag_var(name: &'static str) -> bool {
    env::var(name)
        .map(|s| matches!(s.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let marketplace = MarketplaceConfig {
            chat_page_size: parse_var("CHAT_PAGE_SIZE", default_chat_page_size())?,
            message_retention_days: parse_var(
                "MESSAGE_RETENTION_DAYS",
                default_message_retention_days(),
            )?,
            fanout_batch_size: parse_var("FANOUT_BATCH_SIZE", default_fanout_batch_size())?,
            welcome_message: env::var("CHAT_WELCOME_MESSAGE")
                .unwrap_or_else(|_| default_welcome_message()),
            max_message_length: parse_var("MAX_MESSAGE_LENGTH", default_max_message_length())?,
        };
        marketplace.validate()?;

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env::var("APP_ENV")
                    .ok()
                    .and_then(|s| Environment::parse(&s))
                    .unwrap_or_default(),
                log_json: env::var("LOG_FORMAT").is_ok_and(|s| s.eq_ignore_ascii_case("json")),
            },
            api: ServerConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| default_host()),
                port: parse_var("API_PORT", 8080)?,
            },
            gateway: ServerConfig {
                host: env::var("GATEWAY_HOST").unwrap_or_else(|_| default_host()),
                port: parse_var("GATEWAY_PORT", 8081)?,
            },
            database: DatabaseConfig {
                url: required_var("DATABASE_URL")?,
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS", default_max_connections())?,
                min_connections: parse_var("DATABASE_MIN_CONNECTIONS", default_min_connections())?,
                run_migrations: flag_var("DATABASE_RUN_MIGRATIONS"),
            },
            redis: RedisConfig {
                url: required_var("REDIS_URL")?,
                max_connections: parse_var(
                    "REDIS_MAX_CONNECTIONS",
                    default_redis_max_connections(),
                )?,
            },
            jwt: JwtConfig {
                secret: required_var("JWT_SECRET")?,
                issuer: env::var("JWT_ISSUER").ok().filter(|s| !s.is_empty()),
                access_token_expiry: parse_var(
                    "JWT_ACCESS_TOKEN_EXPIRY",
                    default_access_token_expiry(),
                )?,
            },
            rate_limit: RateLimitConfig {
                requests_per_second: parse_var(
                    "RATE_LIMIT_REQUESTS_PER_SECOND",
                    default_requests_per_second(),
                )?,
                burst: parse_var("RATE_LIMIT_BURST", default_burst())?,
            },
            cors: CorsConfig {
                allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .ok()
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            marketplace,
        })
    }
}

impl MarketplaceConfig {
    /// Largest chat history page a deployment may configure
    pub const MAX_CHAT_PAGE_SIZE: i64 = 100;
    /// Ten years
    pub const MAX_MESSAGE_RETENTION_DAYS: i64 = 3650;

    /// Reject values that would make paging or fan-out meaningless
    ///
    /// # Errors
    /// Returns the first offending setting
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=Self::MAX_CHAT_PAGE_SIZE).contains(&self.chat_page_size) {
            return Err(ConfigError::InvalidValue(
                "CHAT_PAGE_SIZE",
                self.chat_page_size.to_string(),
            ));
        }
        if !(1..=Self::MAX_MESSAGE_RETENTION_DAYS).contains(&self.message_retention_days) {
            return Err(ConfigError::InvalidValue(
                "MESSAGE_RETENTION_DAYS",
                self.message_retention_days.to_string(),
            ));
        }
        if self.fanout_batch_size == 0 {
            return Err(ConfigError::InvalidValue("FANOUT_BATCH_SIZE", "0".to_string()));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_is_production() {
        assert!(!Environment::Development.is_production());
        assert!(!Environment::Staging.is_production());
        assert!(Environment::Production.is_production());
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!(Environment::parse("PRODUCTION"), Some(Environment::Production));
        assert_eq!(Environment::parse("staging"), Some(Environment::Staging));
        assert_eq!(Environment::parse("qa"), None);
    }

    #[test]
    fn test_server_address() {
        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
        };
        assert_eq!(config.address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_marketplace_defaults() {
        let config = MarketplaceConfig::default();
        assert_eq!(config.chat_page_size, 50);
        assert_eq!(config.message_retention_days, 30);
        assert_eq!(config.fanout_batch_size, 500);
        assert!(config.welcome_message.starts_with("Chat room created!"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_marketplace_validation() {
        let config = MarketplaceConfig {
            fanout_batch_size: 0,
            ..MarketplaceConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue("FANOUT_BATCH_SIZE", _))
        ));

        let config = MarketplaceConfig {
            chat_page_size: 0,
            ..MarketplaceConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_marketplace_upper_bounds() {
        let config = MarketplaceConfig {
            chat_page_size: MarketplaceConfig::MAX_CHAT_PAGE_SIZE,
            message_retention_days: MarketplaceConfig::MAX_MESSAGE_RETENTION_DAYS,
            ..MarketplaceConfig::default()
        };
        assert!(config.validate().is_ok());

        let config = MarketplaceConfig {
            chat_page_size: 150,
            ..MarketplaceConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue("CHAT_PAGE_SIZE", v)) if v == "150"
        ));

        let config = MarketplaceConfig {
            message_retention_days: i64::MAX,
            ..MarketplaceConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue("MESSAGE_RETENTION_DAYS", _))
        ));
    }

    #[test]
    fn test_default_values() {
        assert_eq!(default_app_name(), "squadup");
        assert_eq!(default_host(), "127.0.0.1");
        assert_eq!(default_max_connections(), 20);
        assert_eq!(default_access_token_expiry(), 3600);
    }
}
