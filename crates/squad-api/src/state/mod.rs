//! Application state
//!
//! Holds the shared state for the Axum application: the service context,
//! the token validator, the raw pools for readiness probes and the config.

use std::sync::Arc;

use squad_cache::RedisPool;
use squad_common::{AppConfig, JwtService};
use squad_db::PgPool;
use squad_service::ServiceContext;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    service_context: Arc<ServiceContext>,
    jwt_service: Arc<JwtService>,
    pool: PgPool,
    redis_pool: RedisPool,
    config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(
        service_context: ServiceContext,
        jwt_service: JwtService,
        pool: PgPool,
        redis_pool: RedisPool,
        config: AppConfig,
    ) -> Self {
        Self {
            service_context: Arc::new(service_context),
            jwt_service: Arc::new(jwt_service),
            pool,
            redis_pool,
            config: Arc::new(config),
        }
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    /// Validator for bearer tokens
    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn redis_pool(&self) -> &RedisPool {
        &self.redis_pool
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &"ServiceContext")
            .field("jwt_service", &self.jwt_service)
            .field("redis_pool", &self.redis_pool)
            .field("config", &"AppConfig")
            .finish()
    }
}
