//! Gateway server setup
//!
//! Provides the WebSocket route, state wiring and the server runner.

mod handler;
mod state;

pub use handler::{gateway_handler, HEARTBEAT_INTERVAL_MS};
pub use state::GatewayState;

use crate::broadcast::EventDispatcher;
use crate::connection::ConnectionManager;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use squad_cache::{RedisPool, SubscriberConfig};
use squad_common::{AppConfig, AppError, JwtService};
use squad_db::{create_pool, PoolConfig};
use squad_service::ServiceContext;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub fn create_router() -> Router<GatewayState> {
    Router::new()
        .route("/gateway", get(gateway_handler))
        .route("/health", get(health_check))
}

#[derive(Debug, Serialize)]
pub struct GatewayHealth {
    pub status: &'static str,
    pub connections: usize,
    pub users: usize,
    pub dispatcher_running: bool,
}

async fn health_check(State(state): State<GatewayState>) -> Json<GatewayHealth> {
    let dispatcher_running = state.event_dispatcher().is_running();
    Json(GatewayHealth {
        status: if dispatcher_running { "ok" } else { "degraded" },
        connections: state.connection_manager().connection_count(),
        users: state.connection_manager().user_count(),
        dispatcher_running,
    })
}

pub fn create_app(state: GatewayState) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Initialize all dependencies and create `GatewayState`
pub async fn create_gateway_state(config: &AppConfig) -> Result<GatewayState, AppError> {
    tracing::info!("Connecting to PostgreSQL...");
    let db_config = PoolConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        min_connections: config.database.min_connections,
        ..PoolConfig::default()
    };
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    tracing::info!("PostgreSQL connection established");

    let redis_pool =
        RedisPool::from_config(&config.redis).map_err(|e| AppError::Cache(e.to_string()))?;

    let mut jwt_service = JwtService::new(&config.jwt.secret, config.jwt.access_token_expiry);
    if let Some(issuer) = &config.jwt.issuer {
        jwt_service = jwt_service.with_issuer(issuer.clone());
    }

    let subscriber_config = SubscriberConfig::new(redis_pool.url());
    let service_context = ServiceContext::connect(pool, redis_pool, config.marketplace.clone());

    let connection_manager = ConnectionManager::new_shared();

    let event_dispatcher = EventDispatcher::new(subscriber_config, connection_manager.clone())
        .map_err(|e| AppError::Cache(format!("Failed to create event dispatcher: {e}")))?;
    let event_dispatcher = Arc::new(event_dispatcher);
    event_dispatcher.clone().start();

    Ok(GatewayState::new(
        service_context,
        jwt_service,
        connection_manager,
        event_dispatcher,
    ))
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    tracing::info!("Gateway listening on ws://{}/gateway", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete gateway server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .gateway
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid gateway address: {e}")))?;

    let state = create_gateway_state(&config).await?;
    run_server(create_app(state), addr).await
}
