//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers, minting tokens, signing up
//! users and making HTTP requests.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use squad_api::{create_app, create_app_state, AppState};
use squad_client::{ApiClient, ClientConfig};
use squad_common::AppConfig;
use squad_core::traits::ProfileRepository;
use squad_core::{AccountType, Id, Profile};
use squad_db::{PgOrderRepository, PgProfileRepository};
use squad_service::dto::UpsertProfileRequest;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::fixtures::unique_username;

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    state: AppState,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server
    pub async fn start() -> Result<Self> {
        let config = test_config()?;
        Self::start_with_config(config).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = create_app_state(config).await?;
        let app = create_app(state.clone())?;

        // Bind to an ephemeral port
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .ok();
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            addr,
            client,
            state,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Mint an access token for any user id
    pub fn token_for(&self, user_id: Id) -> Result<String> {
        Ok(self.state.jwt_service().generate_access_token(user_id)?)
    }

    /// Typed client authenticated as `user_id`
    pub fn api_for(&self, user_id: Id) -> Result<ApiClient> {
        let config = ClientConfig::new(self.base_url());
        Ok(ApiClient::new(&config)?.with_token(self.token_for(user_id)?))
    }

    /// Sign a fresh user up through the API
    pub async fn sign_up(&self, request: &UpsertProfileRequest) -> Result<(Id, ApiClient)> {
        let user_id = Id::new();
        let api = self.api_for(user_id)?;
        let (profile, created) = api.upsert_me(request).await?;
        anyhow::ensure!(created, "profile for {user_id} already existed");
        Ok((profile.id, api))
    }

    /// Staff accounts cannot be self-assigned, so they are written directly
    pub async fn seed_admin(&self) -> Result<(Id, ApiClient)> {
        let repo = PgProfileRepository::new(self.state.pool().clone());
        let profile = Profile::new(Id::new(), unique_username("admin"), AccountType::Admin);
        repo.create(&profile).await?;
        Ok((profile.id, self.api_for(profile.id)?))
    }

    /// Orders straight from the database, bypassing the service layer
    pub fn order_repository(&self) -> PgOrderRepository {
        PgOrderRepository::new(self.state.pool().clone())
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a GET request with auth token
    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).bearer_auth(token).send().await?)
    }
}

/// Configuration from the environment, with rate limits out of the way
pub fn test_config() -> Result<AppConfig> {
    let mut config =
        AppConfig::from_env().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;
    config.rate_limit.requests_per_second = 1_000;
    config.rate_limit.burst = 1_000;
    Ok(config)
}

/// Helper to check if test environment is available
pub fn check_test_env() -> bool {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("Skipping test: DATABASE_URL not set");
        return false;
    }

    if std::env::var("REDIS_URL").is_err() {
        eprintln!("Skipping test: REDIS_URL not set");
        return false;
    }

    true
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(())
}
