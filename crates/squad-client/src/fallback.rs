//! Primary + fallback data fetching
//!
//! A [`FallbackStrategy`] gives the primary source a fixed time budget. When
//! the primary errors or runs out of time, the fallback answers instead and
//! the result records which one did.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use squad_core::Id;
use squad_service::dto::{AdminOrdersQuery, AdminOrdersResponse};
use squad_service::{AdminService, ServiceContext};
use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::error::ClientResult;

/// One way of answering a query
#[async_trait]
pub trait DataSource: Send + Sync {
    type Query: Send + Sync;
    type Output: Send;

    /// Short label used in logs and in [`Fetched`]
    fn name(&self) -> &'static str;

    async fn fetch(&self, query: &Self::Query) -> ClientResult<Self::Output>;
}

/// Which source produced a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchSource {
    Primary,
    Fallback,
}

/// A value together with where it came from
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub value: T,
    pub source: FetchSource,
    pub source_name: &'static str,
}

impl<T> Fetched<T> {
    pub fn used_fallback(&self) -> bool {
        self.source == FetchSource::Fallback
    }
}

/// Try `primary` under `timeout`, then `fallback`
pub struct FallbackStrategy<P, F> {
    primary: P,
    fallback: F,
    timeout: Duration,
}

impl<P, F> FallbackStrategy<P, F>
where
    P: DataSource,
    F: DataSource<Query = P::Query, Output = P::Output>,
{
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

    pub fn new(primary: P, fallback: F) -> Self {
        Self {
            primary,
            fallback,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch from the primary, or from the fallback if the primary fails.
    ///
    /// The fallback is not timed; its error is returned as is.
    pub async fn fetch(&self, query: &P::Query) -> ClientResult<Fetched<P::Output>> {
        match tokio::time::timeout(self.timeout, self.primary.fetch(query)).await {
            Ok(Ok(value)) => {
                return Ok(Fetched {
                    value,
                    source: FetchSource::Primary,
                    source_name: self.primary.name(),
                });
            }
            Ok(Err(e)) => {
                warn!(
                    primary = self.primary.name(),
                    error = %e,
                    "Primary source failed, using fallback"
                );
            }
            Err(_) => {
                warn!(
                    primary = self.primary.name(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Primary source timed out, using fallback"
                );
            }
        }

        let value = self.fallback.fetch(query).await?;
        debug!(fallback = self.fallback.name(), "Fallback source answered");
        Ok(Fetched {
            value,
            source: FetchSource::Fallback,
            source_name: self.fallback.name(),
        })
    }
}

// ============================================================================
// Admin order overview
// ============================================================================

/// Order overview through the HTTP API
pub struct ApiOrdersSource {
    api: ApiClient,
}

impl ApiOrdersSource {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl DataSource for ApiOrdersSource {
    type Query = AdminOrdersQuery;
    type Output = AdminOrdersResponse;

    fn name(&self) -> &'static str {
        "api"
    }

    async fn fetch(&self, query: &AdminOrdersQuery) -> ClientResult<AdminOrdersResponse> {
        self.api.admin_orders(query).await
    }
}

/// Order overview read straight from the repositories
pub struct ServiceOrdersSource {
    ctx: Arc<ServiceContext>,
    staff_id: Id,
}

impl ServiceOrdersSource {
    pub fn new(ctx: Arc<ServiceContext>, staff_id: Id) -> Self {
        Self { ctx, staff_id }
    }
}

#[async_trait]
impl DataSource for ServiceOrdersSource {
    type Query = AdminOrdersQuery;
    type Output = AdminOrdersResponse;

    fn name(&self) -> &'static str {
        "repository"
    }

    async fn fetch(&self, query: &AdminOrdersQuery) -> ClientResult<AdminOrdersResponse> {
        let service = AdminService::new(&self.ctx);
        Ok(service.order_overview(self.staff_id, query).await?)
    }
}

/// Admin order overview: API first, repositories after the timeout
pub type AdminOrdersFetcher = FallbackStrategy<ApiOrdersSource, ServiceOrdersSource>;
