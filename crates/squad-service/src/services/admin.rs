//! Admin service
//!
//! Staff dashboard queries and maintenance actions.

use chrono::{Duration, Utc};
use squad_core::{Id, OrderQuery};
use tracing::{info, instrument};

use crate::dto::{AdminOrdersQuery, AdminOrdersResponse, ArchiveResponse, OrderResponse};

use super::access::AccessService;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::order::parse_status;

/// Largest page the overview returns
pub const MAX_OVERVIEW_LIMIT: i64 = 200;

/// Admin service
pub struct AdminService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AdminService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// One page of all orders plus per-status totals
    #[instrument(skip(self))]
    pub async fn order_overview(
        &self,
        staff_id: Id,
        query: &AdminOrdersQuery,
    ) -> ServiceResult<AdminOrdersResponse> {
        AccessService::new(self.ctx).require_staff(staff_id).await?;

        let order_query = OrderQuery {
            status: query.status.as_deref().map(parse_status).transpose()?,
            limit: query
                .limit
                .unwrap_or(OrderQuery::DEFAULT_LIMIT)
                .clamp(1, MAX_OVERVIEW_LIMIT),
            offset: query.offset.unwrap_or(0).max(0),
            ..OrderQuery::default()
        };

        let repo = self.ctx.order_repo();
        let orders = repo.list(&order_query).await?;
        let counts = repo.count_by_status().await?;
        let total = counts.iter().map(|c| c.count).sum();

        Ok(AdminOrdersResponse {
            orders: orders.iter().map(OrderResponse::from).collect(),
            counts: counts.into_iter().map(Into::into).collect(),
            total,
        })
    }

    /// Archive closed-room messages older than the retention window
    #[instrument(skip(self))]
    pub async fn archive_messages(&self, staff_id: Id) -> ServiceResult<ArchiveResponse> {
        AccessService::new(self.ctx).require_staff(staff_id).await?;

        let days = self.ctx.marketplace().message_retention_days;
        let cutoff = Duration::try_days(days)
            .and_then(|window| Utc::now().checked_sub_signed(window))
            .ok_or_else(|| {
                ServiceError::internal(format!("retention window of {days} days is out of range"))
            })?;
        let archived = self.ctx.chat_message_repo().archive_before(cutoff).await?;

        info!(archived, retention_days = days, "Archived chat messages");
        Ok(ArchiveResponse { archived, cutoff })
    }
}
