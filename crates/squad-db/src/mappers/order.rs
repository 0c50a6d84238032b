//! Order entity <-> model mapper

use squad_core::entities::{Order, OrderStatus, OrderType};
use squad_core::{DomainError, Id, Money, OrderNumber};
use tracing::warn;

use crate::models::OrderModel;

use super::corrupt_column;

impl TryFrom<OrderModel> for Order {
    type Error = DomainError;

    fn try_from(model: OrderModel) -> Result<Self, Self::Error> {
        let status = OrderStatus::parse(&model.status)
            .ok_or_else(|| corrupt_column("status", &model.status))?;
        if OrderStatus::is_legacy_alias(&model.status) {
            warn!(
                order_id = %model.id,
                stored = %model.status,
                "Order uses a legacy status name, reading it as accepted"
            );
        }
        let order_type = OrderType::parse(&model.order_type)
            .ok_or_else(|| corrupt_column("order_type", &model.order_type))?;

        Ok(Order {
            id: Id::from_uuid(model.id),
            order_number: OrderNumber::from(model.order_number),
            customer_id: Id::from_uuid(model.customer_id),
            pro_id: model.pro_id.map(Id::from_uuid),
            game_id: Id::from_uuid(model.game_id),
            order_type,
            status,
            game_count: model.game_count,
            price_per_game: Money::from_cents(model.price_per_game),
            total_price: Money::from_cents(model.total_price),
            discord_username: model.discord_username,
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
            completed_at: model.completed_at,
            cancelled_at: model.cancelled_at,
        })
    }
}

/// Stored names matching the given statuses, legacy aliases included
pub fn status_names(statuses: &[OrderStatus]) -> Vec<String> {
    let mut names = Vec::with_capacity(statuses.len() + OrderStatus::LEGACY_ALIASES.len());
    for status in statuses {
        names.push(status.as_str().to_string());
        if *status == OrderStatus::Accepted {
            names.extend(OrderStatus::LEGACY_ALIASES.iter().map(|s| (*s).to_string()));
        }
    }
    names
}

/// Optional status filter as a bindable text array
pub fn status_filter(status: Option<OrderStatus>) -> Option<Vec<String>> {
    status.map(|s| status_names(&[s]))
}
