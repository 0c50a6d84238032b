//! Order service
//!
//! The order lifecycle: placement, claiming by a pro, completion and
//! cancellation, plus the staff status override. Notifications and
//! realtime events are side effects; their failures never undo the
//! primary write.

use std::collections::HashSet;

use serde_json::json;
use squad_core::events::OrderEvent;
use squad_core::{
    AccountType, DomainError, DomainEvent, Id, Money, NotificationType, Order, OrderDraft,
    OrderQuery, OrderStatus, OrderType, Profile,
};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::dto::{
    AcceptOrderResponse, ChatRoomResponse, CreateOrderRequest, GameResponse, ListOrdersQuery,
    OrderDetailResponse, OrderResponse, ProfileSummary, UpdateOrderStatusRequest,
};

use super::access::{can_complete_order, can_view_order, AccessService};
use super::chat::ChatService;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::game::GameService;
use super::notification::NotificationService;

/// Order service
pub struct OrderService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> OrderService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Place an order as the caller.
    ///
    /// Unknown game names are added to the catalog. A direct booking
    /// notifies the booked pro; a quick match is broadcast to every pro.
    #[instrument(skip(self, request))]
    pub async fn create_order(
        &self,
        customer_id: Id,
        request: CreateOrderRequest,
    ) -> ServiceResult<OrderResponse> {
        request.validate()?;
        AccessService::new(self.ctx).profile(customer_id).await?;

        let pro_id = match request.pro_id.as_deref() {
            Some(raw) => Some(self.bookable_pro(raw).await?),
            None => None,
        };
        let order_type = request
            .order_type
            .as_deref()
            .map(|raw| {
                OrderType::parse(raw)
                    .ok_or_else(|| ServiceError::validation(format!("unknown order type '{raw}'")))
            })
            .transpose()?;

        let game = GameService::new(self.ctx).resolve(&request.game).await?;

        let order = Order::place(OrderDraft {
            customer_id,
            pro_id,
            game_id: game.id,
            order_type,
            game_count: request.game_count,
            price_per_game: Money::from_cents(request.price_per_game_cents),
            discord_username: request.discord_username,
            notes: request.notes,
        })?;

        self.ctx.order_repo().create(&order).await?;

        info!(
            order_id = %order.id,
            order_number = %order.order_number,
            customer_id = %customer_id,
            order_type = order.order_type.as_str(),
            total_cents = order.total_price.cents(),
            "Order created"
        );

        self.notify_created(&order, &game.name).await;
        self.ctx
            .publish(DomainEvent::OrderCreated(OrderEvent::from(&order)))
            .await;

        Ok(OrderResponse::from(order))
    }

    /// Orders visible to the caller's role: players see what they booked,
    /// pros what they were assigned, staff everything.
    #[instrument(skip(self))]
    pub async fn list_mine(
        &self,
        user_id: Id,
        query: &ListOrdersQuery,
    ) -> ServiceResult<Vec<OrderResponse>> {
        let profile = AccessService::new(self.ctx).profile(user_id).await?;
        let status = query.status.as_deref().map(parse_status).transpose()?;

        let mut order_query = OrderQuery {
            status,
            limit: OrderQuery::DEFAULT_LIMIT,
            ..OrderQuery::default()
        };
        match profile.account_type {
            AccountType::Player => order_query.customer_id = Some(user_id),
            AccountType::Pro => order_query.pro_id = Some(user_id),
            AccountType::Admin | AccountType::HeadAdmin => {}
        }

        let orders = self.ctx.order_repo().list(&order_query).await?;
        Ok(orders.iter().map(OrderResponse::from).collect())
    }

    /// Unclaimed quick matches the pro has not declined
    #[instrument(skip(self))]
    pub async fn list_available(&self, pro_id: Id) -> ServiceResult<Vec<OrderResponse>> {
        AccessService::new(self.ctx).require_pro(pro_id).await?;

        let orders = self.ctx.order_repo().list(&OrderQuery::available()).await?;
        let declined = self.declined_by(pro_id).await;

        Ok(orders
            .iter()
            .filter(|o| o.customer_id != pro_id && !declined.contains(&o.id))
            .map(OrderResponse::from)
            .collect())
    }

    /// Order with participants, game and chat room
    #[instrument(skip(self))]
    pub async fn get_detail(&self, user_id: Id, order_id: Id) -> ServiceResult<OrderDetailResponse> {
        let order = self.load(order_id).await?;
        let profile = AccessService::new(self.ctx).profile(user_id).await?;
        if !can_view_order(&profile, &order) {
            return Err(DomainError::NotParticipant.into());
        }

        let mut ids = vec![order.customer_id];
        ids.extend(order.pro_id);
        let people = self.ctx.profile_repo().find_many(&ids).await?;
        let summary = |id: Id| {
            people
                .iter()
                .find(|p| p.id == id)
                .map(ProfileSummary::from)
        };

        let game = self.ctx.game_repo().find_by_id(order.game_id).await?;
        let room = self.ctx.chat_room_repo().find_by_order(order.id).await?;

        Ok(OrderDetailResponse {
            customer: summary(order.customer_id),
            pro: order.pro_id.and_then(summary),
            game: game.map(GameResponse::from),
            chat_room_id: room.map(|r| r.id),
            order: OrderResponse::from(order),
        })
    }

    /// Claim an order for the calling pro.
    ///
    /// The claim is a conditional update, so among concurrent callers
    /// exactly one wins; the rest get `OrderNotClaimable`. Accepting an
    /// order this pro already holds just returns it with its room.
    #[instrument(skip(self))]
    pub async fn accept(&self, order_id: Id, pro_id: Id) -> ServiceResult<AcceptOrderResponse> {
        AccessService::new(self.ctx).require_pro(pro_id).await?;

        let order = self.load(order_id).await?;
        if order.customer_id == pro_id {
            return Err(ServiceError::validation("cannot accept your own order"));
        }

        let already_ours = order.status == OrderStatus::Accepted && order.pro_id == Some(pro_id);
        if !already_ours && !self.ctx.order_repo().accept(order_id, pro_id).await? {
            info!(order_id = %order_id, pro_id = %pro_id, "Order claim lost");
            return Err(DomainError::OrderNotClaimable.into());
        }

        let order = self.load(order_id).await?;
        let room = ChatService::new(self.ctx)
            .open_for_order(&order, pro_id)
            .await?;

        if !already_ours {
            info!(
                order_id = %order.id,
                order_number = %order.order_number,
                pro_id = %pro_id,
                "Order accepted"
            );

            NotificationService::new(self.ctx)
                .notify(
                    order.customer_id,
                    NotificationType::OrderAccepted,
                    "Order Accepted",
                    &format!("Your order {} has been accepted", order.order_number),
                    json!({
                        "order_id": order.id,
                        "order_number": order.order_number,
                        "chat_room_id": room.id,
                    }),
                )
                .await;
            self.ctx
                .publish(DomainEvent::OrderUpdated(OrderEvent::from(&order)))
                .await;
        }

        Ok(AcceptOrderResponse {
            order: OrderResponse::from(&order),
            chat_room: ChatRoomResponse::from(room),
        })
    }

    /// Hide an order from the pro's available list. The order is unchanged.
    #[instrument(skip(self))]
    pub async fn decline(&self, order_id: Id, pro_id: Id) -> ServiceResult<()> {
        AccessService::new(self.ctx).require_pro(pro_id).await?;
        let order = self.load(order_id).await?;

        self.ctx.declined_store().decline(pro_id, order.id).await?;

        info!(order_id = %order.id, pro_id = %pro_id, "Order declined");
        Ok(())
    }

    /// `accepted -> completed`; closes the chat room
    #[instrument(skip(self))]
    pub async fn complete(&self, order_id: Id, actor_id: Id) -> ServiceResult<OrderResponse> {
        let actor = AccessService::new(self.ctx).profile(actor_id).await?;
        let order = self.load(order_id).await?;
        if !can_complete_order(&actor, &order) {
            return Err(DomainError::NotParticipant.into());
        }

        let order = self
            .transition(order, &[OrderStatus::Accepted], OrderStatus::Completed)
            .await?;

        ChatService::new(self.ctx).close_for_order(order.id).await;

        NotificationService::new(self.ctx)
            .notify(
                order.customer_id,
                NotificationType::OrderCompleted,
                "Order Completed",
                &format!("Your order {} has been completed", order.order_number),
                json!({ "order_id": order.id, "order_number": order.order_number }),
            )
            .await;
        self.ctx
            .publish(DomainEvent::OrderUpdated(OrderEvent::from(&order)))
            .await;

        Ok(OrderResponse::from(order))
    }

    /// `pending | accepted -> cancelled`, by either participant or staff
    #[instrument(skip(self))]
    pub async fn cancel(&self, order_id: Id, actor_id: Id) -> ServiceResult<OrderResponse> {
        let actor = AccessService::new(self.ctx).profile(actor_id).await?;
        let order = self.load(order_id).await?;
        if !can_view_order(&actor, &order) {
            return Err(DomainError::NotParticipant.into());
        }

        let order = self
            .transition(
                order,
                &[OrderStatus::Pending, OrderStatus::Accepted],
                OrderStatus::Cancelled,
            )
            .await?;

        NotificationService::new(self.ctx)
            .notify(
                order.customer_id,
                NotificationType::OrderCancelled,
                "Order Cancelled",
                &format!("Your order {} has been cancelled", order.order_number),
                json!({ "order_id": order.id, "order_number": order.order_number }),
            )
            .await;
        self.ctx
            .publish(DomainEvent::OrderUpdated(OrderEvent::from(&order)))
            .await;

        Ok(OrderResponse::from(order))
    }

    /// Staff override: any status, including backward moves.
    /// The assigned pro is kept.
    #[instrument(skip(self, request))]
    pub async fn revert_status(
        &self,
        order_id: Id,
        staff_id: Id,
        request: UpdateOrderStatusRequest,
    ) -> ServiceResult<OrderResponse> {
        AccessService::new(self.ctx).require_staff(staff_id).await?;
        let status = parse_status(&request.status)?;

        let before = self.load(order_id).await?;
        if !self.ctx.order_repo().set_status(order_id, status).await? {
            return Err(DomainError::OrderNotFound(order_id).into());
        }
        let order = self.load(order_id).await?;

        info!(
            order_id = %order.id,
            staff_id = %staff_id,
            from = %before.status,
            to = %order.status,
            "Order status overridden"
        );
        self.ctx
            .publish(DomainEvent::OrderUpdated(OrderEvent::from(&order)))
            .await;

        Ok(OrderResponse::from(order))
    }

    async fn load(&self, order_id: Id) -> ServiceResult<Order> {
        Ok(self
            .ctx
            .order_repo()
            .find_by_id(order_id)
            .await?
            .ok_or(DomainError::OrderNotFound(order_id))?)
    }

    /// Conditional status move; a stale `from` reports the status the
    /// order actually had.
    async fn transition(
        &self,
        order: Order,
        from: &[OrderStatus],
        to: OrderStatus,
    ) -> ServiceResult<Order> {
        if !self.ctx.order_repo().transition(order.id, from, to).await? {
            let current = self.load(order.id).await?;
            return Err(DomainError::InvalidTransition {
                from: current.status,
                to,
            }
            .into());
        }

        let order = self.load(order.id).await?;
        info!(
            order_id = %order.id,
            order_number = %order.order_number,
            status = %order.status,
            "Order status changed"
        );
        Ok(order)
    }

    /// A profile id that names a pro account
    async fn bookable_pro(&self, raw: &str) -> ServiceResult<Id> {
        let pro_id = Id::parse(raw).map_err(|_| ServiceError::validation("invalid pro_id"))?;
        let pro: Profile = self
            .ctx
            .profile_repo()
            .find_by_id(pro_id)
            .await?
            .ok_or(DomainError::ProfileNotFound(pro_id))?;

        if !pro.is_pro() {
            return Err(ServiceError::validation("booked profile is not a pro"));
        }
        Ok(pro_id)
    }

    async fn declined_by(&self, pro_id: Id) -> HashSet<Id> {
        match self.ctx.declined_store().declined(pro_id).await {
            Ok(ids) => ids,
            Err(e) => {
                warn!(pro_id = %pro_id, error = %e, "Failed to load declined orders");
                HashSet::new()
            }
        }
    }

    async fn notify_created(&self, order: &Order, game_name: &str) {
        let notifications = NotificationService::new(self.ctx);
        let data = json!({ "order_id": order.id, "order_number": order.order_number });

        if let Some(pro_id) = order.pro_id {
            notifications
                .notify(
                    pro_id,
                    NotificationType::NewOrder,
                    "New Order",
                    &format!("You have a new {game_name} order {}", order.order_number),
                    data.clone(),
                )
                .await;
        }

        if order.order_type == OrderType::QuickMatch {
            match self
                .ctx
                .profile_repo()
                .list_ids_by_account_type(AccountType::Pro)
                .await
            {
                Ok(mut pros) => {
                    pros.retain(|&id| id != order.customer_id);
                    notifications
                        .fan_out(
                            &pros,
                            NotificationType::NewQuickMatch,
                            "New Quick Match",
                            &format!("A new {game_name} quick match is available"),
                            &data,
                        )
                        .await;
                }
                Err(e) => warn!(order_id = %order.id, error = %e, "Failed to list pros for fan-out"),
            }
        }

        notifications
            .notify(
                order.customer_id,
                NotificationType::OrderCreated,
                "Order Placed",
                &format!("Your order {} has been placed", order.order_number),
                data,
            )
            .await;
    }
}

/// Parse a status name, accepting the legacy aliases of `accepted`
pub fn parse_status(value: &str) -> ServiceResult<OrderStatus> {
    OrderStatus::parse(value)
        .ok_or_else(|| ServiceError::validation(format!("unknown order status '{value}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("pending").unwrap(), OrderStatus::Pending);
        assert_eq!(parse_status("in_progress").unwrap(), OrderStatus::Accepted);
        assert_eq!(parse_status("shipped").unwrap_err().status_code(), 400);
    }
}
