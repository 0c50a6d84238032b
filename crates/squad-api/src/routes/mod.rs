//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::handlers::{admin, chat, games, health, notifications, orders, profiles, reviews};
use crate::state::AppState;

/// Create the main API router (health probes are mounted separately)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(profile_routes())
        .merge(game_routes())
        .merge(order_routes())
        .merge(chat_routes())
        .merge(notification_routes())
        .merge(admin_routes())
}

fn profile_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/profiles/@me",
            get(profiles::get_current_profile).put(profiles::upsert_current_profile),
        )
        .route(
            "/profiles/@me/games/:slug",
            put(profiles::update_my_game_profile),
        )
        .route("/profiles/:profile_id", get(profiles::get_profile))
        .route("/profiles/:profile_id/games", get(profiles::list_game_profiles))
        .route("/profiles/:profile_id/reviews", get(reviews::list_profile_reviews))
}

fn game_routes() -> Router<AppState> {
    Router::new()
        .route("/games", get(games::list_games))
        .route("/games/:slug", get(games::get_game))
}

fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", post(orders::create_order))
        .route("/orders/@me", get(orders::list_my_orders))
        .route("/orders/available", get(orders::list_available_orders))
        .route("/orders/:order_id", get(orders::get_order))
        .route("/orders/:order_id/accept", post(orders::accept_order))
        .route("/orders/:order_id/decline", post(orders::decline_order))
        .route("/orders/:order_id/complete", post(orders::complete_order))
        .route("/orders/:order_id/cancel", post(orders::cancel_order))
        .route("/orders/:order_id/chat", get(orders::get_order_chat))
        .route("/orders/:order_id/review", post(reviews::create_review))
}

fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/chat", get(chat::list_rooms))
        .route(
            "/chat/:room_id/messages",
            get(chat::get_messages).post(chat::send_message),
        )
        .route("/chat/:room_id/messages/count", get(chat::count_messages))
        .route("/chat/:room_id/read", post(chat::mark_read))
        .route("/chat/:room_id/close", post(chat::close_room))
}

fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(notifications::list_notifications))
        .route("/notifications/unread-count", get(notifications::unread_count))
        .route("/notifications/read-all", post(notifications::mark_all_read))
        .route("/notifications/:notification_id/read", post(notifications::mark_read))
        .route(
            "/notifications/:notification_id",
            delete(notifications::delete_notification),
        )
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/orders", get(admin::list_orders))
        .route(
            "/admin/orders/:order_id/status",
            patch(admin::update_order_status),
        )
        .route("/admin/chat/archive", post(admin::archive_messages))
        .route("/admin/reviews", get(reviews::list_all_reviews))
        .route("/admin/reviews/:review_id", delete(reviews::delete_review))
        .route(
            "/admin/profiles/:profile_id/application",
            post(profiles::review_application),
        )
}
