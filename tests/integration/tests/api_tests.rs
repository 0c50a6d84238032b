//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Running Redis instance
//! - Environment variables: DATABASE_URL, REDIS_URL, JWT_SECRET
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_json, assert_status, check_test_env, direct_booking, player_profile, pro_profile,
    quick_match, TestServer,
};
use reqwest::StatusCode;
use serde_json::Value;
use squad_client::{ApiClient, ChatFeed, SessionStore};
use squad_core::{
    ChatRoomStatus, Id, NotificationType, OrderRepository, OrderStatus, OrderType,
};
use squad_service::dto::{
    AdminOrdersQuery, CreateReviewRequest, ListOrdersQuery, NotificationsQuery, OrderResponse,
    ReviewsQuery, UpdateGameProfileRequest, UpdateOrderStatusRequest,
};

async fn start() -> TestServer {
    TestServer::start().await.expect("Failed to start server")
}

async fn player(server: &TestServer) -> (Id, ApiClient) {
    server.sign_up(&player_profile()).await.expect("player sign-up failed")
}

async fn pro(server: &TestServer) -> (Id, ApiClient) {
    server.sign_up(&pro_profile()).await.expect("pro sign-up failed")
}

async fn placed_quick_match(api: &ApiClient) -> OrderResponse {
    api.create_order(&quick_match()).await.expect("create order failed")
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env() {
        return;
    }

    let server = start().await;
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env() {
        return;
    }

    let server = start().await;
    let response = server.get("/health/ready").await.expect("Request failed");
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["checks"]["database"], "healthy");
}

// ============================================================================
// Profile Tests
// ============================================================================

#[tokio::test]
async fn test_profile_required_before_sign_up() {
    if !check_test_env() {
        return;
    }

    let server = start().await;
    let token = server.token_for(Id::new()).unwrap();
    let response = server
        .get_auth("/api/v1/profiles/@me", &token)
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(body["error"]["code"], "PROFILE_REQUIRED");
}

#[tokio::test]
async fn test_sign_up_then_edit() {
    if !check_test_env() {
        return;
    }

    let server = start().await;
    let request = pro_profile();
    let (pro_id, api) = server.sign_up(&request).await.unwrap();

    let me = api.me().await.unwrap();
    assert_eq!(me.id, pro_id);
    assert_eq!(me.username, request.username);
    assert!(me.application_status.is_some());

    // account type is fixed after creation
    let mut edit = player_profile();
    edit.bio = Some("Now coaching too".to_string());
    let (edited, created) = api.upsert_me(&edit).await.unwrap();
    assert!(!created);
    assert_eq!(edited.account_type, me.account_type);
    assert_eq!(edited.bio.as_deref(), Some("Now coaching too"));
}

#[tokio::test]
async fn test_missing_token_is_rejected() {
    if !check_test_env() {
        return;
    }

    let server = start().await;
    let response = server.get("/api/v1/orders/@me").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Order Tests
// ============================================================================

#[tokio::test]
async fn test_quick_match_totals() {
    if !check_test_env() {
        return;
    }

    let server = start().await;
    let (customer_id, api) = player(&server).await;

    let order = placed_quick_match(&api).await;
    assert_eq!(order.order_type, OrderType::QuickMatch);
    assert_eq!(order.status, OrderStatus::Pending);
    assert!(order.pro_id.is_none());
    assert_eq!(order.customer_id, customer_id);
    assert_eq!(order.total_price_cents, 800);

    let detail = api.order(order.id).await.unwrap();
    assert_eq!(
        detail.order.total_price_cents,
        detail.order.price_per_game_cents * i64::from(detail.order.game_count)
    );
    assert!(detail.chat_room_id.is_none());
    assert_eq!(detail.game.map(|g| g.name), Some("Valorant".to_string()));
}

#[tokio::test]
async fn test_order_numbers_may_repeat() {
    if !check_test_env() {
        return;
    }

    let server = start().await;
    let (_, customer) = player(&server).await;
    let placed = placed_quick_match(&customer).await;

    let orders = server.order_repository();
    let mut twin = orders.find_by_id(placed.id).await.unwrap().unwrap();
    twin.id = Id::new();
    orders.create(&twin).await.unwrap();

    let stored = orders.find_by_id(twin.id).await.unwrap().unwrap();
    assert_eq!(stored.order_number.as_str(), placed.order_number);

    // the API keeps working with the shared number in the table
    placed_quick_match(&customer).await;
}

#[tokio::test]
async fn test_order_requires_discord_username() {
    if !check_test_env() {
        return;
    }

    let server = start().await;
    let (_, api) = player(&server).await;

    let mut request = quick_match();
    request.discord_username = String::new();
    let err = api.create_order(&request).await.unwrap_err();
    assert_eq!(err.code(), Some("VALIDATION_ERROR"));
}

#[tokio::test]
async fn test_direct_booking_notifies_pro() {
    if !check_test_env() {
        return;
    }

    let server = start().await;
    let (_, customer) = player(&server).await;
    let (pro_id, pro_api) = pro(&server).await;

    let order = customer.create_order(&direct_booking(pro_id)).await.unwrap();
    assert_eq!(order.order_type, OrderType::DirectBooking);
    assert_eq!(order.pro_id, Some(pro_id));

    let notifications = pro_api
        .notifications(&NotificationsQuery::default())
        .await
        .unwrap();
    assert!(notifications.iter().any(|n| {
        n.notification_type == NotificationType::NewOrder
            && n.data["order_id"] == order.id.to_string()
    }));

    // bound orders never show up as available
    let available = pro_api.available_orders().await.unwrap();
    assert!(available.iter().all(|o| o.id != order.id));
}

#[tokio::test]
async fn test_concurrent_accepts_have_one_winner() {
    if !check_test_env() {
        return;
    }

    let server = start().await;
    let (_, customer) = player(&server).await;
    let order = placed_quick_match(&customer).await;

    let mut pros = Vec::new();
    for _ in 0..4 {
        pros.push(pro(&server).await);
    }

    let handles: Vec<_> = pros
        .iter()
        .map(|(_, api)| {
            let api = api.clone();
            let order_id = order.id;
            tokio::spawn(async move { api.accept_order(order_id).await })
        })
        .collect();
    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(handle.await.expect("accept task panicked"));
    }

    let winners: Vec<_> = results.iter().filter(|r| r.is_ok()).collect();
    assert_eq!(winners.len(), 1);
    for result in &results {
        if let Err(e) = result {
            assert!(e.is_conflict(), "unexpected error: {e}");
        }
    }

    let detail = customer.order(order.id).await.unwrap();
    assert_eq!(detail.order.status, OrderStatus::Accepted);
    let winner = detail.order.pro_id.unwrap();
    assert!(pros.iter().any(|(id, _)| *id == winner));
}

#[tokio::test]
async fn test_accept_opens_one_room() {
    if !check_test_env() {
        return;
    }

    let server = start().await;
    let (_, customer) = player(&server).await;
    let (pro_id, pro_api) = pro(&server).await;
    let order = placed_quick_match(&customer).await;

    let first = pro_api.accept_order(order.id).await.unwrap();
    assert_eq!(first.order.pro_id, Some(pro_id));
    assert_eq!(first.chat_room.status, ChatRoomStatus::Active);

    let again = pro_api.accept_order(order.id).await.unwrap();
    assert_eq!(again.chat_room.id, first.chat_room.id);

    let room = customer.order_chat(order.id).await.unwrap().unwrap();
    assert_eq!(room.id, first.chat_room.id);

    // welcome message only once
    let count = customer.message_count(room.id).await.unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_decline_hides_from_available() {
    if !check_test_env() {
        return;
    }

    let server = start().await;
    let (_, customer) = player(&server).await;
    let (_, pro_api) = pro(&server).await;
    let order = placed_quick_match(&customer).await;

    let available = pro_api.available_orders().await.unwrap();
    assert!(available.iter().any(|o| o.id == order.id));

    let session = SessionStore::new();
    session.decline(&pro_api, order.id).await.unwrap();

    let available = pro_api.available_orders().await.unwrap();
    assert!(available.iter().all(|o| o.id != order.id));

    // declining never changes the order
    let detail = customer.order(order.id).await.unwrap();
    assert_eq!(detail.order.status, OrderStatus::Pending);
}

#[tokio::test]
async fn test_complete_closes_room() {
    if !check_test_env() {
        return;
    }

    let server = start().await;
    let (_, customer) = player(&server).await;
    let (_, pro_api) = pro(&server).await;
    let order = placed_quick_match(&customer).await;
    let accepted = pro_api.accept_order(order.id).await.unwrap();

    // customers cannot complete
    let err = customer.complete_order(order.id).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));

    let completed = pro_api.complete_order(order.id).await.unwrap();
    assert_eq!(completed.status, OrderStatus::Completed);
    assert!(completed.completed_at.is_some());

    let room = customer.order_chat(order.id).await.unwrap().unwrap();
    assert_eq!(room.id, accepted.chat_room.id);
    assert_eq!(room.status, ChatRoomStatus::Closed);

    let err = customer
        .send_message(room.id, "one more thing")
        .await
        .unwrap_err();
    assert!(err.is_conflict());

    // completed orders cannot be cancelled
    let err = customer.cancel_order(order.id).await.unwrap_err();
    assert!(err.is_conflict());
}

#[tokio::test]
async fn test_review_after_completion() {
    if !check_test_env() {
        return;
    }

    let server = start().await;
    let (customer_id, customer) = player(&server).await;
    let (pro_id, pro_api) = pro(&server).await;
    let (_, admin) = server.seed_admin().await.unwrap();
    let order = placed_quick_match(&customer).await;
    pro_api.accept_order(order.id).await.unwrap();

    let review = CreateReviewRequest {
        rating: 5,
        comment: Some("Called every rotation".to_string()),
    };

    // not finished yet
    let err = customer.create_review(order.id, &review).await.unwrap_err();
    assert!(err.is_conflict());

    pro_api.complete_order(order.id).await.unwrap();

    let err = pro_api.create_review(order.id, &review).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));

    let created = customer.create_review(order.id, &review).await.unwrap();
    assert_eq!(created.reviewer_id, customer_id);
    assert_eq!(created.reviewee_id, pro_id);

    let err = customer.create_review(order.id, &review).await.unwrap_err();
    assert!(err.is_conflict());

    let listed = customer.profile_reviews(pro_id).await.unwrap();
    assert_eq!(listed.count, 1);
    assert_eq!(listed.average_rating, Some(5.0));

    let all = admin
        .admin_reviews(&ReviewsQuery {
            limit: Some(100),
            offset: None,
        })
        .await
        .unwrap();
    assert!(all.iter().any(|r| r.id == created.id));

    admin.delete_review(created.id).await.unwrap();
    assert_eq!(customer.profile_reviews(pro_id).await.unwrap().count, 0);
}

#[tokio::test]
async fn test_game_profiles() {
    if !check_test_env() {
        return;
    }

    let server = start().await;
    let (pro_id, pro_api) = pro(&server).await;
    let (_, customer) = player(&server).await;
    // ordering a game puts it in the catalog
    placed_quick_match(&customer).await;

    let updated = pro_api
        .update_game_profile(
            "valorant",
            &UpdateGameProfileRequest {
                rank: Some("Radiant".to_string()),
                hours_played: 1200,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.game.slug, "valorant");

    let listed = customer.game_profiles(pro_id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].rank.as_deref(), Some("Radiant"));
    assert_eq!(listed[0].hours_played, 1200);
}

#[tokio::test]
async fn test_cancel_pending_order() {
    if !check_test_env() {
        return;
    }

    let server = start().await;
    let (_, customer) = player(&server).await;
    let (_, stranger) = player(&server).await;
    let order = placed_quick_match(&customer).await;

    let err = stranger.cancel_order(order.id).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));

    let cancelled = customer.cancel_order(order.id).await.unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert!(cancelled.cancelled_at.is_some());

    let mine = customer
        .my_orders(&ListOrdersQuery {
            status: Some("cancelled".to_string()),
        })
        .await
        .unwrap();
    assert!(mine.iter().any(|o| o.id == order.id));
}

// ============================================================================
// Chat Tests
// ============================================================================

#[tokio::test]
async fn test_chat_read_receipts() {
    if !check_test_env() {
        return;
    }

    let server = start().await;
    let (customer_id, customer) = player(&server).await;
    let (pro_id, pro_api) = pro(&server).await;
    let order = placed_quick_match(&customer).await;
    let room = pro_api.accept_order(order.id).await.unwrap().chat_room;

    customer.send_message(room.id, "hey, ready?").await.unwrap();
    pro_api.send_message(room.id, "queueing now").await.unwrap();

    // the pro reads the customer's message; the pro's own stay unread
    let flipped = pro_api.mark_messages_read(room.id).await.unwrap();
    assert_eq!(flipped, 1);

    let mut feed = ChatFeed::open(&customer, &room).await.unwrap();
    let from_customer = feed
        .messages()
        .iter()
        .filter(|m| m.sender_id == customer_id)
        .all(|m| m.read);
    assert!(from_customer);
    let last = feed.messages().last().unwrap();
    assert_eq!(last.sender_id, pro_id);
    assert!(!last.read);

    feed.send(&customer, "gl hf").await.unwrap();
    assert_eq!(feed.messages().last().unwrap().message, "gl hf");
    assert_eq!(customer.message_count(room.id).await.unwrap(), 4);

    // the other participant is told about the message
    let notifications = pro_api
        .notifications(&NotificationsQuery {
            unread_only: true,
            limit: Some(100),
        })
        .await
        .unwrap();
    assert!(notifications
        .iter()
        .any(|n| n.notification_type == NotificationType::NewMessage));
}

#[tokio::test]
async fn test_chat_outsider_is_forbidden() {
    if !check_test_env() {
        return;
    }

    let server = start().await;
    let (_, customer) = player(&server).await;
    let (_, pro_api) = pro(&server).await;
    let (_, outsider) = player(&server).await;
    let order = placed_quick_match(&customer).await;
    let room = pro_api.accept_order(order.id).await.unwrap().chat_room;

    let err = outsider.send_message(room.id, "hi").await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
}

// ============================================================================
// Notification Tests
// ============================================================================

#[tokio::test]
async fn test_notifications_read_and_delete() {
    if !check_test_env() {
        return;
    }

    let server = start().await;
    let (_, customer) = player(&server).await;
    placed_quick_match(&customer).await;
    placed_quick_match(&customer).await;

    let session = SessionStore::new();
    session.init(&customer).await.unwrap();
    let state = session.snapshot();
    assert_eq!(state.notifications.len(), 2);
    assert_eq!(state.unread_count, 2);

    let first = state.notifications[0].id;
    session.mark_notification_read(&customer, first).await.unwrap();
    assert_eq!(customer.unread_count().await.unwrap(), 1);

    session.delete_notification(&customer, first).await.unwrap();
    assert_eq!(session.snapshot().notifications.len(), 1);

    session.mark_all_notifications_read(&customer).await.unwrap();
    assert_eq!(customer.unread_count().await.unwrap(), 0);
    assert_eq!(session.snapshot().unread_count, 0);
}

// ============================================================================
// Admin Tests
// ============================================================================

#[tokio::test]
async fn test_admin_overview_and_revert() {
    if !check_test_env() {
        return;
    }

    let server = start().await;
    let (_, customer) = player(&server).await;
    let (pro_id, pro_api) = pro(&server).await;
    let (_, admin) = server.seed_admin().await.unwrap();

    let order = placed_quick_match(&customer).await;
    pro_api.accept_order(order.id).await.unwrap();
    pro_api.complete_order(order.id).await.unwrap();

    let err = customer
        .admin_orders(&AdminOrdersQuery::default())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));

    let overview = admin
        .admin_orders(&AdminOrdersQuery {
            status: Some("completed".to_string()),
            limit: Some(500),
            offset: None,
        })
        .await
        .unwrap();
    assert!(overview.orders.iter().any(|o| o.id == order.id));
    assert!(overview
        .counts
        .iter()
        .any(|c| c.status == OrderStatus::Completed && c.count >= 1));

    // legacy status names are accepted
    let reverted = admin
        .update_order_status(
            order.id,
            &UpdateOrderStatusRequest {
                status: "in_progress".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(reverted.status, OrderStatus::Accepted);
    assert_eq!(reverted.pro_id, Some(pro_id));

    let archived = admin.archive_messages().await.unwrap();
    assert!(archived.cutoff < chrono::Utc::now());
}
