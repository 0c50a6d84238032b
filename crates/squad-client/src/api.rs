//! Typed HTTP client for the SquadUp API
//!
//! Every method maps to one route under `/api/v1` and returns the same DTOs
//! the server serializes. Failures carry the server's error code.

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use squad_core::Id;
use squad_service::dto::{
    AcceptOrderResponse, AdminOrdersQuery, AdminOrdersResponse, ArchiveResponse,
    ChatMessageResponse, ChatRoomResponse, CountResponse, CreateOrderRequest, CreateReviewRequest,
    GameProfileResponse, GameResponse, HealthResponse, ListOrdersQuery, MarkReadResponse,
    MessagePageResponse, MessagesQuery, NotificationResponse, NotificationsQuery,
    OrderDetailResponse, OrderResponse, ProfileResponse, ProfileReviewsResponse,
    ReviewApplicationRequest, ReviewResponse, ReviewsQuery, SendMessageRequest,
    UpdateGameProfileRequest, UpdateOrderStatusRequest, UpsertProfileRequest,
};
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Error body rendered by the API: `{"error": {"code", "message"}}`
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// HTTP client for the SquadUp API
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Same client, authenticated with `token`
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =========================================================================
    // Profiles
    // =========================================================================

    /// The caller's profile; fails with `PROFILE_REQUIRED` before sign-up
    pub async fn me(&self) -> ClientResult<ProfileResponse> {
        self.get("/api/v1/profiles/@me").await
    }

    /// Create or edit the caller's profile. The flag is true when it was created.
    pub async fn upsert_me(
        &self,
        request: &UpsertProfileRequest,
    ) -> ClientResult<(ProfileResponse, bool)> {
        let response = self
            .request(Method::PUT, "/api/v1/profiles/@me")
            .json(request)
            .send()
            .await?;
        let created = response.status() == StatusCode::CREATED;
        let profile = handle_response(response).await?;
        Ok((profile, created))
    }

    pub async fn profile(&self, profile_id: Id) -> ClientResult<ProfileResponse> {
        self.get(&format!("/api/v1/profiles/{profile_id}")).await
    }

    /// Admin: approve or reject a pro application
    pub async fn review_application(
        &self,
        profile_id: Id,
        request: &ReviewApplicationRequest,
    ) -> ClientResult<ProfileResponse> {
        self.post(
            &format!("/api/v1/admin/profiles/{profile_id}/application"),
            request,
        )
        .await
    }

    pub async fn game_profiles(&self, profile_id: Id) -> ClientResult<Vec<GameProfileResponse>> {
        self.get(&format!("/api/v1/profiles/{profile_id}/games")).await
    }

    /// Set the caller's rank and hours for one game
    pub async fn update_game_profile(
        &self,
        slug: &str,
        request: &UpdateGameProfileRequest,
    ) -> ClientResult<GameProfileResponse> {
        let response = self
            .request(Method::PUT, &format!("/api/v1/profiles/@me/games/{slug}"))
            .json(request)
            .send()
            .await?;
        handle_response(response).await
    }

    // =========================================================================
    // Reviews
    // =========================================================================

    /// Review the pro of one of the caller's completed orders
    pub async fn create_review(
        &self,
        order_id: Id,
        request: &CreateReviewRequest,
    ) -> ClientResult<ReviewResponse> {
        self.post(&format!("/api/v1/orders/{order_id}/review"), request)
            .await
    }

    pub async fn profile_reviews(&self, profile_id: Id) -> ClientResult<ProfileReviewsResponse> {
        self.get(&format!("/api/v1/profiles/{profile_id}/reviews"))
            .await
    }

    // =========================================================================
    // Games
    // =========================================================================

    pub async fn games(&self) -> ClientResult<Vec<GameResponse>> {
        self.get("/api/v1/games").await
    }

    pub async fn game(&self, slug: &str) -> ClientResult<GameResponse> {
        self.get(&format!("/api/v1/games/{slug}")).await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    pub async fn create_order(&self, request: &CreateOrderRequest) -> ClientResult<OrderResponse> {
        self.post("/api/v1/orders", request).await
    }

    pub async fn my_orders(&self, query: &ListOrdersQuery) -> ClientResult<Vec<OrderResponse>> {
        self.get_query("/api/v1/orders/@me", query).await
    }

    pub async fn available_orders(&self) -> ClientResult<Vec<OrderResponse>> {
        self.get("/api/v1/orders/available").await
    }

    pub async fn order(&self, order_id: Id) -> ClientResult<OrderDetailResponse> {
        self.get(&format!("/api/v1/orders/{order_id}")).await
    }

    /// Claim an order. A lost race fails with a conflict.
    pub async fn accept_order(&self, order_id: Id) -> ClientResult<AcceptOrderResponse> {
        self.post_empty(&format!("/api/v1/orders/{order_id}/accept"))
            .await
    }

    pub async fn decline_order(&self, order_id: Id) -> ClientResult<()> {
        self.send_no_content(Method::POST, &format!("/api/v1/orders/{order_id}/decline"))
            .await
    }

    pub async fn complete_order(&self, order_id: Id) -> ClientResult<OrderResponse> {
        self.post_empty(&format!("/api/v1/orders/{order_id}/complete"))
            .await
    }

    pub async fn cancel_order(&self, order_id: Id) -> ClientResult<OrderResponse> {
        self.post_empty(&format!("/api/v1/orders/{order_id}/cancel"))
            .await
    }

    /// The order's chat room, `None` until a pro has accepted
    pub async fn order_chat(&self, order_id: Id) -> ClientResult<Option<ChatRoomResponse>> {
        self.get(&format!("/api/v1/orders/{order_id}/chat")).await
    }

    // =========================================================================
    // Chat
    // =========================================================================

    pub async fn chat_rooms(&self) -> ClientResult<Vec<ChatRoomResponse>> {
        self.get("/api/v1/chat").await
    }

    pub async fn messages(
        &self,
        room_id: Id,
        query: &MessagesQuery,
    ) -> ClientResult<MessagePageResponse> {
        self.get_query(&format!("/api/v1/chat/{room_id}/messages"), query)
            .await
    }

    pub async fn message_count(&self, room_id: Id) -> ClientResult<i64> {
        let count: CountResponse = self
            .get(&format!("/api/v1/chat/{room_id}/messages/count"))
            .await?;
        Ok(count.count)
    }

    pub async fn send_message(
        &self,
        room_id: Id,
        message: impl Into<String>,
    ) -> ClientResult<ChatMessageResponse> {
        let request = SendMessageRequest {
            message: message.into(),
        };
        self.post(&format!("/api/v1/chat/{room_id}/messages"), &request)
            .await
    }

    /// Mark the other participant's messages in the room as read
    pub async fn mark_messages_read(&self, room_id: Id) -> ClientResult<u64> {
        let response: MarkReadResponse = self
            .post_empty(&format!("/api/v1/chat/{room_id}/read"))
            .await?;
        Ok(response.updated)
    }

    pub async fn close_room(&self, room_id: Id) -> ClientResult<ChatRoomResponse> {
        self.post_empty(&format!("/api/v1/chat/{room_id}/close"))
            .await
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    pub async fn notifications(
        &self,
        query: &NotificationsQuery,
    ) -> ClientResult<Vec<NotificationResponse>> {
        self.get_query("/api/v1/notifications", query).await
    }

    pub async fn unread_count(&self) -> ClientResult<i64> {
        let count: CountResponse = self.get("/api/v1/notifications/unread-count").await?;
        Ok(count.count)
    }

    pub async fn mark_notification_read(&self, notification_id: Id) -> ClientResult<()> {
        self.send_no_content(
            Method::POST,
            &format!("/api/v1/notifications/{notification_id}/read"),
        )
        .await
    }

    pub async fn mark_all_notifications_read(&self) -> ClientResult<u64> {
        let response: MarkReadResponse = self.post_empty("/api/v1/notifications/read-all").await?;
        Ok(response.updated)
    }

    pub async fn delete_notification(&self, notification_id: Id) -> ClientResult<()> {
        self.send_no_content(
            Method::DELETE,
            &format!("/api/v1/notifications/{notification_id}"),
        )
        .await
    }

    // =========================================================================
    // Admin
    // =========================================================================

    pub async fn admin_orders(&self, query: &AdminOrdersQuery) -> ClientResult<AdminOrdersResponse> {
        self.get_query("/api/v1/admin/orders", query).await
    }

    /// Staff override of an order's status
    pub async fn update_order_status(
        &self,
        order_id: Id,
        request: &UpdateOrderStatusRequest,
    ) -> ClientResult<OrderResponse> {
        let response = self
            .request(Method::PATCH, &format!("/api/v1/admin/orders/{order_id}/status"))
            .json(request)
            .send()
            .await?;
        handle_response(response).await
    }

    pub async fn archive_messages(&self) -> ClientResult<ArchiveResponse> {
        self.post_empty("/api/v1/admin/chat/archive").await
    }

    pub async fn admin_reviews(&self, query: &ReviewsQuery) -> ClientResult<Vec<ReviewResponse>> {
        self.get_query("/api/v1/admin/reviews", query).await
    }

    pub async fn delete_review(&self, review_id: Id) -> ClientResult<()> {
        self.send_no_content(Method::DELETE, &format!("/api/v1/admin/reviews/{review_id}"))
            .await
    }

    // =========================================================================
    // Health
    // =========================================================================

    pub async fn health(&self) -> ClientResult<HealthResponse> {
        self.get("/health").await
    }

    // =========================================================================
    // Transport
    // =========================================================================

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "API request");
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.request(Method::GET, path).send().await?;
        handle_response(response).await
    }

    async fn get_query<T, Q>(&self, path: &str, query: &Q) -> ClientResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self.request(Method::GET, path).query(query).send().await?;
        handle_response(response).await
    }

    async fn post<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.request(Method::POST, path).json(body).send().await?;
        handle_response(response).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.request(Method::POST, path).send().await?;
        handle_response(response).await
    }

    async fn send_no_content(&self, method: Method, path: &str) -> ClientResult<()> {
        let response = self.request(method, path).send().await?;
        check_status(response).await.map(drop)
    }
}

async fn check_status(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await?;
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&text) {
        return Err(ClientError::Api {
            status,
            code: envelope.error.code,
            message: envelope.error.message,
        });
    }
    Err(ClientError::from_status(status, text))
}

async fn handle_response<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let response = check_status(response).await?;
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::InvalidResponse(e.to_string()))
}
