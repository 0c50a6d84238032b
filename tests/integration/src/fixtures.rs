//! Test fixtures and data generators
//!
//! Provides reusable request bodies for integration tests.

use squad_core::Id;
use squad_service::dto::{CreateOrderRequest, UpsertProfileRequest};

/// Username that will not collide with earlier runs
pub fn unique_username(prefix: &str) -> String {
    let id = Id::new().to_string();
    format!("{prefix}{}", &id[..8])
}

pub fn player_profile() -> UpsertProfileRequest {
    UpsertProfileRequest {
        username: unique_username("player"),
        account_type: Some("player".to_string()),
        avatar_url: None,
        bio: None,
        location: None,
    }
}

pub fn pro_profile() -> UpsertProfileRequest {
    UpsertProfileRequest {
        username: unique_username("pro"),
        account_type: Some("pro".to_string()),
        avatar_url: None,
        bio: Some("Radiant duelist".to_string()),
        location: Some("EU West".to_string()),
    }
}

/// Two games of Valorant at $4 each, open to any pro
pub fn quick_match() -> CreateOrderRequest {
    CreateOrderRequest {
        pro_id: None,
        game: "Valorant".to_string(),
        order_type: None,
        game_count: 2,
        price_per_game_cents: 400,
        discord_username: "player#1234".to_string(),
        notes: String::new(),
    }
}

/// Booking bound to one pro
pub fn direct_booking(pro_id: Id) -> CreateOrderRequest {
    CreateOrderRequest {
        pro_id: Some(pro_id.to_string()),
        game: "Apex Legends".to_string(),
        order_type: None,
        game_count: 3,
        price_per_game_cents: 1000,
        discord_username: "player#1234".to_string(),
        notes: "Ranked push".to_string(),
    }
}
