//! In-memory shopping cart
//!
//! Quick matches for the same game collapse into one line; pro bookings
//! collapse by item id. Totals are in cents with no service fee.

use serde::{Deserialize, Serialize};
use squad_core::Id;
use squad_service::dto::CreateOrderRequest;

/// One cart line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Caller-chosen line id
    pub id: String,
    pub game: String,
    /// `None` for a quick match
    pub pro_id: Option<Id>,
    pub pro_name: Option<String>,
    pub price_per_game_cents: i64,
    pub game_count: i32,
}

impl CartItem {
    pub fn quick_match(game: impl Into<String>, price_per_game_cents: i64, game_count: i32) -> Self {
        let game = game.into();
        Self {
            id: format!("quick-match:{game}"),
            game,
            pro_id: None,
            pro_name: None,
            price_per_game_cents,
            game_count,
        }
    }

    pub fn with_pro(
        pro_id: Id,
        pro_name: impl Into<String>,
        game: impl Into<String>,
        price_per_game_cents: i64,
        game_count: i32,
    ) -> Self {
        let game = game.into();
        Self {
            id: format!("pro:{pro_id}:{game}"),
            game,
            pro_id: Some(pro_id),
            pro_name: Some(pro_name.into()),
            price_per_game_cents,
            game_count,
        }
    }

    pub fn is_quick_match(&self) -> bool {
        self.pro_id.is_none()
    }

    pub fn line_total_cents(&self) -> i64 {
        self.price_per_game_cents * i64::from(self.game_count)
    }

    fn merges_with(&self, other: &CartItem) -> bool {
        if self.is_quick_match() && other.is_quick_match() {
            return self.game == other.game;
        }
        self.id == other.id
    }

    /// Order request for this line
    pub fn to_order_request(&self, discord_username: &str, notes: &str) -> CreateOrderRequest {
        CreateOrderRequest {
            pro_id: self.pro_id.map(|id| id.to_string()),
            game: self.game.clone(),
            order_type: None,
            game_count: self.game_count,
            price_per_game_cents: self.price_per_game_cents,
            discord_username: discord_username.to_string(),
            notes: notes.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add a line, or add its games to a matching line.
    /// A count below 1 is taken as 1.
    pub fn add(&mut self, mut item: CartItem) {
        item.game_count = item.game_count.max(1);
        match self.items.iter_mut().find(|i| i.merges_with(&item)) {
            Some(existing) => existing.game_count += item.game_count,
            None => self.items.push(item),
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<CartItem> {
        let index = self.items.iter().position(|i| i.id == id)?;
        Some(self.items.remove(index))
    }

    /// Set a line's game count; counts below 1 are ignored
    pub fn update_quantity(&mut self, id: &str, game_count: i32) -> bool {
        if game_count < 1 {
            return false;
        }
        match self.items.iter_mut().find(|i| i.id == id) {
            Some(item) => {
                item.game_count = game_count;
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Total games across all lines
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i64::from(i.game_count)).sum()
    }

    pub fn subtotal_cents(&self) -> i64 {
        self.items.iter().map(CartItem::line_total_cents).sum()
    }

    pub fn total_cents(&self) -> i64 {
        self.subtotal_cents()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quick_matches_merge_by_game() {
        let mut cart = Cart::default();
        cart.add(CartItem::quick_match("Valorant", 400, 2));
        cart.add(CartItem::quick_match("Valorant", 400, 3));
        cart.add(CartItem::quick_match("Apex Legends", 500, 1));

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.items()[0].game_count, 5);
        assert_eq!(cart.item_count(), 6);
        assert_eq!(cart.total_cents(), 5 * 400 + 500);
    }

    #[test]
    fn test_pro_lines_merge_by_id() {
        let pro = Id::new();
        let mut cart = Cart::default();
        cart.add(CartItem::with_pro(pro, "ace", "Valorant", 1000, 1));
        cart.add(CartItem::with_pro(pro, "ace", "Valorant", 1000, 2));
        cart.add(CartItem::with_pro(Id::new(), "other", "Valorant", 900, 1));
        cart.add(CartItem::quick_match("Valorant", 400, 1));

        assert_eq!(cart.items().len(), 3);
        assert_eq!(cart.items()[0].game_count, 3);
        assert_eq!(cart.subtotal_cents(), 3000 + 900 + 400);
    }

    #[test]
    fn test_zero_count_becomes_one() {
        let mut cart = Cart::default();
        cart.add(CartItem::quick_match("Valorant", 400, 0));
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_update_quantity() {
        let mut cart = Cart::default();
        let item = CartItem::quick_match("Valorant", 400, 2);
        let id = item.id.clone();
        cart.add(item);

        assert!(!cart.update_quantity(&id, 0));
        assert_eq!(cart.item_count(), 2);
        assert!(cart.update_quantity(&id, 4));
        assert_eq!(cart.total_cents(), 1600);
        assert!(!cart.update_quantity("missing", 3));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = Cart::default();
        let item = CartItem::quick_match("Valorant", 400, 2);
        let id = item.id.clone();
        cart.add(item);
        cart.add(CartItem::quick_match("Apex Legends", 500, 1));

        assert!(cart.remove(&id).is_some());
        assert!(cart.remove(&id).is_none());
        assert_eq!(cart.items().len(), 1);

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_cents(), 0);
    }

    #[test]
    fn test_order_request() {
        let pro = Id::new();
        let item = CartItem::with_pro(pro, "ace", "Valorant", 1000, 2);
        let request = item.to_order_request("player#1234", "");
        assert_eq!(request.pro_id, Some(pro.to_string()));
        assert_eq!(request.game_count, 2);
        assert_eq!(request.discord_username, "player#1234");

        let quick = CartItem::quick_match("Valorant", 400, 2).to_order_request("p", "gg");
        assert!(quick.pro_id.is_none());
    }
}
