//! Game entity - a catalog entry

use chrono::{DateTime, Utc};

use crate::value_objects::{slugify, Id};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub id: Id,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Game {
    /// Create a catalog entry, deriving the slug from the name
    #[must_use]
    pub fn new(id: Id, name: String) -> Self {
        let slug = slugify(&name);
        Self {
            id,
            name,
            slug,
            description: None,
            image_url: None,
            created_at: Utc::now(),
        }
    }

    /// Case-insensitive name match
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(name.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_slug() {
        let game = Game::new(Id::new(), "Rocket League".to_string());
        assert_eq!(game.slug, "rocket-league");
    }

    #[test]
    fn test_matches_name() {
        let game = Game::new(Id::new(), "Valorant".to_string());
        assert!(game.matches_name("valorant"));
        assert!(game.matches_name(" VALORANT "));
        assert!(!game.matches_name("Overwatch"));
    }
}
