//! Game profile - a player's rank and time played in one game

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::Id;

/// Keyed by `(profile_id, game_id)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameProfile {
    pub profile_id: Id,
    pub game_id: Id,
    pub rank: Option<String>,
    pub hours_played: i32,
    pub updated_at: DateTime<Utc>,
}

impl GameProfile {
    pub const MAX_RANK_LENGTH: usize = 50;

    #[must_use]
    pub fn new(profile_id: Id, game_id: Id) -> Self {
        Self {
            profile_id,
            game_id,
            rank: None,
            hours_played: 0,
            updated_at: Utc::now(),
        }
    }

    /// Overwrite the self-reported stats. A blank rank clears it.
    pub fn update(&mut self, rank: Option<String>, hours_played: i32) -> Result<(), DomainError> {
        if hours_played < 0 {
            return Err(DomainError::ValidationError(
                "hours_played must not be negative".to_string(),
            ));
        }
        let rank = rank.map(|r| r.trim().to_string()).filter(|r| !r.is_empty());
        if rank
            .as_ref()
            .is_some_and(|r| r.chars().count() > Self::MAX_RANK_LENGTH)
        {
            return Err(DomainError::ContentTooLong {
                max: Self::MAX_RANK_LENGTH,
            });
        }

        self.rank = rank;
        self.hours_played = hours_played;
        self.updated_at = Utc::now();
        Ok(())
    }
}
