//! Review and game profile entity <-> model mappers

use squad_core::entities::{GameProfile, Review};
use squad_core::Id;

use crate::models::{GameProfileModel, ReviewModel};

impl From<ReviewModel> for Review {
    fn from(model: ReviewModel) -> Self {
        Review {
            id: Id::from_uuid(model.id),
            order_id: Id::from_uuid(model.order_id),
            reviewer_id: Id::from_uuid(model.reviewer_id),
            reviewee_id: Id::from_uuid(model.reviewee_id),
            rating: model.rating,
            comment: model.comment,
            created_at: model.created_at,
        }
    }
}

impl From<GameProfileModel> for GameProfile {
    fn from(model: GameProfileModel) -> Self {
        GameProfile {
            profile_id: Id::from_uuid(model.profile_id),
            game_id: Id::from_uuid(model.game_id),
            rank: model.rank,
            hours_played: model.hours_played,
            updated_at: model.updated_at,
        }
    }
}
