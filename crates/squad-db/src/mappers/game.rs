//! Game entity <-> model mapper

use squad_core::entities::Game;
use squad_core::Id;

use crate::models::GameModel;

impl From<GameModel> for Game {
    fn from(model: GameModel) -> Self {
        Game {
            id: Id::from_uuid(model.id),
            name: model.name,
            slug: model.slug,
            description: model.description,
            image_url: model.image_url,
            created_at: model.created_at,
        }
    }
}
