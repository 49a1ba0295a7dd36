use bson::Uuid;
use serde::{Deserialize, Serialize};

use super::videogame::VideogameSummary;

/// Marks a videogame as a favorite of a user.
///
/// Unique per user and videogame.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    /// UUID of the favorite.
    pub id: Uuid,
    /// UUID of the user owning the favorite.
    pub user_id: Uuid,
    /// UUID of the favored videogame.
    pub videogame_id: Uuid,
}

/// A favorite with its videogame resolved by an explicit join call.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteWithVideogame {
    /// UUID of the favorite.
    pub id: Uuid,
    /// Catalog attributes of the favored videogame.
    pub videogame: VideogameSummary,
}
