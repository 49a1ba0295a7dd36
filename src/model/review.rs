use bson::Uuid;
use serde::{Deserialize, Serialize};

/// A review a user wrote for a videogame.
///
/// At most one review per user and videogame.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// UUID of the review.
    pub id: Uuid,
    /// UUID of the reviewed videogame.
    pub videogame_id: Uuid,
    /// UUID of the user who wrote the review.
    pub user_id: Uuid,
    /// Score between 1 and 10.
    pub score: u8,
    /// Review text.
    pub text: String,
}
