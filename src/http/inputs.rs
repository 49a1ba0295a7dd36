use bson::Uuid;
use serde::Deserialize;

/// Input to add a videogame to the catalog.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVideogameInput {
    /// Display name of the videogame.
    pub name: String,
    /// Store price of the videogame.
    pub price: f64,
    /// URL of the cover image.
    pub image: String,
}

/// Input to find or create a user by email.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserInput {
    /// Email address identifying the user.
    pub email: String,
    /// Full name of the user.
    pub name: String,
    /// Nickname shown next to reviews.
    pub nickname: String,
}

/// Input to update profile fields of a user.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserInput {
    /// New full name, kept when absent.
    pub name: Option<String>,
    /// New nickname, kept when absent.
    pub nickname: Option<String>,
}

/// Input to mark a videogame as a favorite of a user.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFavoriteInput {
    /// UUID of the videogame to favor.
    pub videogame_id: Uuid,
}

/// Input to review a videogame.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewInput {
    /// UUID of the reviewed videogame.
    pub videogame_id: Uuid,
    /// UUID of the user writing the review.
    pub user_id: Uuid,
    /// Score between 1 and 10.
    pub score: u8,
    /// Review text.
    pub text: String,
}
