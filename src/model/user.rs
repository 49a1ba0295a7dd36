use bson::Uuid;
use serde::{Deserialize, Serialize};

/// A user of the store.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// UUID of the user.
    pub id: Uuid,
    /// Email address the user registered with.
    pub email: String,
    /// Full name of the user.
    pub name: String,
    /// Nickname shown next to reviews.
    pub nickname: String,
}

/// Projection of a user returned by the single-user endpoint.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// UUID of the user.
    pub id: Uuid,
    /// Email address the user registered with.
    pub email: String,
    /// Nickname shown next to reviews.
    pub nickname: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            nickname: user.nickname.clone(),
        }
    }
}
