use bson::Uuid;
use serde::{Deserialize, Serialize};

/// A videogame in the store catalog.
///
/// Read-only from the cart's perspective.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Videogame {
    /// UUID of the videogame.
    pub id: Uuid,
    /// Display name of the videogame.
    pub name: String,
    /// Store price of the videogame.
    pub price: f64,
    /// URL of the cover image.
    pub image: String,
}

/// Catalog attributes projected into favorite listings.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VideogameSummary {
    /// UUID of the videogame.
    pub id: Uuid,
    /// Display name of the videogame.
    pub name: String,
    /// URL of the cover image.
    pub image: String,
}

impl From<&Videogame> for VideogameSummary {
    fn from(videogame: &Videogame) -> Self {
        Self {
            id: videogame.id,
            name: videogame.name.clone(),
            image: videogame.image.clone(),
        }
    }
}
