use std::cmp::Ordering;

use bson::datetime::DateTime;
use bson::Uuid;
use serde::{Deserialize, Serialize};

/// One videogame entry in a cart with a quantity.
///
/// Unique by videogame id within a cart. A quantity of zero means the item
/// is removed, never stored.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    /// UUID of the videogame the line item references.
    pub videogame_id: Uuid,
    /// Count of copies in the cart.
    pub quantity: u32,
    /// Catalog price of a single copy at the time the cart was last written.
    pub unit_price: f64,
}

impl PartialOrd for CartLineItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.videogame_id.partial_cmp(&other.videogame_id)
    }
}

/// The shopping cart of a user.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// UUID of the user owning the cart.
    pub owner_id: Uuid,
    /// Line items of the cart, unique by videogame id.
    pub items: Vec<CartLineItem>,
    /// Timestamp when the cart was last updated.
    pub last_updated_at: DateTime,
}

impl Cart {
    /// Builds the empty cart of a user. Carts are created implicitly on first add.
    pub fn empty(owner_id: Uuid) -> Self {
        Self {
            owner_id,
            items: Vec::new(),
            last_updated_at: DateTime::now(),
        }
    }

    /// Retrieves the line item referencing a videogame, if present.
    pub fn line_item(&self, videogame_id: Uuid) -> Option<&CartLineItem> {
        self.items
            .iter()
            .find(|item| item.videogame_id == videogame_id)
    }

    /// Total price of the cart.
    pub fn total(&self) -> f64 {
        self.items
            .iter()
            .map(|item| f64::from(item.quantity) * item.unit_price)
            .sum()
    }
}
