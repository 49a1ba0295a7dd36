use bson::Uuid;
use log::warn;

use crate::model::cart::CartLineItem;
use crate::model::videogame::Videogame;

use super::storage::DurableCache;

/// Durable-cache key the line item list is flushed to.
pub const CART_STORAGE_KEY: &str = "shopping-cart";

/// Actions dispatched against the cart slice.
#[derive(Debug, Clone)]
pub enum CartAction {
    /// Puts a videogame in the cart, incrementing the quantity when already
    /// present.
    AddToCart(Videogame),
    /// Drops the line item referencing a videogame. A no-op when absent.
    RemoveFromCart(Uuid),
}

/// Client-side mirror of the server cart invariants.
///
/// An explicit state-container instance owned by the caller. After every
/// state change the full item list is flushed as a JSON array to the durable
/// cache under `CART_STORAGE_KEY`; cache failures are logged and otherwise
/// ignored.
pub struct CartSlice<Cache: DurableCache> {
    items: Vec<CartLineItem>,
    cache: Cache,
}

impl<Cache: DurableCache> CartSlice<Cache> {
    /// Restores the slice from the durable cache.
    ///
    /// A missing or unparsable cache entry yields an empty cart.
    pub fn load(cache: Cache) -> Self {
        let items = cache
            .read(CART_STORAGE_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        Self { items, cache }
    }

    /// Selector over the current line items.
    pub fn cart_items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Whether the cart holds a line item referencing a videogame.
    pub fn contains(&self, videogame_id: Uuid) -> bool {
        self.items
            .iter()
            .any(|item| item.videogame_id == videogame_id)
    }

    /// Applies an action and flushes the item list to the cache.
    pub fn dispatch(&mut self, action: CartAction) {
        match action {
            CartAction::AddToCart(videogame) => {
                match self
                    .items
                    .iter_mut()
                    .find(|item| item.videogame_id == videogame.id)
                {
                    Some(item) => item.quantity += 1,
                    None => self.items.push(CartLineItem {
                        videogame_id: videogame.id,
                        quantity: 1,
                        unit_price: videogame.price,
                    }),
                }
            }
            CartAction::RemoveFromCart(videogame_id) => {
                self.items.retain(|item| item.videogame_id != videogame_id);
            }
        }
        self.flush();
    }

    /// Adopts a server-reconciled item list.
    pub fn replace(&mut self, items: Vec<CartLineItem>) {
        self.items = items;
        self.flush();
    }

    /// Shared access to the underlying cache.
    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    fn flush(&mut self) {
        let serialized = match serde_json::to_string(&self.items) {
            Ok(serialized) => serialized,
            Err(error) => {
                warn!("Serializing the cart for the durable cache failed: {}", error);
                return;
            }
        };
        if let Err(error) = self.cache.write(CART_STORAGE_KEY, &serialized) {
            warn!("Flushing the cart to the durable cache failed: {}", error);
        }
    }
}
