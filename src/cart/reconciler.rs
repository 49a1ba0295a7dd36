use std::collections::BTreeMap;

use bson::Uuid;

use crate::model::cart::CartLineItem;

/// Merges a client cart snapshot with the server cart items.
///
/// For each videogame present in either source the resulting quantity is the
/// maximum of both sides, never the sum, so replaying the same merge twice
/// does not double-count. Duplicates inside the client snapshot collapse the
/// same way. Line items with a quantity of zero are treated as removed.
/// The result is sorted by videogame id.
///
/// * `client_items` - Line items cached on the client.
/// * `server_items` - Line items of the authoritative server cart.
pub fn merge_line_items(
    client_items: &[CartLineItem],
    server_items: &[CartLineItem],
) -> Vec<CartLineItem> {
    let mut merged: BTreeMap<Uuid, CartLineItem> = BTreeMap::new();
    for item in server_items.iter().chain(client_items.iter()) {
        if item.quantity == 0 {
            continue;
        }
        match merged.get_mut(&item.videogame_id) {
            Some(merged_item) => {
                merged_item.quantity = merged_item.quantity.max(item.quantity);
            }
            None => {
                merged.insert(item.videogame_id, item.clone());
            }
        }
    }
    merged.into_values().collect()
}
