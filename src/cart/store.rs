use std::sync::Arc;

use bson::{DateTime, Uuid};
use log::info;

use crate::error::AppError;
use crate::model::cart::{Cart, CartLineItem};
use crate::model::videogame::Videogame;
use crate::repository::{CartRepository, UserRepository, VideogameRepository};

use super::reconciler::merge_line_items;

/// Holds the authoritative cart of each user.
///
/// All mutations validate the referenced user and videogames against the
/// repositories and are persisted synchronously before returning. Concurrent
/// mutations of the same cart race at the document level and the last write
/// wins.
#[derive(Clone)]
pub struct CartStore {
    carts: Arc<dyn CartRepository>,
    videogames: Arc<dyn VideogameRepository>,
    users: Arc<dyn UserRepository>,
}

impl CartStore {
    pub fn new(
        carts: Arc<dyn CartRepository>,
        videogames: Arc<dyn VideogameRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            carts,
            videogames,
            users,
        }
    }

    /// Retrieves the cart of a user, or an empty cart when none exists yet.
    pub async fn cart(&self, owner_id: Uuid) -> Result<Cart, AppError> {
        let maybe_cart = self.carts.find_by_owner(owner_id).await?;
        Ok(maybe_cart.unwrap_or_else(|| Cart::empty(owner_id)))
    }

    /// Upserts a line item, incrementing the quantity when already present.
    ///
    /// * `owner_id` - UUID of the user owning the cart.
    /// * `videogame_id` - UUID of the videogame to add.
    /// * `quantity` - Count of copies to add, at least 1.
    pub async fn add_item(
        &self,
        owner_id: Uuid,
        videogame_id: Uuid,
        quantity: u32,
    ) -> Result<Cart, AppError> {
        if quantity == 0 {
            return Err(AppError::Validation(
                "Quantity must be at least 1.".to_string(),
            ));
        }
        self.validate_user(owner_id).await?;
        let videogame = self.videogame(videogame_id).await?;
        let mut cart = self.cart(owner_id).await?;
        match cart
            .items
            .iter_mut()
            .find(|item| item.videogame_id == videogame_id)
        {
            Some(item) => {
                item.quantity += quantity;
                item.unit_price = videogame.price;
            }
            None => cart.items.push(CartLineItem {
                videogame_id,
                quantity,
                unit_price: videogame.price,
            }),
        }
        cart.last_updated_at = DateTime::now();
        self.carts.save(&cart).await?;
        info!(
            "Added {} copy(ies) of videogame `{}` to the cart of user `{}`.",
            quantity, videogame_id, owner_id
        );
        Ok(cart)
    }

    /// Deletes a line item. A no-op returning the unchanged cart when the
    /// videogame is not in the cart.
    pub async fn remove_item(&self, owner_id: Uuid, videogame_id: Uuid) -> Result<Cart, AppError> {
        self.validate_user(owner_id).await?;
        let mut cart = self.cart(owner_id).await?;
        let item_count_before = cart.items.len();
        cart.items.retain(|item| item.videogame_id != videogame_id);
        if cart.items.len() == item_count_before {
            return Ok(cart);
        }
        cart.last_updated_at = DateTime::now();
        self.carts.save(&cart).await?;
        info!(
            "Removed videogame `{}` from the cart of user `{}`.",
            videogame_id, owner_id
        );
        Ok(cart)
    }

    /// Merges a client cart snapshot with the server cart and persists the
    /// reconciled result.
    ///
    /// Every referenced videogame must exist in the catalog; otherwise the
    /// merge fails with `NotFound` and the server cart is left unchanged.
    /// Unit prices are always taken from the catalog, never from the client.
    pub async fn reconcile(
        &self,
        owner_id: Uuid,
        client_items: &[CartLineItem],
    ) -> Result<Cart, AppError> {
        self.validate_user(owner_id).await?;
        let server_cart = self.cart(owner_id).await?;
        let mut merged = merge_line_items(client_items, &server_cart.items);
        for item in &mut merged {
            let videogame = self.videogame(item.videogame_id).await?;
            item.unit_price = videogame.price;
        }
        let cart = Cart {
            owner_id,
            items: merged,
            last_updated_at: DateTime::now(),
        };
        self.carts.save(&cart).await?;
        info!(
            "Reconciled the cart of user `{}` to {} line item(s).",
            owner_id,
            cart.items.len()
        );
        Ok(cart)
    }

    /// Deletes the cart of a user, used when user deletion cascades.
    pub async fn delete(&self, owner_id: Uuid) -> Result<(), AppError> {
        self.carts.delete_by_owner(owner_id).await?;
        Ok(())
    }

    async fn validate_user(&self, owner_id: Uuid) -> Result<(), AppError> {
        match self.users.find_by_id(owner_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::user_not_found(owner_id)),
        }
    }

    async fn videogame(&self, videogame_id: Uuid) -> Result<Videogame, AppError> {
        self.videogames
            .find_by_id(videogame_id)
            .await?
            .ok_or_else(|| AppError::videogame_not_found(videogame_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::user::User;
    use crate::repository::memory::{
        MemoryCartRepository, MemoryUserRepository, MemoryVideogameRepository,
    };

    struct Fixture {
        store: CartStore,
        owner_id: Uuid,
        videogame_id: Uuid,
    }

    async fn fixture() -> Fixture {
        let carts = Arc::new(MemoryCartRepository::default());
        let videogames = Arc::new(MemoryVideogameRepository::default());
        let users = Arc::new(MemoryUserRepository::default());
        let owner_id = Uuid::new();
        users
            .insert(&User {
                id: owner_id,
                email: "ash@example.com".to_string(),
                name: "Ash".to_string(),
                nickname: "ash".to_string(),
            })
            .await
            .unwrap();
        let videogame_id = Uuid::new();
        videogames
            .insert(&Videogame {
                id: videogame_id,
                name: "Hollow Knight".to_string(),
                price: 14.99,
                image: "https://example.com/hk.jpg".to_string(),
            })
            .await
            .unwrap();
        let store = CartStore::new(carts, videogames.clone(), users);
        Fixture {
            store,
            owner_id,
            videogame_id,
        }
    }

    #[tokio::test]
    async fn cart_of_user_without_cart_is_empty() {
        let fixture = fixture().await;
        let cart = fixture.store.cart(fixture.owner_id).await.unwrap();
        assert_eq!(cart.owner_id, fixture.owner_id);
        assert!(cart.items.is_empty());
    }

    #[tokio::test]
    async fn adding_twice_increments_the_quantity() {
        let fixture = fixture().await;
        fixture
            .store
            .add_item(fixture.owner_id, fixture.videogame_id, 1)
            .await
            .unwrap();
        let cart = fixture
            .store
            .add_item(fixture.owner_id, fixture.videogame_id, 1)
            .await
            .unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 2);
        assert_eq!(cart.items[0].unit_price, 14.99);
    }

    #[tokio::test]
    async fn adding_an_unknown_videogame_fails_and_leaves_the_cart_unchanged() {
        let fixture = fixture().await;
        fixture
            .store
            .add_item(fixture.owner_id, fixture.videogame_id, 1)
            .await
            .unwrap();
        let result = fixture
            .store
            .add_item(fixture.owner_id, Uuid::new(), 1)
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        let cart = fixture.store.cart(fixture.owner_id).await.unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 1);
    }

    #[tokio::test]
    async fn adding_for_an_unknown_user_fails() {
        let fixture = fixture().await;
        let result = fixture
            .store
            .add_item(Uuid::new(), fixture.videogame_id, 1)
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn zero_quantity_is_rejected() {
        let fixture = fixture().await;
        let result = fixture
            .store
            .add_item(fixture.owner_id, fixture.videogame_id, 0)
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn removing_an_absent_item_is_a_noop() {
        let fixture = fixture().await;
        fixture
            .store
            .add_item(fixture.owner_id, fixture.videogame_id, 2)
            .await
            .unwrap();
        let cart = fixture
            .store
            .remove_item(fixture.owner_id, Uuid::new())
            .await
            .unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 2);
    }

    #[tokio::test]
    async fn any_sequence_of_mutations_keeps_quantities_positive_and_unique() {
        let fixture = fixture().await;
        let id = fixture.videogame_id;
        fixture.store.add_item(fixture.owner_id, id, 1).await.unwrap();
        fixture.store.add_item(fixture.owner_id, id, 3).await.unwrap();
        fixture.store.remove_item(fixture.owner_id, id).await.unwrap();
        fixture.store.add_item(fixture.owner_id, id, 2).await.unwrap();
        let cart = fixture.store.cart(fixture.owner_id).await.unwrap();
        assert!(cart.items.iter().all(|item| item.quantity >= 1));
        let mut ids: Vec<Uuid> = cart.items.iter().map(|item| item.videogame_id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), cart.items.len());
    }

    #[tokio::test]
    async fn reconcile_merges_by_maximum_and_reprices_from_the_catalog() {
        let fixture = fixture().await;
        fixture
            .store
            .add_item(fixture.owner_id, fixture.videogame_id, 3)
            .await
            .unwrap();
        let snapshot = vec![CartLineItem {
            videogame_id: fixture.videogame_id,
            quantity: 2,
            unit_price: 0.01,
        }];
        let cart = fixture
            .store
            .reconcile(fixture.owner_id, &snapshot)
            .await
            .unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 3);
        assert_eq!(cart.items[0].unit_price, 14.99);
    }

    #[tokio::test]
    async fn reconciling_a_reconciled_cart_with_itself_is_a_fixpoint() {
        let fixture = fixture().await;
        fixture
            .store
            .add_item(fixture.owner_id, fixture.videogame_id, 2)
            .await
            .unwrap();
        let reconciled = fixture
            .store
            .reconcile(fixture.owner_id, &[])
            .await
            .unwrap();
        let reconciled_again = fixture
            .store
            .reconcile(fixture.owner_id, &reconciled.items)
            .await
            .unwrap();
        assert_eq!(reconciled.items, reconciled_again.items);
    }

    #[tokio::test]
    async fn reconcile_with_an_unknown_videogame_fails_and_leaves_the_cart_unchanged() {
        let fixture = fixture().await;
        fixture
            .store
            .add_item(fixture.owner_id, fixture.videogame_id, 1)
            .await
            .unwrap();
        let snapshot = vec![CartLineItem {
            videogame_id: Uuid::new(),
            quantity: 1,
            unit_price: 9.99,
        }];
        let result = fixture.store.reconcile(fixture.owner_id, &snapshot).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        let cart = fixture.store.cart(fixture.owner_id).await.unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 1);
    }
}
