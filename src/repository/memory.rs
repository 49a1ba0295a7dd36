use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use bson::Uuid;

use crate::error::RepositoryError;
use crate::model::cart::Cart;
use crate::model::favorite::Favorite;
use crate::model::order_datatypes::{CatalogOrder, OrderDirection, VideogameOrderField};
use crate::model::page::Page;
use crate::model::review::Review;
use crate::model::user::User;
use crate::model::videogame::Videogame;

use super::{
    CartRepository, CatalogQuery, FavoriteRepository, ReviewRepository, UserRepository,
    VideogameRepository,
};

/// In-memory videogame catalog, used by tests and demo runs.
#[derive(Default)]
pub struct MemoryVideogameRepository {
    videogames: RwLock<Vec<Videogame>>,
}

#[async_trait]
impl VideogameRepository for MemoryVideogameRepository {
    async fn insert(&self, videogame: &Videogame) -> Result<(), RepositoryError> {
        let mut videogames = self
            .videogames
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        videogames.push(videogame.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Videogame>, RepositoryError> {
        let videogames = self
            .videogames
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(videogames
            .iter()
            .find(|videogame| videogame.id == id)
            .cloned())
    }

    async fn find_page(&self, query: &CatalogQuery) -> Result<Page<Videogame>, RepositoryError> {
        let videogames = self
            .videogames
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut matching: Vec<Videogame> = videogames
            .iter()
            .filter(|videogame| match &query.name {
                Some(name) => videogame.name.to_lowercase().contains(&name.to_lowercase()),
                None => true,
            })
            .cloned()
            .collect();
        sort_videogames(&mut matching, &query.order);
        let total_count = matching.len();
        let definitely_skip = query.skip.unwrap_or(0) as usize;
        let definitely_first = query.first.map(|first| first as usize).unwrap_or(usize::MAX);
        let videogames_part: Vec<Videogame> = matching
            .into_iter()
            .skip(definitely_skip)
            .take(definitely_first)
            .collect();
        let has_next_page = total_count > videogames_part.len() + definitely_skip;
        Ok(Page {
            nodes: videogames_part,
            has_next_page,
            total_count: total_count as u64,
        })
    }
}

/// Sorts videogames according to the catalog order.
///
/// * `videogames` - Videogames to sort.
/// * `order` - Specifies order of the sorted result.
fn sort_videogames(videogames: &mut [Videogame], order: &CatalogOrder) {
    let field = order.field.unwrap_or_default();
    let direction = order.direction.unwrap_or_default();
    videogames.sort_by(|first_videogame, second_videogame| {
        let ordering = match field {
            VideogameOrderField::Id => first_videogame.id.cmp(&second_videogame.id),
            VideogameOrderField::Name => first_videogame.name.cmp(&second_videogame.name),
            VideogameOrderField::Price => first_videogame
                .price
                .partial_cmp(&second_videogame.price)
                .unwrap_or(Ordering::Equal),
        };
        match direction {
            OrderDirection::Asc => ordering,
            OrderDirection::Desc => ordering.reverse(),
        }
    });
}

/// In-memory cart store keyed by owning user.
#[derive(Default)]
pub struct MemoryCartRepository {
    carts: RwLock<HashMap<Uuid, Cart>>,
}

#[async_trait]
impl CartRepository for MemoryCartRepository {
    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Option<Cart>, RepositoryError> {
        let carts = self
            .carts
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(carts.get(&owner_id).cloned())
    }

    async fn save(&self, cart: &Cart) -> Result<(), RepositoryError> {
        let mut carts = self
            .carts
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        carts.insert(cart.owner_id, cart.clone());
        Ok(())
    }

    async fn delete_by_owner(&self, owner_id: Uuid) -> Result<(), RepositoryError> {
        let mut carts = self
            .carts
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        carts.remove(&owner_id);
        Ok(())
    }
}

/// In-memory user accounts.
#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<Vec<User>>,
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), RepositoryError> {
        let mut users = self
            .users
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        users.push(user.clone());
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<User>, RepositoryError> {
        let users = self
            .users
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(users.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        let users = self
            .users
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(users.iter().find(|user| user.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let users = self
            .users
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(users.iter().find(|user| user.email == email).cloned())
    }

    async fn update(&self, user: &User) -> Result<(), RepositoryError> {
        let mut users = self
            .users
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(stored) = users.iter_mut().find(|stored| stored.id == user.id) {
            *stored = user.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let mut users = self
            .users
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        users.retain(|user| user.id != id);
        Ok(())
    }
}

/// In-memory favorites.
#[derive(Default)]
pub struct MemoryFavoriteRepository {
    favorites: RwLock<Vec<Favorite>>,
}

#[async_trait]
impl FavoriteRepository for MemoryFavoriteRepository {
    async fn insert(&self, favorite: &Favorite) -> Result<(), RepositoryError> {
        let mut favorites = self
            .favorites
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        favorites.push(favorite.clone());
        Ok(())
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Favorite>, RepositoryError> {
        let favorites = self
            .favorites
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(favorites
            .iter()
            .filter(|favorite| favorite.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_user_and_videogame(
        &self,
        user_id: Uuid,
        videogame_id: Uuid,
    ) -> Result<Option<Favorite>, RepositoryError> {
        let favorites = self
            .favorites
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(favorites
            .iter()
            .find(|favorite| favorite.user_id == user_id && favorite.videogame_id == videogame_id)
            .cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let mut favorites = self
            .favorites
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        favorites.retain(|favorite| favorite.id != id);
        Ok(())
    }

    async fn delete_by_user(&self, user_id: Uuid) -> Result<(), RepositoryError> {
        let mut favorites = self
            .favorites
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        favorites.retain(|favorite| favorite.user_id != user_id);
        Ok(())
    }
}

/// In-memory reviews.
#[derive(Default)]
pub struct MemoryReviewRepository {
    reviews: RwLock<Vec<Review>>,
}

#[async_trait]
impl ReviewRepository for MemoryReviewRepository {
    async fn insert(&self, review: &Review) -> Result<(), RepositoryError> {
        let mut reviews = self
            .reviews
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        reviews.push(review.clone());
        Ok(())
    }

    async fn find_by_videogame(&self, videogame_id: Uuid) -> Result<Vec<Review>, RepositoryError> {
        let reviews = self
            .reviews
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(reviews
            .iter()
            .filter(|review| review.videogame_id == videogame_id)
            .cloned()
            .collect())
    }

    async fn find_by_user_and_videogame(
        &self,
        user_id: Uuid,
        videogame_id: Uuid,
    ) -> Result<Option<Review>, RepositoryError> {
        let reviews = self
            .reviews
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(reviews
            .iter()
            .find(|review| review.user_id == user_id && review.videogame_id == videogame_id)
            .cloned())
    }

    async fn delete_by_user(&self, user_id: Uuid) -> Result<(), RepositoryError> {
        let mut reviews = self
            .reviews
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        reviews.retain(|review| review.user_id != user_id);
        Ok(())
    }
}
