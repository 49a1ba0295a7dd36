use async_trait::async_trait;
use bson::Uuid;

use crate::error::RepositoryError;
use crate::model::cart::Cart;
use crate::model::favorite::Favorite;
use crate::model::order_datatypes::CatalogOrder;
use crate::model::page::Page;
use crate::model::review::Review;
use crate::model::user::User;
use crate::model::videogame::Videogame;

pub mod memory;
pub mod mongodb;

/// Listing parameters of a catalog page.
#[derive(Debug, Default, Clone)]
pub struct CatalogQuery {
    /// Case-insensitive substring filter on the videogame name.
    pub name: Option<String>,
    /// Describes that the `first` N videogames should be retrieved.
    pub first: Option<u32>,
    /// Describes how many videogames should be skipped at the beginning.
    pub skip: Option<u64>,
    /// Specifies the order in which videogames are retrieved.
    pub order: CatalogOrder,
}

/// Access to the videogame catalog.
#[async_trait]
pub trait VideogameRepository: Send + Sync {
    async fn insert(&self, videogame: &Videogame) -> Result<(), RepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Videogame>, RepositoryError>;
    async fn find_page(&self, query: &CatalogQuery) -> Result<Page<Videogame>, RepositoryError>;
}

/// Access to persisted carts, one per owning user.
#[async_trait]
pub trait CartRepository: Send + Sync {
    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Option<Cart>, RepositoryError>;
    /// Writes the full cart, creating it when absent.
    async fn save(&self, cart: &Cart) -> Result<(), RepositoryError>;
    async fn delete_by_owner(&self, owner_id: Uuid) -> Result<(), RepositoryError>;
}

/// Access to user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: &User) -> Result<(), RepositoryError>;
    async fn find_all(&self) -> Result<Vec<User>, RepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
    async fn update(&self, user: &User) -> Result<(), RepositoryError>;
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}

/// Access to favorites of users.
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    async fn insert(&self, favorite: &Favorite) -> Result<(), RepositoryError>;
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Favorite>, RepositoryError>;
    async fn find_by_user_and_videogame(
        &self,
        user_id: Uuid,
        videogame_id: Uuid,
    ) -> Result<Option<Favorite>, RepositoryError>;
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
    async fn delete_by_user(&self, user_id: Uuid) -> Result<(), RepositoryError>;
}

/// Access to videogame reviews.
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn insert(&self, review: &Review) -> Result<(), RepositoryError>;
    async fn find_by_videogame(&self, videogame_id: Uuid) -> Result<Vec<Review>, RepositoryError>;
    async fn find_by_user_and_videogame(
        &self,
        user_id: Uuid,
        videogame_id: Uuid,
    ) -> Result<Option<Review>, RepositoryError>;
    async fn delete_by_user(&self, user_id: Uuid) -> Result<(), RepositoryError>;
}
