use async_trait::async_trait;
use bson::{doc, Document, Uuid};
use futures::TryStreamExt;
use mongodb::{
    options::{FindOptions, ReplaceOptions},
    Collection, Database,
};

use crate::error::RepositoryError;
use crate::model::cart::Cart;
use crate::model::favorite::Favorite;
use crate::model::page::Page;
use crate::model::review::Review;
use crate::model::user::User;
use crate::model::videogame::Videogame;

use super::{
    CartRepository, CatalogQuery, FavoriteRepository, ReviewRepository, UserRepository,
    VideogameRepository,
};

/// MongoDB-backed videogame catalog.
pub struct MongoVideogameRepository {
    collection: Collection<Videogame>,
}

impl MongoVideogameRepository {
    pub fn new(db_client: &Database) -> Self {
        Self {
            collection: db_client.collection::<Videogame>("videogames"),
        }
    }
}

#[async_trait]
impl VideogameRepository for MongoVideogameRepository {
    async fn insert(&self, videogame: &Videogame) -> Result<(), RepositoryError> {
        match self.collection.insert_one(videogame, None).await {
            Ok(_) => Ok(()),
            Err(_) => Err(RepositoryError::Backend("Adding videogame".to_string())),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Videogame>, RepositoryError> {
        match self.collection.find_one(doc! {"id": id}, None).await {
            Ok(maybe_videogame) => Ok(maybe_videogame),
            Err(_) => Err(RepositoryError::Backend("Retrieving videogame".to_string())),
        }
    }

    async fn find_page(&self, query: &CatalogQuery) -> Result<Page<Videogame>, RepositoryError> {
        let mut filter = Document::new();
        if let Some(name) = &query.name {
            filter.insert("name", doc! {"$regex": name, "$options": "i"});
        }
        let order = query.order;
        let sorting_doc = doc! {order.field.unwrap_or_default().as_str(): i32::from(order.direction.unwrap_or_default())};
        let find_options = FindOptions::builder()
            .skip(query.skip)
            .limit(query.first.map(i64::from))
            .sort(sorting_doc)
            .build();
        let total_count = match self.collection.count_documents(filter.clone(), None).await {
            Ok(total_count) => total_count,
            Err(_) => return Err(RepositoryError::Backend("Counting videogames".to_string())),
        };
        let nodes: Vec<Videogame> = match self.collection.find(filter, find_options).await {
            Ok(cursor) => match cursor.try_collect().await {
                Ok(nodes) => nodes,
                Err(_) => {
                    return Err(RepositoryError::Backend("Retrieving videogames".to_string()))
                }
            },
            Err(_) => return Err(RepositoryError::Backend("Retrieving videogames".to_string())),
        };
        let has_next_page = total_count > nodes.len() as u64 + query.skip.unwrap_or(0);
        Ok(Page {
            nodes,
            has_next_page,
            total_count,
        })
    }
}

/// MongoDB-backed cart store, one document per owning user.
pub struct MongoCartRepository {
    collection: Collection<Cart>,
}

impl MongoCartRepository {
    pub fn new(db_client: &Database) -> Self {
        Self {
            collection: db_client.collection::<Cart>("carts"),
        }
    }
}

#[async_trait]
impl CartRepository for MongoCartRepository {
    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Option<Cart>, RepositoryError> {
        match self
            .collection
            .find_one(doc! {"ownerId": owner_id}, None)
            .await
        {
            Ok(maybe_cart) => Ok(maybe_cart),
            Err(_) => Err(RepositoryError::Backend("Retrieving cart".to_string())),
        }
    }

    async fn save(&self, cart: &Cart) -> Result<(), RepositoryError> {
        let replace_options = ReplaceOptions::builder().upsert(true).build();
        match self
            .collection
            .replace_one(doc! {"ownerId": cart.owner_id}, cart, replace_options)
            .await
        {
            Ok(_) => Ok(()),
            Err(_) => Err(RepositoryError::Backend("Saving cart".to_string())),
        }
    }

    async fn delete_by_owner(&self, owner_id: Uuid) -> Result<(), RepositoryError> {
        match self
            .collection
            .delete_one(doc! {"ownerId": owner_id}, None)
            .await
        {
            Ok(_) => Ok(()),
            Err(_) => Err(RepositoryError::Backend("Deleting cart".to_string())),
        }
    }
}

/// MongoDB-backed user accounts.
pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db_client: &Database) -> Self {
        Self {
            collection: db_client.collection::<User>("users"),
        }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn insert(&self, user: &User) -> Result<(), RepositoryError> {
        match self.collection.insert_one(user, None).await {
            Ok(_) => Ok(()),
            Err(_) => Err(RepositoryError::Backend("Adding user".to_string())),
        }
    }

    async fn find_all(&self) -> Result<Vec<User>, RepositoryError> {
        match self.collection.find(None, None).await {
            Ok(cursor) => match cursor.try_collect().await {
                Ok(users) => Ok(users),
                Err(_) => Err(RepositoryError::Backend("Retrieving users".to_string())),
            },
            Err(_) => Err(RepositoryError::Backend("Retrieving users".to_string())),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        match self.collection.find_one(doc! {"id": id}, None).await {
            Ok(maybe_user) => Ok(maybe_user),
            Err(_) => Err(RepositoryError::Backend("Retrieving user".to_string())),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        match self.collection.find_one(doc! {"email": email}, None).await {
            Ok(maybe_user) => Ok(maybe_user),
            Err(_) => Err(RepositoryError::Backend("Retrieving user".to_string())),
        }
    }

    async fn update(&self, user: &User) -> Result<(), RepositoryError> {
        match self
            .collection
            .replace_one(doc! {"id": user.id}, user, None)
            .await
        {
            Ok(_) => Ok(()),
            Err(_) => Err(RepositoryError::Backend("Updating user".to_string())),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        match self.collection.delete_one(doc! {"id": id}, None).await {
            Ok(_) => Ok(()),
            Err(_) => Err(RepositoryError::Backend("Deleting user".to_string())),
        }
    }
}

/// MongoDB-backed favorites.
pub struct MongoFavoriteRepository {
    collection: Collection<Favorite>,
}

impl MongoFavoriteRepository {
    pub fn new(db_client: &Database) -> Self {
        Self {
            collection: db_client.collection::<Favorite>("favorites"),
        }
    }
}

#[async_trait]
impl FavoriteRepository for MongoFavoriteRepository {
    async fn insert(&self, favorite: &Favorite) -> Result<(), RepositoryError> {
        match self.collection.insert_one(favorite, None).await {
            Ok(_) => Ok(()),
            Err(_) => Err(RepositoryError::Backend("Adding favorite".to_string())),
        }
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Favorite>, RepositoryError> {
        match self.collection.find(doc! {"userId": user_id}, None).await {
            Ok(cursor) => match cursor.try_collect().await {
                Ok(favorites) => Ok(favorites),
                Err(_) => Err(RepositoryError::Backend("Retrieving favorites".to_string())),
            },
            Err(_) => Err(RepositoryError::Backend("Retrieving favorites".to_string())),
        }
    }

    async fn find_by_user_and_videogame(
        &self,
        user_id: Uuid,
        videogame_id: Uuid,
    ) -> Result<Option<Favorite>, RepositoryError> {
        match self
            .collection
            .find_one(doc! {"userId": user_id, "videogameId": videogame_id}, None)
            .await
        {
            Ok(maybe_favorite) => Ok(maybe_favorite),
            Err(_) => Err(RepositoryError::Backend("Retrieving favorite".to_string())),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        match self.collection.delete_one(doc! {"id": id}, None).await {
            Ok(_) => Ok(()),
            Err(_) => Err(RepositoryError::Backend("Deleting favorite".to_string())),
        }
    }

    async fn delete_by_user(&self, user_id: Uuid) -> Result<(), RepositoryError> {
        match self
            .collection
            .delete_many(doc! {"userId": user_id}, None)
            .await
        {
            Ok(_) => Ok(()),
            Err(_) => Err(RepositoryError::Backend("Deleting favorites".to_string())),
        }
    }
}

/// MongoDB-backed reviews.
pub struct MongoReviewRepository {
    collection: Collection<Review>,
}

impl MongoReviewRepository {
    pub fn new(db_client: &Database) -> Self {
        Self {
            collection: db_client.collection::<Review>("reviews"),
        }
    }
}

#[async_trait]
impl ReviewRepository for MongoReviewRepository {
    async fn insert(&self, review: &Review) -> Result<(), RepositoryError> {
        match self.collection.insert_one(review, None).await {
            Ok(_) => Ok(()),
            Err(_) => Err(RepositoryError::Backend("Adding review".to_string())),
        }
    }

    async fn find_by_videogame(&self, videogame_id: Uuid) -> Result<Vec<Review>, RepositoryError> {
        match self
            .collection
            .find(doc! {"videogameId": videogame_id}, None)
            .await
        {
            Ok(cursor) => match cursor.try_collect().await {
                Ok(reviews) => Ok(reviews),
                Err(_) => Err(RepositoryError::Backend("Retrieving reviews".to_string())),
            },
            Err(_) => Err(RepositoryError::Backend("Retrieving reviews".to_string())),
        }
    }

    async fn find_by_user_and_videogame(
        &self,
        user_id: Uuid,
        videogame_id: Uuid,
    ) -> Result<Option<Review>, RepositoryError> {
        match self
            .collection
            .find_one(doc! {"userId": user_id, "videogameId": videogame_id}, None)
            .await
        {
            Ok(maybe_review) => Ok(maybe_review),
            Err(_) => Err(RepositoryError::Backend("Retrieving review".to_string())),
        }
    }

    async fn delete_by_user(&self, user_id: Uuid) -> Result<(), RepositoryError> {
        match self
            .collection
            .delete_many(doc! {"userId": user_id}, None)
            .await
        {
            Ok(_) => Ok(()),
            Err(_) => Err(RepositoryError::Backend("Deleting reviews".to_string())),
        }
    }
}
