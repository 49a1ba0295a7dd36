use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::cart::store::CartStore;
use crate::error::AppError;
use crate::mail::WelcomeMailer;
use crate::repository::{
    FavoriteRepository, ReviewRepository, UserRepository, VideogameRepository,
};

pub mod cart_routes;
pub mod inputs;
pub mod review_routes;
pub mod user_routes;
pub mod videogame_routes;

/// Parses a UUID path or query parameter.
pub(crate) fn parse_uuid(value: &str) -> Result<bson::Uuid, AppError> {
    bson::Uuid::parse_str(value)
        .map_err(|_| AppError::Validation(format!("`{}` is not a valid UUID.", value)))
}

/// Service state shared by all REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub cart_store: CartStore,
    pub videogames: Arc<dyn VideogameRepository>,
    pub users: Arc<dyn UserRepository>,
    pub favorites: Arc<dyn FavoriteRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub mailer: Arc<dyn WelcomeMailer>,
}

/// Builds the REST router of the storefront.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/cart", get(cart_routes::get_cart))
        .route("/cart/add", post(cart_routes::reconcile_cart))
        .route("/cart/add/{videogame_id}", post(cart_routes::add_to_cart))
        .route(
            "/cart/remove/{videogame_id}",
            delete(cart_routes::remove_from_cart),
        )
        .route(
            "/videogames",
            get(videogame_routes::list_videogames).post(videogame_routes::create_videogame),
        )
        .route("/videogames/{id}", get(videogame_routes::get_videogame))
        .route(
            "/videogames/{id}/reviews",
            get(review_routes::list_reviews),
        )
        .route("/reviews", post(review_routes::create_review))
        .route(
            "/users",
            get(user_routes::list_users).post(user_routes::create_user),
        )
        .route(
            "/users/{id}",
            get(user_routes::get_user)
                .put(user_routes::update_user)
                .delete(user_routes::delete_user),
        )
        .route(
            "/users/{id}/favorites",
            get(user_routes::list_favorites).post(user_routes::create_favorite),
        )
        .route("/favorites/{id}", delete(user_routes::delete_favorite))
        .with_state(state)
}
