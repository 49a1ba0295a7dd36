use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use bson::Uuid;
use log::error;
use serde::Serialize;

use crate::error::AppError;
use crate::model::favorite::{Favorite, FavoriteWithVideogame};
use crate::model::user::{User, UserProfile};
use crate::model::videogame::VideogameSummary;

use super::inputs::{CreateFavoriteInput, CreateUserInput, UpdateUserInput};
use super::{parse_uuid, AppState};

/// A user plus a message describing whether it was created or found.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user: User,
    pub message: String,
}

/// Retrieves all users.
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    let users = state.users.find_all().await?;
    Ok(Json(users))
}

/// Finds or creates a user by email.
///
/// A newly created user receives the welcome email; delivery failures are
/// logged and do not fail the request.
pub async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<CreateUserInput>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    if input.email.trim().is_empty() {
        return Err(AppError::Validation(
            "User email must not be empty.".to_string(),
        ));
    }
    if let Some(user) = state.users.find_by_email(&input.email).await? {
        let response = UserResponse {
            user,
            message: "User already exists.".to_string(),
        };
        return Ok((StatusCode::OK, Json(response)));
    }
    let user = User {
        id: Uuid::new(),
        email: input.email,
        name: input.name,
        nickname: input.nickname,
    };
    state.users.insert(&user).await?;
    if let Err(mail_error) = state.mailer.send_welcome(&user.email, &user.name).await {
        error!(
            "Sending the welcome email to `{}` failed: {}",
            user.email, mail_error
        );
    }
    let response = UserResponse {
        user,
        message: "User created.".to_string(),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Retrieves the profile of a user of a specific id.
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserProfile>, AppError> {
    let id = parse_uuid(&id)?;
    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::user_not_found(id))?;
    Ok(Json(UserProfile::from(&user)))
}

/// Updates profile fields of a user.
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateUserInput>,
) -> Result<Json<User>, AppError> {
    let id = parse_uuid(&id)?;
    let mut user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::user_not_found(id))?;
    if let Some(name) = input.name {
        user.name = name;
    }
    if let Some(nickname) = input.nickname {
        user.nickname = nickname;
    }
    state.users.update(&user).await?;
    Ok(Json(user))
}

/// Deletes a user and cascades the cart, favorites and reviews explicitly.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_uuid(&id)?;
    state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::user_not_found(id))?;
    state.cart_store.delete(id).await?;
    state.favorites.delete_by_user(id).await?;
    state.reviews.delete_by_user(id).await?;
    state.users.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Marks a videogame as a favorite of a user. Existing favorites are
/// returned unchanged instead of duplicated.
pub async fn create_favorite(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(input): Json<CreateFavoriteInput>,
) -> Result<(StatusCode, Json<Favorite>), AppError> {
    let user_id = parse_uuid(&user_id)?;
    state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::user_not_found(user_id))?;
    state
        .videogames
        .find_by_id(input.videogame_id)
        .await?
        .ok_or_else(|| AppError::videogame_not_found(input.videogame_id))?;
    if let Some(favorite) = state
        .favorites
        .find_by_user_and_videogame(user_id, input.videogame_id)
        .await?
    {
        return Ok((StatusCode::OK, Json(favorite)));
    }
    let favorite = Favorite {
        id: Uuid::new(),
        user_id,
        videogame_id: input.videogame_id,
    };
    state.favorites.insert(&favorite).await?;
    Ok((StatusCode::CREATED, Json(favorite)))
}

/// Retrieves the favorites of a user with their videogames resolved by an
/// explicit join call.
pub async fn list_favorites(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<FavoriteWithVideogame>>, AppError> {
    let user_id = parse_uuid(&user_id)?;
    state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::user_not_found(user_id))?;
    let favorites = state.favorites.find_by_user(user_id).await?;
    let mut joined = Vec::with_capacity(favorites.len());
    for favorite in favorites {
        if let Some(videogame) = state.videogames.find_by_id(favorite.videogame_id).await? {
            joined.push(FavoriteWithVideogame {
                id: favorite.id,
                videogame: VideogameSummary::from(&videogame),
            });
        }
    }
    Ok(Json(joined))
}

/// Deletes a favorite of a specific id. A no-op when absent.
pub async fn delete_favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_uuid(&id)?;
    state.favorites.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
