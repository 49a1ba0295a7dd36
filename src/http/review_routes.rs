use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use bson::Uuid;

use crate::error::AppError;
use crate::model::review::Review;

use super::inputs::CreateReviewInput;
use super::{parse_uuid, AppState};

/// Adds a review for a videogame. One review per user and videogame.
pub async fn create_review(
    State(state): State<AppState>,
    Json(input): Json<CreateReviewInput>,
) -> Result<(StatusCode, Json<Review>), AppError> {
    if !(1..=10).contains(&input.score) {
        return Err(AppError::Validation(
            "Review score must be between 1 and 10.".to_string(),
        ));
    }
    state
        .users
        .find_by_id(input.user_id)
        .await?
        .ok_or_else(|| AppError::user_not_found(input.user_id))?;
    state
        .videogames
        .find_by_id(input.videogame_id)
        .await?
        .ok_or_else(|| AppError::videogame_not_found(input.videogame_id))?;
    if state
        .reviews
        .find_by_user_and_videogame(input.user_id, input.videogame_id)
        .await?
        .is_some()
    {
        return Err(AppError::Validation(format!(
            "User with UUID: `{}` already reviewed videogame with UUID: `{}`.",
            input.user_id, input.videogame_id
        )));
    }
    let review = Review {
        id: Uuid::new(),
        videogame_id: input.videogame_id,
        user_id: input.user_id,
        score: input.score,
        text: input.text,
    };
    state.reviews.insert(&review).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// Retrieves the reviews of a videogame of a specific id.
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(videogame_id): Path<String>,
) -> Result<Json<Vec<Review>>, AppError> {
    let videogame_id = parse_uuid(&videogame_id)?;
    state
        .videogames
        .find_by_id(videogame_id)
        .await?
        .ok_or_else(|| AppError::videogame_not_found(videogame_id))?;
    let reviews = state.reviews.find_by_videogame(videogame_id).await?;
    Ok(Json(reviews))
}
