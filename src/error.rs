use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Error raised by a repository backend.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{0} failed in the data store.")]
    Backend(String),
}

/// Errors surfaced to HTTP callers.
///
/// `NotFound` covers missing users, videogames and favorites, `Validation`
/// covers malformed payloads and `Internal` covers persistence failures.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("Internal error: {0}")]
    Internal(#[from] RepositoryError),
}

impl AppError {
    /// Builds the `NotFound` error for a missing videogame.
    pub fn videogame_not_found(id: bson::Uuid) -> Self {
        AppError::NotFound(format!(
            "Videogame with UUID: `{}` is not present in the system.",
            id
        ))
    }

    /// Builds the `NotFound` error for a missing user.
    pub fn user_not_found(id: bson::Uuid) -> Self {
        AppError::NotFound(format!("User with UUID: `{}` not found.", id))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
