use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use bson::Uuid;
use serde::Deserialize;

use crate::error::AppError;
use crate::model::order_datatypes::{CatalogOrder, OrderDirection, VideogameOrderField};
use crate::model::page::Page;
use crate::model::videogame::Videogame;
use crate::repository::CatalogQuery;

use super::inputs::CreateVideogameInput;
use super::{parse_uuid, AppState};

/// Listing parameters of the catalog endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogListQuery {
    /// Case-insensitive substring filter on the videogame name.
    pub name: Option<String>,
    /// Describes that the `first` N videogames should be retrieved.
    pub first: Option<u32>,
    /// Describes how many videogames should be skipped at the beginning.
    pub skip: Option<u64>,
    /// Field that videogames should be ordered by.
    pub field: Option<VideogameOrderField>,
    /// Order direction of videogames.
    pub direction: Option<OrderDirection>,
}

/// Retrieves one page of the videogame catalog.
pub async fn list_videogames(
    State(state): State<AppState>,
    Query(query): Query<CatalogListQuery>,
) -> Result<Json<Page<Videogame>>, AppError> {
    let catalog_query = CatalogQuery {
        name: query.name,
        first: query.first,
        skip: query.skip,
        order: CatalogOrder {
            direction: query.direction,
            field: query.field,
        },
    };
    let page = state.videogames.find_page(&catalog_query).await?;
    Ok(Json(page))
}

/// Retrieves a videogame of a specific id.
pub async fn get_videogame(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Videogame>, AppError> {
    let id = parse_uuid(&id)?;
    let videogame = state
        .videogames
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::videogame_not_found(id))?;
    Ok(Json(videogame))
}

/// Adds a videogame to the catalog.
pub async fn create_videogame(
    State(state): State<AppState>,
    Json(input): Json<CreateVideogameInput>,
) -> Result<(StatusCode, Json<Videogame>), AppError> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation(
            "Videogame name must not be empty.".to_string(),
        ));
    }
    if input.price < 0.0 {
        return Err(AppError::Validation(
            "Videogame price must not be negative.".to_string(),
        ));
    }
    let videogame = Videogame {
        id: Uuid::new(),
        name: input.name,
        price: input.price,
        image: input.image,
    };
    state.videogames.insert(&videogame).await?;
    Ok((StatusCode::CREATED, Json(videogame)))
}
