use axum::{
    debug_handler,
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::AppError;
use crate::model::cart::{Cart, CartLineItem};

use super::{parse_uuid, AppState};

/// Identifies the cart owner on cart endpoints.
///
/// The identity provider is an external collaborator; callers pass the user
/// id directly.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartOwnerQuery {
    pub user_id: String,
}

/// Cart owner plus the optional count of copies to add.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartQuery {
    pub user_id: String,
    pub quantity: Option<u32>,
}

/// Retrieves the cart of a user, empty when none exists.
#[debug_handler(state = AppState)]
pub async fn get_cart(
    State(state): State<AppState>,
    Query(query): Query<CartOwnerQuery>,
) -> Result<Json<Cart>, AppError> {
    let owner_id = parse_uuid(&query.user_id)?;
    let cart = state.cart_store.cart(owner_id).await?;
    Ok(Json(cart))
}

/// Merges the posted client cart snapshot with the server cart.
///
/// Returns the reconciled cart for the client to write back to its durable
/// cache.
#[debug_handler(state = AppState)]
pub async fn reconcile_cart(
    State(state): State<AppState>,
    Query(query): Query<CartOwnerQuery>,
    Json(snapshot): Json<Vec<CartLineItem>>,
) -> Result<Json<Cart>, AppError> {
    let owner_id = parse_uuid(&query.user_id)?;
    let cart = state.cart_store.reconcile(owner_id, &snapshot).await?;
    Ok(Json(cart))
}

/// Adds copies of one videogame to the cart and returns the updated line
/// item.
#[debug_handler(state = AppState)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Path(videogame_id): Path<String>,
    Query(query): Query<AddToCartQuery>,
) -> Result<Json<CartLineItem>, AppError> {
    let owner_id = parse_uuid(&query.user_id)?;
    let videogame_id = parse_uuid(&videogame_id)?;
    let quantity = query.quantity.unwrap_or(1);
    let cart = state
        .cart_store
        .add_item(owner_id, videogame_id, quantity)
        .await?;
    let line_item = cart
        .line_item(videogame_id)
        .cloned()
        .ok_or_else(|| AppError::videogame_not_found(videogame_id))?;
    Ok(Json(line_item))
}

/// Deletes one videogame from the cart and returns the updated cart.
#[debug_handler(state = AppState)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    Path(videogame_id): Path<String>,
    Query(query): Query<CartOwnerQuery>,
) -> Result<Json<Cart>, AppError> {
    let owner_id = parse_uuid(&query.user_id)?;
    let videogame_id = parse_uuid(&videogame_id)?;
    let cart = state.cart_store.remove_item(owner_id, videogame_id).await?;
    Ok(Json(cart))
}
