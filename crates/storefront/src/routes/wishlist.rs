//! Wishlist route handlers.
//!
//! Every handler requires a bearer token. The `userId` named by the request
//! must be the authenticated user's own id.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use tracing::instrument;

use estore_core::{Wishlist, WishlistRequest};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireAuth;
use crate::services::WishlistService;
use crate::state::AppState;

/// `POST /wishlist/add`
#[instrument(skip_all, fields(caller = %user.id))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    body: std::result::Result<Json<WishlistRequest>, JsonRejection>,
) -> Result<Json<Wishlist>> {
    let Json(request) = body.map_err(AppError::from)?;
    let wishlist = WishlistService::new(state.wishlists(), &user)
        .add(request.user_id.as_deref(), request.product_id.as_deref())
        .await?;

    if let Some(product_id) = request.product_id.as_deref() {
        add_breadcrumb("wishlist", "Added product", Some(&[("product_id", product_id)]));
    }
    Ok(Json(wishlist))
}

/// `GET /wishlist/{userId}`
#[instrument(skip_all, fields(caller = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(user_id): Path<String>,
) -> Result<Json<Wishlist>> {
    let wishlist = WishlistService::new(state.wishlists(), &user)
        .get(&user_id)
        .await?;
    Ok(Json(wishlist))
}

/// `POST /wishlist/remove`
#[instrument(skip_all, fields(caller = %user.id))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    body: std::result::Result<Json<WishlistRequest>, JsonRejection>,
) -> Result<Json<Wishlist>> {
    let Json(request) = body.map_err(AppError::from)?;
    let wishlist = WishlistService::new(state.wishlists(), &user)
        .remove(request.user_id.as_deref(), request.product_id.as_deref())
        .await?;

    if let Some(product_id) = request.product_id.as_deref() {
        add_breadcrumb("wishlist", "Removed product", Some(&[("product_id", product_id)]));
    }
    Ok(Json(wishlist))
}
