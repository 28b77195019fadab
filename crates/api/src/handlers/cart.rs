//! Handlers for the `/cart` resource.
//!
//! The client keeps an optimistic local cart and syncs it wholesale with
//! `PUT /cart`; single-item endpoints apply one change server-side.
//! Concurrent syncs are last-write-wins.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use koda_core::cart::LocalCart;
use koda_core::error::CoreError;
use koda_core::types::DbId;
use koda_db::models::listing::Listing;
use koda_db::models::user::User;
use koda_db::repositories::{CartRepo, ListingRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /cart`.
#[derive(Debug, Deserialize)]
pub struct SyncCartRequest {
    /// Listing ids in display order. Duplicates are dropped.
    pub items: Vec<DbId>,
}

type CartResponse = Json<DataResponse<Vec<Listing>>>;

async fn loaded(state: &AppState, user: &User) -> AppResult<CartResponse> {
    let listings = CartRepo::load(&state.pool, &user.clerk_id).await?;
    Ok(Json(DataResponse { data: listings }))
}

async fn store(state: &AppState, user: &User, cart: &LocalCart) -> AppResult<()> {
    if !CartRepo::save(&state.pool, &user.clerk_id, cart).await? {
        return Err(AppError::Core(CoreError::not_found("User", user.id)));
    }
    Ok(())
}

/// GET /api/v1/cart
///
/// Listings that no longer exist are left out.
pub async fn get_cart(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<CartResponse> {
    loaded(&state, &user).await
}

/// PUT /api/v1/cart
pub async fn sync_cart(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<SyncCartRequest>,
) -> AppResult<CartResponse> {
    let cart = LocalCart::from_ids(input.items);
    store(&state, &user, &cart).await?;
    tracing::debug!(user_id = user.id, items = cart.len(), "Cart synced");
    loaded(&state, &user).await
}

/// DELETE /api/v1/cart
pub async fn clear_cart(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<StatusCode> {
    CartRepo::clear(&state.pool, &user.clerk_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/cart/items/{listing_id}
///
/// Adding a listing that is already in the cart is a no-op. Sellers cannot
/// add their own listings.
pub async fn add_item(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(listing_id): Path<DbId>,
) -> AppResult<CartResponse> {
    let listing = ListingRepo::find_by_id(&state.pool, listing_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Listing", listing_id)))?;
    if listing.seller_id == user.clerk_id {
        return Err(AppError::Core(CoreError::invalid(
            "listing_id",
            "not_own",
            "You cannot add your own listing to the cart",
        )));
    }

    let mut cart = CartRepo::ids(&state.pool, &user.clerk_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("User", user.id)))?;
    if cart.add(listing_id) {
        store(&state, &user, &cart).await?;
    }
    loaded(&state, &user).await
}

/// DELETE /api/v1/cart/items/{listing_id}
pub async fn remove_item(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(listing_id): Path<DbId>,
) -> AppResult<CartResponse> {
    CartRepo::remove_item(&state.pool, &user.clerk_id, listing_id).await?;
    loaded(&state, &user).await
}
