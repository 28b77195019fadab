//! Handlers for the `/favorites` resource.

use axum::extract::{Path, State};
use axum::Json;
use koda_core::error::CoreError;
use koda_core::types::DbId;
use koda_db::models::listing::Listing;
use koda_db::repositories::{FavoriteRepo, ListingRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct FavoriteStatus {
    pub listing_id: DbId,
    pub favorited: bool,
}

/// GET /api/v1/favorites
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<DataResponse<Vec<Listing>>>> {
    let listings = FavoriteRepo::load(&state.pool, &user.clerk_id).await?;
    Ok(Json(DataResponse { data: listings }))
}

/// POST /api/v1/favorites/{listing_id}
pub async fn add(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(listing_id): Path<DbId>,
) -> AppResult<Json<FavoriteStatus>> {
    if ListingRepo::find_by_id(&state.pool, listing_id).await?.is_none() {
        return Err(AppError::Core(CoreError::not_found("Listing", listing_id)));
    }
    FavoriteRepo::add(&state.pool, &user.clerk_id, listing_id).await?;
    Ok(Json(FavoriteStatus {
        listing_id,
        favorited: true,
    }))
}

/// DELETE /api/v1/favorites/{listing_id}
pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(listing_id): Path<DbId>,
) -> AppResult<Json<FavoriteStatus>> {
    FavoriteRepo::remove(&state.pool, &user.clerk_id, listing_id).await?;
    Ok(Json(FavoriteStatus {
        listing_id,
        favorited: false,
    }))
}
