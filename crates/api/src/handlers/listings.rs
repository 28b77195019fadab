//! Handlers for the `/listings` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use koda_core::catalog::{validate_listing_input, Category, ListingInput, ListingPatch, ListingSort};
use koda_core::error::CoreError;
use koda_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use koda_core::types::DbId;
use koda_db::models::listing::{Listing, ListingFilter};
use koda_db::repositories::{ListingRepo, PurchaseRepo};
use koda_events::{PlatformEvent, EVENT_LISTING_CREATED};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /listings`.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub category: Option<String>,
    pub tag: Option<String>,
    pub seller_id: Option<String>,
    /// Case-insensitive title search.
    pub q: Option<String>,
    pub sort: Option<ListingSort>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListingQuery {
    fn into_filter(self) -> Result<ListingFilter, CoreError> {
        let category = non_blank(self.category)
            .map(|c| {
                c.parse::<Category>().map_err(|e| {
                    CoreError::invalid("category", "one_of", e.to_string())
                })
            })
            .transpose()?;

        Ok(ListingFilter {
            category,
            tag: non_blank(self.tag),
            seller_id: non_blank(self.seller_id),
            search: non_blank(self.q),
            sort: self.sort.unwrap_or_default(),
            limit: clamp_limit(self.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE),
            offset: clamp_offset(self.offset),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Response body for `GET /listings/{id}/download`.
#[derive(Debug, Serialize)]
pub struct DownloadResponse {
    pub listing_id: DbId,
    pub file_url: String,
}

fn listing_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::not_found("Listing", id))
}

/// GET /api/v1/listings
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListingQuery>,
) -> AppResult<Json<DataResponse<Vec<Listing>>>> {
    let filter = params.into_filter()?;
    let listings = ListingRepo::query(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: listings }))
}

/// POST /api/v1/listings
///
/// The seller must be sale-ready. Every invalid field is reported at once.
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<ListingInput>,
) -> AppResult<(StatusCode, Json<Listing>)> {
    user.sale_readiness().ensure_ready()?;
    let new_listing = validate_listing_input(&user.clerk_id, &input)?;

    let listing = ListingRepo::create(&state.pool, &new_listing).await?;
    tracing::info!(listing_id = listing.id, seller_id = %listing.seller_id, kind = listing.kind(), "Listing created");

    state.event_bus.publish(
        PlatformEvent::new(EVENT_LISTING_CREATED)
            .with_source("listing", listing.id)
            .with_actor(listing.seller_id.clone())
            .with_payload(serde_json::json!({
                "title": listing.title,
                "category": listing.category,
            })),
    );

    Ok((StatusCode::CREATED, Json(listing)))
}

/// GET /api/v1/listings/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Listing>> {
    let listing = ListingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| listing_not_found(id))?;
    Ok(Json(listing))
}

/// PUT /api/v1/listings/{id}
///
/// Only the seller may edit, and only title, description, price and
/// preview image. Other fields in the body are ignored.
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<DbId>,
    Json(patch): Json<ListingPatch>,
) -> AppResult<Json<Listing>> {
    let listing = ListingRepo::update_by_owner(&state.pool, &user.clerk_id, id, &patch).await?;
    Ok(Json(listing))
}

/// GET /api/v1/listings/{id}/download
///
/// Returns the artifact URL to the seller and to buyers who purchased it.
pub async fn download(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DownloadResponse>> {
    let listing = ListingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| listing_not_found(id))?;

    let allowed = listing.seller_id == user.clerk_id
        || PurchaseRepo::has_purchased(&state.pool, &user.clerk_id, id).await?;
    if !allowed {
        return Err(AppError::Core(CoreError::Forbidden(
            "Purchase required to download".into(),
        )));
    }

    let file_url = listing
        .variant
        .file_url()
        .ok_or_else(|| AppError::BadRequest(format!("Listing {id} has no downloadable file")))?
        .to_string();

    Ok(Json(DownloadResponse {
        listing_id: id,
        file_url,
    }))
}
