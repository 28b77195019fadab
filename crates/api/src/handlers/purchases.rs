//! Handlers for the `/purchases` resource.
//!
//! Read-only views of the ledger for the current user as buyer and seller.

use axum::extract::{Path, Query, State};
use axum::Json;
use koda_core::types::DbId;
use koda_db::models::purchase::{CategorySales, Purchase, SalesSummary};
use koda_db::repositories::PurchaseRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::CurrentUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Seller analytics: overall totals plus a per-category breakdown.
#[derive(Debug, Serialize)]
pub struct SalesReport {
    #[serde(flatten)]
    pub totals: SalesSummary,
    pub by_category: Vec<CategorySales>,
}

#[derive(Debug, Serialize)]
pub struct PurchaseCheck {
    pub product_id: DbId,
    pub purchased: bool,
}

/// GET /api/v1/purchases
pub async fn list_mine(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Purchase>>>> {
    let purchases =
        PurchaseRepo::list_for_buyer(&state.pool, &user.clerk_id, page.limit(), page.offset())
            .await?;
    Ok(Json(DataResponse { data: purchases }))
}

/// GET /api/v1/purchases/sales
pub async fn list_sales(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Purchase>>>> {
    let sales =
        PurchaseRepo::list_for_seller(&state.pool, &user.clerk_id, page.limit(), page.offset())
            .await?;
    Ok(Json(DataResponse { data: sales }))
}

/// GET /api/v1/purchases/sales/summary
pub async fn sales_summary(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<SalesReport>> {
    let totals = PurchaseRepo::sales_summary(&state.pool, &user.clerk_id).await?;
    let by_category = PurchaseRepo::sales_by_category(&state.pool, &user.clerk_id).await?;
    Ok(Json(SalesReport {
        totals,
        by_category,
    }))
}

/// GET /api/v1/purchases/check/{product_id}
pub async fn check(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(product_id): Path<DbId>,
) -> AppResult<Json<PurchaseCheck>> {
    let purchased = PurchaseRepo::has_purchased(&state.pool, &user.clerk_id, product_id).await?;
    Ok(Json(PurchaseCheck {
        product_id,
        purchased,
    }))
}
