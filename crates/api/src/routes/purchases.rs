//! Route definitions for the `/purchases` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::purchases;
use crate::state::AppState;

/// Routes mounted at `/purchases`.
///
/// ```text
/// GET    /                      -> list_mine (as buyer)
/// GET    /sales                 -> list_sales (as seller)
/// GET    /sales/summary         -> sales_summary
/// GET    /check/{product_id}    -> check
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(purchases::list_mine))
        .route("/sales", get(purchases::list_sales))
        .route("/sales/summary", get(purchases::sales_summary))
        .route("/check/{product_id}", get(purchases::check))
}
