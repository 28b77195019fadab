//! Route definitions for the `/cart` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::cart;
use crate::state::AppState;

/// Routes mounted at `/cart`.
///
/// ```text
/// GET    /                      -> get_cart
/// PUT    /                      -> sync_cart
/// DELETE /                      -> clear_cart
/// POST   /items/{listing_id}    -> add_item
/// DELETE /items/{listing_id}    -> remove_item
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(cart::get_cart).put(cart::sync_cart).delete(cart::clear_cart),
        )
        .route(
            "/items/{listing_id}",
            post(cart::add_item).delete(cart::remove_item),
        )
}
