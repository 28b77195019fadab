//! Route definitions for the `/listings` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::listings;
use crate::state::AppState;

/// Routes mounted at `/listings`.
///
/// ```text
/// GET    /                 -> list (public)
/// POST   /                 -> create (sale-ready seller)
/// GET    /{id}             -> get_by_id (public)
/// PUT    /{id}             -> update (owner)
/// GET    /{id}/download    -> download (owner or buyer)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(listings::list).post(listings::create))
        .route("/{id}", get(listings::get_by_id).put(listings::update))
        .route("/{id}/download", get(listings::download))
}
