use axum::routing::{get, post};
use axum::Router;

use crate::handlers::favorites;
use crate::state::AppState;

/// Routes mounted at `/favorites`.
///
/// ```text
/// GET    /                 -> list
/// POST   /{listing_id}     -> add
/// DELETE /{listing_id}     -> remove
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(favorites::list))
        .route(
            "/{listing_id}",
            post(favorites::add).delete(favorites::remove),
        )
}
