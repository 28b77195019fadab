//! Route definitions for the `/conversations` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::conversations;
use crate::state::AppState;

/// Routes mounted at `/conversations`.
///
/// ```text
/// GET    /                   -> list
/// POST   /                   -> start
/// GET    /unread-count       -> unread_count
/// GET    /{id}/messages      -> list_messages
/// POST   /{id}/messages      -> send_message
/// POST   /{id}/read          -> mark_read
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(conversations::list).post(conversations::start))
        .route("/unread-count", get(conversations::unread_count))
        .route(
            "/{id}/messages",
            get(conversations::list_messages).post(conversations::send_message),
        )
        .route("/{id}/read", post(conversations::mark_read))
}
