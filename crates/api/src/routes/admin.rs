use axum::routing::{get, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`. All require the `admin` role.
///
/// ```text
/// GET    /users               -> list_users
/// GET    /users/{id}          -> get_user
/// DELETE /users/{id}          -> delete_user
/// PUT    /users/{id}/ban      -> set_ban
/// PUT    /users/{id}/role     -> set_role
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users))
        .route("/users/{id}", get(admin::get_user).delete(admin::delete_user))
        .route("/users/{id}/ban", put(admin::set_ban))
        .route("/users/{id}/role", put(admin::set_role))
}
