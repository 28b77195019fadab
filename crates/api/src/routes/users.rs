use axum::routing::{get, put};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /me                    -> get_me
/// PUT    /me                    -> update_me
/// PUT    /me/payment-account    -> update_payment_account
/// GET    /me/sale-readiness     -> sale_readiness
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(users::get_me).put(users::update_me))
        .route("/me/payment-account", put(users::update_payment_account))
        .route("/me/sale-readiness", get(users::sale_readiness))
}
