pub mod admin;
pub mod cart;
pub mod conversations;
pub mod favorites;
pub mod health;
pub mod listings;
pub mod purchases;
pub mod users;
pub mod webhooks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /listings                          catalog (public reads, seller writes)
/// /purchases                         ledger views for buyer and seller
/// /cart                              persisted cart
/// /favorites                         favorites
/// /users/me                          current user profile and payouts
/// /conversations                     direct messages
/// /admin/users                       moderation (admin only)
/// /webhooks/payments                 payment completion (signed)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/listings", listings::router())
        .nest("/purchases", purchases::router())
        .nest("/cart", cart::router())
        .nest("/favorites", favorites::router())
        .nest("/users", users::router())
        .nest("/conversations", conversations::router())
        .nest("/admin", admin::router())
        .nest("/webhooks", webhooks::router())
}
