use axum::routing::post;
use axum::Router;

use crate::handlers::webhooks;
use crate::state::AppState;

/// Routes mounted at `/webhooks`. Authenticated by signature, not token.
///
/// ```text
/// POST   /payments    -> payment_completed
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/payments", post(webhooks::payment_completed))
}
