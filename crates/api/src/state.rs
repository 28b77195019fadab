use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: koda_db::DbPool,
    /// Server configuration, including the token and webhook secrets.
    pub config: Arc<ServerConfig>,
    /// Event bus for real-time notifications.
    pub event_bus: Arc<koda_events::EventBus>,
}
