//! Handlers for the `/admin` resource (user moderation).
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use axum::extract::{Path, Query, State};
use axum::Json;
use koda_core::error::CoreError;
use koda_core::roles::{is_known_role, ROLE_ADMIN};
use koda_core::types::DbId;
use koda_db::models::user::{User, UserDeletion};
use koda_db::repositories::UserRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `PUT /admin/users/{id}/ban`.
#[derive(Debug, Deserialize)]
pub struct BanRequest {
    pub banned: bool,
}

/// Request body for `PUT /admin/users/{id}/role`.
#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    pub role: String,
}

fn user_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::not_found("User", id))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<User>>>> {
    let users = UserRepo::list(&state.pool, page.limit(), page.offset()).await?;
    Ok(Json(DataResponse { data: users }))
}

/// GET /api/v1/admin/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<User>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| user_not_found(id))?;
    Ok(Json(user))
}

/// PUT /api/v1/admin/users/{id}/ban
///
/// Bans or unbans a user. Admins cannot ban themselves.
pub async fn set_ban(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<BanRequest>,
) -> AppResult<Json<User>> {
    if id == admin.id && input.banned {
        return Err(AppError::Core(CoreError::Forbidden(
            "Admins cannot ban themselves".into(),
        )));
    }

    let user = UserRepo::set_banned(&state.pool, id, input.banned)
        .await?
        .ok_or_else(|| user_not_found(id))?;
    tracing::info!(admin_id = admin.id, user_id = id, banned = input.banned, "User ban updated");
    Ok(Json(user))
}

/// PUT /api/v1/admin/users/{id}/role
///
/// Admins cannot demote themselves.
pub async fn set_role(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<RoleRequest>,
) -> AppResult<Json<User>> {
    let role = input.role.trim();
    if !is_known_role(role) {
        return Err(AppError::Core(CoreError::invalid(
            "role",
            "one_of",
            format!("role must be one of: user, admin (got '{role}')"),
        )));
    }
    if id == admin.id && role != ROLE_ADMIN {
        return Err(AppError::Core(CoreError::Forbidden(
            "Admins cannot demote themselves".into(),
        )));
    }

    let user = UserRepo::set_role(&state.pool, id, role)
        .await?
        .ok_or_else(|| user_not_found(id))?;
    tracing::info!(admin_id = admin.id, user_id = id, role, "User role updated");
    Ok(Json(user))
}

/// DELETE /api/v1/admin/users/{id}
///
/// Deletes the user with their listings and conversations. Purchases stay
/// in the ledger.
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserDeletion>> {
    if id == admin.id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Admins cannot delete themselves".into(),
        )));
    }

    let deletion = UserRepo::delete_cascade(&state.pool, id)
        .await?
        .ok_or_else(|| user_not_found(id))?;
    tracing::info!(admin_id = admin.id, user_id = id, "User deleted by admin");
    Ok(Json(deletion))
}
