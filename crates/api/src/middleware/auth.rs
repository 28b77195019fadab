//! Bearer-token extractors for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use koda_core::error::CoreError;
use koda_core::roles::{is_known_role, ROLE_USER};
use koda_db::models::user::{ProvisionUser, User};
use koda_db::repositories::UserRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Identity extracted from a verified Bearer token in the `Authorization`
/// header. Does not touch the database.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// External identity id (from `claims.sub`).
    pub clerk_id: String,
    pub email: Option<String>,
    /// Role asserted by the token. Missing or unknown roles become `user`.
    pub role: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.identity).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        let role = match claims.role_or_default() {
            r if is_known_role(r) => r.to_string(),
            _ => ROLE_USER.to_string(),
        };

        Ok(AuthUser {
            role,
            clerk_id: claims.sub,
            email: claims.email,
        })
    }
}

/// The authenticated user's stored row, provisioned on first sight.
///
/// Rejects banned users with 403. Use this for every marketplace operation:
///
/// ```ignore
/// async fn my_handler(CurrentUser(user): CurrentUser) -> AppResult<Json<User>> {
///     Ok(Json(user))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = AuthUser::from_request_parts(parts, state).await?;
        let user = UserRepo::ensure_exists(
            &state.pool,
            &ProvisionUser {
                clerk_id: auth.clerk_id,
                email: auth.email,
                role: auth.role,
            },
        )
        .await?;

        if user.is_banned {
            tracing::warn!(user_id = user.id, clerk_id = %user.clerk_id, "Banned user rejected");
            return Err(AppError::Core(CoreError::Forbidden(
                "Your account has been banned".into(),
            )));
        }
        Ok(CurrentUser(user))
    }
}
