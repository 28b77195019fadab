//! Handlers for the current user's account (`/users/me`).

use axum::extract::State;
use axum::Json;
use koda_core::error::CoreError;
use koda_core::profile::{validate_profile_update, ProfileUpdate};
use koda_core::readiness::SaleReadiness;
use koda_db::models::user::{UpdatePaymentAccount, User};
use koda_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::state::AppState;

fn user_not_found(user: &User) -> AppError {
    AppError::Core(CoreError::not_found("User", user.id))
}

/// GET /api/v1/users/me
///
/// The first call for a new identity provisions the user.
pub async fn get_me(CurrentUser(user): CurrentUser) -> AppResult<Json<User>> {
    Ok(Json(user))
}

/// PUT /api/v1/users/me
pub async fn update_me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<ProfileUpdate>,
) -> AppResult<Json<User>> {
    let update = validate_profile_update(&input)?;
    let updated = UserRepo::update_profile(&state.pool, &user.clerk_id, &update)
        .await?
        .ok_or_else(|| user_not_found(&user))?;
    Ok(Json(updated))
}

/// PUT /api/v1/users/me/payment-account
///
/// Called when the payment processor's onboarding flow returns.
pub async fn update_payment_account(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<UpdatePaymentAccount>,
) -> AppResult<Json<SaleReadiness>> {
    let account_id = input.stripe_account_id.trim();
    if account_id.is_empty() {
        return Err(AppError::Core(CoreError::invalid(
            "stripe_account_id",
            "required",
            "stripe_account_id is required",
        )));
    }
    let input = UpdatePaymentAccount {
        stripe_account_id: account_id.to_string(),
        onboarding_complete: input.onboarding_complete,
    };

    let updated = UserRepo::update_payment_account(&state.pool, &user.clerk_id, &input)
        .await?
        .ok_or_else(|| user_not_found(&user))?;
    tracing::info!(
        user_id = updated.id,
        onboarding_complete = updated.onboarding_complete,
        "Payment account linked",
    );
    Ok(Json(updated.sale_readiness()))
}

/// GET /api/v1/users/me/sale-readiness
pub async fn sale_readiness(CurrentUser(user): CurrentUser) -> AppResult<Json<SaleReadiness>> {
    Ok(Json(user.sale_readiness()))
}
