//! User entity model and DTOs.

use koda_core::readiness::SaleReadiness;
use koda_core::roles::ROLE_ADMIN;
use koda_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    /// External identity-provider id; the value stored as `seller_id`,
    /// `buyer_id` and `sender_id` elsewhere.
    pub clerk_id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
    pub bio: Option<String>,
    pub stripe_account_id: Option<String>,
    pub onboarding_complete: bool,
    pub role: String,
    pub is_banned: bool,
    pub cart: Vec<DbId>,
    pub favorites: Vec<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    pub fn sale_readiness(&self) -> SaleReadiness {
        SaleReadiness::evaluate(self.stripe_account_id.as_deref(), self.onboarding_complete)
    }
}

/// Identity claims used to provision a user on first sight.
#[derive(Debug, Clone)]
pub struct ProvisionUser {
    pub clerk_id: String,
    pub email: Option<String>,
    pub role: String,
}

/// DTO for linking a payment account after processor onboarding.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePaymentAccount {
    pub stripe_account_id: String,
    pub onboarding_complete: bool,
}

/// What a cascading account deletion removed.
#[derive(Debug, Clone, Serialize)]
pub struct UserDeletion {
    pub clerk_id: String,
    pub listings_deleted: u64,
    pub conversations_deleted: u64,
}
