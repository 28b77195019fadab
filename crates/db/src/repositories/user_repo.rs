//! Repository for the `users` table.

use koda_core::profile::ProfileUpdate;
use koda_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{ProvisionUser, UpdatePaymentAccount, User, UserDeletion};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, clerk_id, email, first_name, last_name, image_url, bio, \
                       stripe_account_id, onboarding_complete, role, is_banned, \
                       cart, favorites, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by their identity-provider id.
    pub async fn find_by_clerk_id(
        pool: &PgPool,
        clerk_id: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE clerk_id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(clerk_id)
            .fetch_optional(pool)
            .await
    }

    /// Return the user for `input.clerk_id`, creating it on first sight.
    ///
    /// An existing row is returned unchanged, so the stored role stays
    /// authoritative over later claims. Concurrent first requests converge
    /// on a single row.
    pub async fn ensure_exists(pool: &PgPool, input: &ProvisionUser) -> Result<User, sqlx::Error> {
        if let Some(user) = Self::find_by_clerk_id(pool, &input.clerk_id).await? {
            return Ok(user);
        }

        let query = format!(
            "INSERT INTO users (clerk_id, email, role)
             VALUES ($1, $2, $3)
             ON CONFLICT (clerk_id) DO NOTHING
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, User>(&query)
            .bind(&input.clerk_id)
            .bind(&input.email)
            .bind(&input.role)
            .fetch_optional(pool)
            .await?;

        match inserted {
            Some(user) => {
                tracing::info!(user_id = user.id, clerk_id = %user.clerk_id, "User provisioned");
                Ok(user)
            }
            None => Self::find_by_clerk_id(pool, &input.clerk_id)
                .await?
                .ok_or(sqlx::Error::RowNotFound),
        }
    }

    /// List users, oldest first.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users ORDER BY created_at ASC, id ASC LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update profile fields. Absent fields keep their current value; callers
    /// validate with `validate_profile_update` first.
    pub async fn update_profile(
        pool: &PgPool,
        clerk_id: &str,
        input: &ProfileUpdate,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                email = COALESCE($2, email),
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                image_url = COALESCE($5, image_url),
                bio = COALESCE($6, bio)
             WHERE clerk_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(clerk_id)
            .bind(&input.email)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.image_url)
            .bind(&input.bio)
            .fetch_optional(pool)
            .await
    }

    /// Link a payment account and record the onboarding state.
    pub async fn update_payment_account(
        pool: &PgPool,
        clerk_id: &str,
        input: &UpdatePaymentAccount,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET stripe_account_id = $2, onboarding_complete = $3
             WHERE clerk_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(clerk_id)
            .bind(&input.stripe_account_id)
            .bind(input.onboarding_complete)
            .fetch_optional(pool)
            .await
    }

    pub async fn set_banned(
        pool: &PgPool,
        id: DbId,
        banned: bool,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("UPDATE users SET is_banned = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(banned)
            .fetch_optional(pool)
            .await
    }

    pub async fn set_role(pool: &PgPool, id: DbId, role: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("UPDATE users SET role = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(role)
            .fetch_optional(pool)
            .await
    }

    /// Delete a user together with their listings and conversations.
    ///
    /// Purchases stay in the ledger. Returns `None` if the user does not
    /// exist. All deletes run in one transaction.
    pub async fn delete_cascade(pool: &PgPool, id: DbId) -> Result<Option<UserDeletion>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let clerk_id: Option<String> =
            sqlx::query_scalar("DELETE FROM users WHERE id = $1 RETURNING clerk_id")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(clerk_id) = clerk_id else {
            return Ok(None);
        };

        let listings_deleted = sqlx::query("DELETE FROM products WHERE seller_id = $1")
            .bind(&clerk_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let conversations_deleted = sqlx::query(
            "DELETE FROM conversations WHERE participant_a = $1 OR participant_b = $1",
        )
        .bind(&clerk_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;

        tracing::info!(
            user_id = id,
            clerk_id = %clerk_id,
            listings_deleted,
            conversations_deleted,
            "User deleted",
        );
        Ok(Some(UserDeletion {
            clerk_id,
            listings_deleted,
            conversations_deleted,
        }))
    }
}
