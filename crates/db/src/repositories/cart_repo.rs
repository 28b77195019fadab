//! Persisted cart stored as an ordered id array on the user row.

use koda_core::cart::LocalCart;
use koda_core::types::DbId;
use sqlx::PgPool;

use crate::models::listing::{decode_rows, Listing, ProductRow};
use crate::repositories::listing_repo::PRODUCT_COLUMNS;

pub struct CartRepo;

impl CartRepo {
    /// Stored cart ids in insertion order. `None` if the user is unknown.
    pub async fn ids(pool: &PgPool, clerk_id: &str) -> Result<Option<LocalCart>, sqlx::Error> {
        let ids: Option<Vec<DbId>> = sqlx::query_scalar("SELECT cart FROM users WHERE clerk_id = $1")
            .bind(clerk_id)
            .fetch_optional(pool)
            .await?;
        Ok(ids.map(LocalCart::from_ids))
    }

    /// Resolve the stored cart to listings, preserving cart order.
    ///
    /// Ids whose listing no longer exists are skipped.
    pub async fn load(pool: &PgPool, clerk_id: &str) -> Result<Vec<Listing>, sqlx::Error> {
        let query = format!(
            "SELECT {PRODUCT_COLUMNS}
             FROM users u
             CROSS JOIN LATERAL unnest(u.cart) WITH ORDINALITY AS c(product_id, position)
             JOIN products p ON p.id = c.product_id
             WHERE u.clerk_id = $1
             ORDER BY c.position"
        );
        let rows = sqlx::query_as::<_, ProductRow>(&query)
            .bind(clerk_id)
            .fetch_all(pool)
            .await?;
        decode_rows(rows)
    }

    /// Replace the stored cart wholesale. Returns `false` if the user is unknown.
    pub async fn save(pool: &PgPool, clerk_id: &str, cart: &LocalCart) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET cart = $2 WHERE clerk_id = $1")
            .bind(clerk_id)
            .bind(cart.ids())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Drop one listing from the stored cart, if present.
    pub async fn remove_item(
        pool: &PgPool,
        clerk_id: &str,
        product_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET cart = array_remove(cart, $2)
             WHERE clerk_id = $1 AND $2 = ANY(cart)",
        )
        .bind(clerk_id)
        .bind(product_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn clear(pool: &PgPool, clerk_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET cart = '{}' WHERE clerk_id = $1")
            .bind(clerk_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
