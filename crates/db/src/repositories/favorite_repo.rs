//! Favorites stored as an id array on the user row.

use koda_core::types::DbId;
use sqlx::PgPool;

use crate::models::listing::{decode_rows, Listing, ProductRow};
use crate::repositories::listing_repo::PRODUCT_COLUMNS;

pub struct FavoriteRepo;

impl FavoriteRepo {
    /// Favorited listings in the order they were added. Dangling ids are skipped.
    pub async fn load(pool: &PgPool, clerk_id: &str) -> Result<Vec<Listing>, sqlx::Error> {
        let query = format!(
            "SELECT {PRODUCT_COLUMNS}
             FROM users u
             CROSS JOIN LATERAL unnest(u.favorites) WITH ORDINALITY AS f(product_id, position)
             JOIN products p ON p.id = f.product_id
             WHERE u.clerk_id = $1
             ORDER BY f.position"
        );
        let rows = sqlx::query_as::<_, ProductRow>(&query)
            .bind(clerk_id)
            .fetch_all(pool)
            .await?;
        decode_rows(rows)
    }

    /// Add a listing. Adding one that is already a favorite is a no-op.
    ///
    /// Returns `true` if the favorites changed.
    pub async fn add(pool: &PgPool, clerk_id: &str, product_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET favorites = array_append(favorites, $2)
             WHERE clerk_id = $1 AND NOT ($2 = ANY(favorites))",
        )
        .bind(clerk_id)
        .bind(product_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a listing. Returns `true` if it was a favorite.
    pub async fn remove(pool: &PgPool, clerk_id: &str, product_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET favorites = array_remove(favorites, $2)
             WHERE clerk_id = $1 AND $2 = ANY(favorites)",
        )
        .bind(clerk_id)
        .bind(product_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
