//! Repository for the `purchases` ledger.

use koda_core::commission;
use koda_core::error::CoreError;
use koda_core::types::DbId;
use sqlx::PgPool;

use crate::error::DbError;
use crate::models::purchase::{CategorySales, Purchase, RecordPurchase, SalesSummary};

const COLUMNS: &str = "id, product_id, buyer_id, seller_id, amount, net_amount, platform_fee, \
                       category, platform, stripe_session_id, created_at";

/// Provides the append-only purchase ledger.
pub struct PurchaseRepo;

impl PurchaseRepo {
    /// Record a completed payment session with its commission split.
    ///
    /// Each session id is recorded at most once. A replayed session fails
    /// with [`CoreError::DuplicateTransaction`] and leaves the ledger
    /// unchanged.
    pub async fn record(pool: &PgPool, input: &RecordPurchase) -> Result<Purchase, DbError> {
        let split = commission::split(input.gross_amount)?;

        let query = format!(
            "INSERT INTO purchases
                (product_id, buyer_id, seller_id, amount, net_amount, platform_fee,
                 category, platform, stripe_session_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             ON CONFLICT (stripe_session_id) DO NOTHING
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, Purchase>(&query)
            .bind(input.product_id)
            .bind(&input.buyer_id)
            .bind(&input.seller_id)
            .bind(split.gross)
            .bind(split.net)
            .bind(split.platform_fee)
            .bind(input.category.as_str())
            .bind(input.platform.map(|p| p.as_str()))
            .bind(&input.session_id)
            .fetch_optional(pool)
            .await?;

        match inserted {
            Some(purchase) => {
                tracing::info!(
                    purchase_id = purchase.id,
                    session_id = %purchase.stripe_session_id,
                    product_id = purchase.product_id,
                    amount = %purchase.amount,
                    net_amount = %purchase.net_amount,
                    "Purchase recorded",
                );
                Ok(purchase)
            }
            None => Err(CoreError::DuplicateTransaction {
                session_id: input.session_id.clone(),
            }
            .into()),
        }
    }

    pub async fn find_by_session(
        pool: &PgPool,
        session_id: &str,
    ) -> Result<Option<Purchase>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM purchases WHERE stripe_session_id = $1");
        sqlx::query_as::<_, Purchase>(&query)
            .bind(session_id)
            .fetch_optional(pool)
            .await
    }

    /// Purchases made by `buyer_id`, newest first.
    pub async fn list_for_buyer(
        pool: &PgPool,
        buyer_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Purchase>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM purchases
             WHERE buyer_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Purchase>(&query)
            .bind(buyer_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Sales made by `seller_id`, newest first.
    pub async fn list_for_seller(
        pool: &PgPool,
        seller_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Purchase>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM purchases
             WHERE seller_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Purchase>(&query)
            .bind(seller_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Whether `buyer_id` has a recorded purchase of `product_id`.
    pub async fn has_purchased(
        pool: &PgPool,
        buyer_id: &str,
        product_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM purchases WHERE buyer_id = $1 AND product_id = $2)",
        )
        .bind(buyer_id)
        .bind(product_id)
        .fetch_one(pool)
        .await
    }

    /// Totals across every sale of `seller_id`. Zero when there are none.
    pub async fn sales_summary(pool: &PgPool, seller_id: &str) -> Result<SalesSummary, sqlx::Error> {
        sqlx::query_as::<_, SalesSummary>(
            "SELECT COUNT(*) AS sales_count,
                    COALESCE(SUM(amount), 0) AS gross_total,
                    COALESCE(SUM(net_amount), 0) AS net_total,
                    COALESCE(SUM(platform_fee), 0) AS fee_total
             FROM purchases
             WHERE seller_id = $1",
        )
        .bind(seller_id)
        .fetch_one(pool)
        .await
    }

    /// Per-category totals for `seller_id`, ordered by category name.
    pub async fn sales_by_category(
        pool: &PgPool,
        seller_id: &str,
    ) -> Result<Vec<CategorySales>, sqlx::Error> {
        sqlx::query_as::<_, CategorySales>(
            "SELECT category,
                    COUNT(*) AS sales_count,
                    SUM(amount) AS gross_total,
                    SUM(net_amount) AS net_total
             FROM purchases
             WHERE seller_id = $1
             GROUP BY category
             ORDER BY category",
        )
        .bind(seller_id)
        .fetch_all(pool)
        .await
    }
}
