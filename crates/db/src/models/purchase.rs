//! Purchase ledger entry model and DTOs.

use koda_core::catalog::{Category, Platform};
use koda_core::types::{DbId, Money, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `purchases` table.
///
/// `category` and `platform` are copies taken at purchase time and are kept
/// as stored strings so historical rows always decode.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Purchase {
    pub id: DbId,
    pub product_id: DbId,
    pub buyer_id: String,
    pub seller_id: String,
    pub amount: Money,
    pub net_amount: Money,
    pub platform_fee: Money,
    pub category: String,
    pub platform: Option<String>,
    pub stripe_session_id: String,
    pub created_at: Timestamp,
}

/// Input for recording one completed payment session.
#[derive(Debug, Clone)]
pub struct RecordPurchase {
    pub session_id: String,
    pub buyer_id: String,
    pub seller_id: String,
    pub product_id: DbId,
    pub gross_amount: Money,
    pub category: Category,
    pub platform: Option<Platform>,
}

/// Seller totals across all recorded sales.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SalesSummary {
    pub sales_count: i64,
    pub gross_total: Money,
    pub net_total: Money,
    pub fee_total: Money,
}

/// Seller totals for one category.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategorySales {
    pub category: String,
    pub sales_count: i64,
    pub gross_total: Money,
    pub net_total: Money,
}
