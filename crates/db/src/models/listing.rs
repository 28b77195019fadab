//! Listing entity model.
//!
//! Rows of the `products` table are decoded into a [`Listing`]: the shared
//! base fields plus a [`ListingVariant`] chosen by the `kind` discriminator.

use koda_core::catalog::{
    AutomationDetails, Category, ListingSort, ListingVariant, Platform, UnknownVariant,
    KIND_AUTOMATION,
};
use koda_core::types::{DbId, Money, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Raw row from the `products` table, variant columns still nullable.
#[derive(Debug, Clone, FromRow)]
pub struct ProductRow {
    pub id: DbId,
    pub kind: String,
    pub title: String,
    pub description: String,
    pub price: Money,
    pub category: String,
    pub tags: Vec<String>,
    pub seller_id: String,
    pub preview_image_url: Option<String>,
    pub platform: Option<String>,
    pub file_url: Option<String>,
    pub version: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A catalog listing with its variant payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub price: Money,
    pub category: Category,
    pub tags: Vec<String>,
    pub seller_id: String,
    pub preview_image_url: Option<String>,
    #[serde(flatten)]
    pub variant: ListingVariant,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Listing {
    pub fn kind(&self) -> &'static str {
        self.variant.kind()
    }

    pub fn platform(&self) -> Option<Platform> {
        self.variant.platform()
    }
}

/// A stored row that does not form a valid listing.
#[derive(Debug, thiserror::Error)]
pub enum ListingDecodeError {
    #[error(transparent)]
    UnknownVariant(#[from] UnknownVariant),

    #[error("listing {id} of kind {kind} has no {field}")]
    MissingField {
        id: DbId,
        kind: String,
        field: &'static str,
    },
}

impl TryFrom<ProductRow> for Listing {
    type Error = ListingDecodeError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let missing = |field| ListingDecodeError::MissingField {
            id: row.id,
            kind: row.kind.clone(),
            field,
        };

        let variant = match row.kind.as_str() {
            KIND_AUTOMATION => ListingVariant::Automation(AutomationDetails {
                platform: row
                    .platform
                    .as_deref()
                    .ok_or_else(|| missing("platform"))?
                    .parse()?,
                file_url: row.file_url.clone().ok_or_else(|| missing("file_url"))?,
                version: row.version.clone(),
            }),
            other => {
                return Err(UnknownVariant {
                    kind: "listing kind",
                    value: other.to_string(),
                }
                .into())
            }
        };

        Ok(Listing {
            id: row.id,
            category: row.category.parse()?,
            title: row.title,
            description: row.description,
            price: row.price,
            tags: row.tags,
            seller_id: row.seller_id,
            preview_image_url: row.preview_image_url,
            variant,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Decode rows, surfacing malformed rows as `sqlx` decode errors.
pub(crate) fn decode_rows(rows: Vec<ProductRow>) -> Result<Vec<Listing>, sqlx::Error> {
    rows.into_iter().map(decode_row).collect()
}

pub(crate) fn decode_row(row: ProductRow) -> Result<Listing, sqlx::Error> {
    Listing::try_from(row).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

/// Filter and ordering for catalog queries. Limit and offset are expected
/// to be clamped by the caller.
#[derive(Debug, Clone)]
pub struct ListingFilter {
    pub category: Option<Category>,
    pub tag: Option<String>,
    pub seller_id: Option<String>,
    /// Case-insensitive substring of the title.
    pub search: Option<String>,
    pub sort: ListingSort,
    pub limit: i64,
    pub offset: i64,
}

impl Default for ListingFilter {
    fn default() -> Self {
        Self {
            category: None,
            tag: None,
            seller_id: None,
            search: None,
            sort: ListingSort::Newest,
            limit: koda_core::pagination::DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}
