//! Repository for the `products` table.

use koda_core::catalog::{validate_listing_patch, ListingPatch, ListingSort, ListingVariant, NewListing};
use koda_core::error::CoreError;
use koda_core::types::DbId;
use sqlx::PgPool;

use crate::error::DbError;
use crate::models::listing::{decode_row, decode_rows, Listing, ListingFilter, ProductRow};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, kind, title, description, price, category, tags, seller_id, \
                       preview_image_url, platform, file_url, version, created_at, updated_at";

/// [`COLUMNS`] qualified with the `p` alias, for joins.
pub(crate) const PRODUCT_COLUMNS: &str =
    "p.id, p.kind, p.title, p.description, p.price, p.category, p.tags, p.seller_id, \
     p.preview_image_url, p.platform, p.file_url, p.version, p.created_at, p.updated_at";

/// Provides catalog operations for listings of every variant.
pub struct ListingRepo;

impl ListingRepo {
    /// Insert a validated listing, returning the stored entity.
    ///
    /// The discriminator and variant columns are derived from
    /// `input.variant`.
    pub async fn create(pool: &PgPool, input: &NewListing) -> Result<Listing, sqlx::Error> {
        let (platform, file_url, version) = match &input.variant {
            ListingVariant::Automation(details) => (
                Some(details.platform.as_str()),
                Some(details.file_url.as_str()),
                details.version.as_deref(),
            ),
        };

        let query = format!(
            "INSERT INTO products
                (kind, title, description, price, category, tags, seller_id,
                 preview_image_url, platform, file_url, version)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ProductRow>(&query)
            .bind(input.variant.kind())
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.price)
            .bind(input.category.as_str())
            .bind(&input.tags)
            .bind(&input.seller_id)
            .bind(&input.preview_image_url)
            .bind(platform)
            .bind(file_url)
            .bind(version)
            .fetch_one(pool)
            .await?;
        decode_row(row)
    }

    /// Find a listing by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1");
        sqlx::query_as::<_, ProductRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .map(decode_row)
            .transpose()
    }

    /// Query listings by category, tag, seller and title text.
    ///
    /// Absent filters match everything. Ties in the sort key are broken by
    /// id so pages are stable.
    pub async fn query(pool: &PgPool, filter: &ListingFilter) -> Result<Vec<Listing>, sqlx::Error> {
        let order = match filter.sort {
            ListingSort::Newest => "created_at DESC, id DESC",
            ListingSort::PriceAsc => "price ASC, id ASC",
            ListingSort::PriceDesc => "price DESC, id DESC",
        };
        let query = format!(
            "SELECT {COLUMNS} FROM products
             WHERE ($1::text IS NULL OR category = $1)
               AND ($2::text IS NULL OR $2 = ANY(tags))
               AND ($3::text IS NULL OR seller_id = $3)
               AND ($4::text IS NULL OR title ILIKE '%' || $4 || '%')
             ORDER BY {order}
             LIMIT $5 OFFSET $6"
        );
        let rows = sqlx::query_as::<_, ProductRow>(&query)
            .bind(filter.category.map(|c| c.as_str()))
            .bind(&filter.tag)
            .bind(&filter.seller_id)
            .bind(filter.search.as_deref().map(escape_like))
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(pool)
            .await?;
        decode_rows(rows)
    }

    /// Apply a seller's edit to one of their own listings.
    ///
    /// Fails with `NotFound` when no listing has `id` and with `Forbidden`
    /// when `requester_id` is not its seller, whatever the patch contains.
    /// Only the fields present in `patch` are validated and written.
    pub async fn update_by_owner(
        pool: &PgPool,
        requester_id: &str,
        id: DbId,
        patch: &ListingPatch,
    ) -> Result<Listing, DbError> {
        let existing = Self::find_by_id(pool, id)
            .await?
            .ok_or_else(|| CoreError::not_found("Listing", id))?;
        if existing.seller_id != requester_id {
            return Err(CoreError::Forbidden("You can only edit your own listings".into()).into());
        }

        let patch = validate_listing_patch(patch)?;
        let updated = Self::update_owned(pool, id, requester_id, &patch)
            .await?
            .ok_or_else(|| CoreError::not_found("Listing", id))?;
        tracing::debug!(listing_id = id, seller_id = %requester_id, "Listing updated");
        Ok(updated)
    }

    /// Write the allowed fields of `patch` to the listing `id` if it belongs
    /// to `seller_id`. Returns `None` if no such row exists.
    pub async fn update_owned(
        pool: &PgPool,
        id: DbId,
        seller_id: &str,
        patch: &ListingPatch,
    ) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!(
            "UPDATE products SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                price = COALESCE($5, price),
                preview_image_url = COALESCE($6, preview_image_url)
             WHERE id = $1 AND seller_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProductRow>(&query)
            .bind(id)
            .bind(seller_id)
            .bind(&patch.title)
            .bind(&patch.description)
            .bind(patch.price)
            .bind(&patch.preview_image_url)
            .fetch_optional(pool)
            .await?
            .map(decode_row)
            .transpose()
    }
}

/// Escape `LIKE` wildcards so user text matches literally.
fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
