//! Catalog entity rules: listing categories, automation platforms, the
//! variant discriminator, and validation of seller submissions and edits.
//!
//! All listings share one base shape (title, description, price, category,
//! tags, seller, preview image). The variant payload carries the fields that
//! only one kind of listing requires. `Automation` is the only variant today.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Money;
use crate::validation::{check_optional_url, check_text, is_web_url, Violations};

pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MIN_CHARS: usize = 20;
pub const DESCRIPTION_MAX_CHARS: usize = 2000;
pub const MAX_TAGS: usize = 10;
pub const TAG_MAX_CHARS: usize = 30;
pub const VERSION_MAX_CHARS: usize = 50;

/// Discriminator value stored in `products.kind` for automations.
pub const KIND_AUTOMATION: &str = "Automation";

/// Lowest accepted listing price.
pub fn price_min() -> Money {
    Decimal::ONE
}

/// Highest accepted listing price.
pub fn price_max() -> Money {
    Decimal::ONE_THOUSAND
}

/// Returned when a stored or submitted string names no known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Social Media")]
    SocialMedia,
    #[serde(rename = "Email Marketing")]
    EmailMarketing,
    Productivity,
    Sales,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::SocialMedia,
        Category::EmailMarketing,
        Category::Productivity,
        Category::Sales,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::SocialMedia => "Social Media",
            Category::EmailMarketing => "Email Marketing",
            Category::Productivity => "Productivity",
            Category::Sales => "Sales",
            Category::Other => "Other",
        }
    }
}

impl FromStr for Category {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "category",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Platform
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "n8n")]
    N8n,
    Make,
    Zapier,
    Python,
    Other,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::N8n,
        Platform::Make,
        Platform::Zapier,
        Platform::Python,
        Platform::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::N8n => "n8n",
            Platform::Make => "Make",
            Platform::Zapier => "Zapier",
            Platform::Python => "Python",
            Platform::Other => "Other",
        }
    }
}

impl FromStr for Platform {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "platform",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Variants
// ---------------------------------------------------------------------------

/// Fields specific to a downloadable automation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomationDetails {
    pub platform: Platform,
    pub file_url: String,
    pub version: Option<String>,
}

/// Variant payload of a listing, tagged by `kind` when serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ListingVariant {
    Automation(AutomationDetails),
}

impl ListingVariant {
    /// The discriminator stored alongside the base fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ListingVariant::Automation(_) => KIND_AUTOMATION,
        }
    }

    /// Platform of the variant, if it has one.
    pub fn platform(&self) -> Option<Platform> {
        match self {
            ListingVariant::Automation(details) => Some(details.platform),
        }
    }

    /// Downloadable artifact reference, if the variant has one.
    pub fn file_url(&self) -> Option<&str> {
        match self {
            ListingVariant::Automation(details) => Some(&details.file_url),
        }
    }
}

/// Sort orders accepted by listing queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingSort {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
}

// ---------------------------------------------------------------------------
// Seller submission
// ---------------------------------------------------------------------------

/// Raw listing submission as sent by a seller.
///
/// Every field is optional so that missing fields surface as validation
/// violations rather than deserialization failures.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub preview_image_url: Option<String>,
    /// Variant discriminator; defaults to `Automation`.
    pub kind: Option<String>,
    pub platform: Option<String>,
    pub file_url: Option<String>,
    pub version: Option<String>,
}

/// A fully validated listing ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewListing {
    pub seller_id: String,
    pub title: String,
    pub description: String,
    pub price: Money,
    pub category: Category,
    pub tags: Vec<String>,
    pub preview_image_url: Option<String>,
    pub variant: ListingVariant,
}

/// Validate a seller submission.
///
/// Checks the base fields and the fields required by the selected variant,
/// reporting every violated field rather than only the first. `seller_id` is
/// the identity of the submitting user and must be non-blank.
pub fn validate_listing_input(seller_id: &str, input: &ListingInput) -> Result<NewListing, CoreError> {
    let mut v = Violations::new();

    let seller_id = seller_id.trim();
    if seller_id.is_empty() {
        v.push("seller_id", "required", "seller_id is required");
    }

    let title = check_text(
        &mut v,
        "title",
        input.title.as_deref(),
        TITLE_MIN_CHARS,
        TITLE_MAX_CHARS,
    );
    let description = check_text(
        &mut v,
        "description",
        input.description.as_deref(),
        DESCRIPTION_MIN_CHARS,
        DESCRIPTION_MAX_CHARS,
    );
    let price = match input.price {
        Some(price) => {
            check_price(&mut v, price);
            Some(price.normalize())
        }
        None => {
            v.push("price", "required", "price is required");
            None
        }
    };
    let category = match input.category.as_deref().map(str::trim) {
        None | Some("") => {
            v.push("category", "required", "category is required");
            None
        }
        Some(raw) => match raw.parse::<Category>() {
            Ok(c) => Some(c),
            Err(_) => {
                v.push("category", "enum_values", format!("unknown category '{raw}'"));
                None
            }
        },
    };
    let tags = check_tags(&mut v, &input.tags);
    let preview_image_url =
        check_optional_url(&mut v, "preview_image_url", input.preview_image_url.as_deref());

    let kind = input
        .kind
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .unwrap_or(KIND_AUTOMATION);
    let variant = if kind == KIND_AUTOMATION {
        check_automation(&mut v, input)
    } else {
        v.push("kind", "enum_values", format!("unknown listing kind '{kind}'"));
        None
    };

    v.finish(())?;
    match (title, description, price, category, variant) {
        (Some(title), Some(description), Some(price), Some(category), Some(variant)) => {
            Ok(NewListing {
                seller_id: seller_id.to_string(),
                title,
                description,
                price,
                category,
                tags,
                preview_image_url,
                variant,
            })
        }
        _ => Err(CoreError::Internal(
            "listing validation produced neither a value nor a violation".into(),
        )),
    }
}

fn check_price(v: &mut Violations, price: Decimal) {
    if price < price_min() || price > price_max() {
        v.push(
            "price",
            "range",
            format!("price must be between {} and {}", price_min(), price_max()),
        );
    } else if price.normalize().scale() > 2 {
        v.push("price", "scale", "price must have at most 2 decimal places");
    }
}

fn check_tags(v: &mut Violations, tags: &[String]) -> Vec<String> {
    if tags.len() > MAX_TAGS {
        v.push("tags", "max_items", format!("at most {MAX_TAGS} tags are allowed"));
    }
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() {
            continue;
        }
        if tag.chars().count() > TAG_MAX_CHARS {
            v.push(
                "tags",
                "max_length",
                format!("tags must be at most {TAG_MAX_CHARS} characters"),
            );
            continue;
        }
        if !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

fn check_automation(v: &mut Violations, input: &ListingInput) -> Option<ListingVariant> {
    let platform = match input.platform.as_deref().map(str::trim) {
        None | Some("") => {
            v.push("platform", "required", "platform is required");
            None
        }
        Some(raw) => match raw.parse::<Platform>() {
            Ok(p) => Some(p),
            Err(_) => {
                v.push("platform", "enum_values", format!("unknown platform '{raw}'"));
                None
            }
        },
    };

    let file_url = match input.file_url.as_deref().map(str::trim) {
        None | Some("") => {
            v.push("file_url", "required", "file_url is required");
            None
        }
        Some(url) if !is_web_url(url) => {
            v.push("file_url", "url", "file_url must be a valid URL");
            None
        }
        Some(url) => Some(url.to_string()),
    };

    let version = input
        .version
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    if let Some(version) = version {
        if version.chars().count() > VERSION_MAX_CHARS {
            v.push(
                "version",
                "max_length",
                format!("version must be at most {VERSION_MAX_CHARS} characters"),
            );
        }
    }

    Some(ListingVariant::Automation(AutomationDetails {
        platform: platform?,
        file_url: file_url?,
        version: version.map(str::to_string),
    }))
}

// ---------------------------------------------------------------------------
// Seller edits
// ---------------------------------------------------------------------------

/// Fields a seller may change on an existing listing.
///
/// Anything else in the request body (seller, category, platform, file) is
/// dropped during deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListingPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub preview_image_url: Option<String>,
}

/// Validate only the fields present in `patch`, returning a trimmed copy.
pub fn validate_listing_patch(patch: &ListingPatch) -> Result<ListingPatch, CoreError> {
    let mut v = Violations::new();

    let title = patch.title.as_deref().and_then(|t| {
        check_text(&mut v, "title", Some(t), TITLE_MIN_CHARS, TITLE_MAX_CHARS)
    });
    let description = patch.description.as_deref().and_then(|d| {
        check_text(
            &mut v,
            "description",
            Some(d),
            DESCRIPTION_MIN_CHARS,
            DESCRIPTION_MAX_CHARS,
        )
    });
    if let Some(price) = patch.price {
        check_price(&mut v, price);
    }
    let preview_image_url =
        check_optional_url(&mut v, "preview_image_url", patch.preview_image_url.as_deref());

    v.finish(ListingPatch {
        title,
        description,
        price: patch.price.map(|p| p.normalize()),
        preview_image_url,
    })
}
