//! Normalization of raw upstream records into canonical [`Product`]s.
//!
//! Upstream records are untrusted JSON objects whose fields may be missing,
//! mistyped, or spelled differently between sources. Each field is looked up
//! under a fixed list of aliases, coerced, and defaulted.

use std::collections::HashSet;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use shopfront_core::{DisplayFlags, Product, ProductId};
use tracing::{debug, warn};

use super::random::RandomSource;

pub const DEFAULT_NAME: &str = "Unnamed product";
pub const DEFAULT_DESCRIPTION: &str = "No description available.";
pub const DEFAULT_BRAND: &str = "Unbranded";
pub const DEFAULT_IMAGE: &str = "/static/images/placeholder.png";

const ID_KEYS: &[&str] = &["id", "_id", "productId", "product_id"];
const NAME_KEYS: &[&str] = &["name", "productName", "title"];
const DESCRIPTION_KEYS: &[&str] = &["description", "shortDescription", "desc"];
const BRAND_KEYS: &[&str] = &["brandName", "brand", "brand_name", "vendor"];
const CATEGORY_KEYS: &[&str] = &["category", "categoryCode", "category_code"];
const SUB_CATEGORY_KEYS: &[&str] = &["subCategory", "subCategoryCode", "sub_category"];
const ITEM_CODE_KEYS: &[&str] = &["itemCode", "item_code", "sku", "code"];
const IMAGE_KEYS: &[&str] = &["image", "imageUrl", "image_url", "thumbnail", "images"];
const PRICE_KEYS: &[&str] = &["price", "sellingPrice", "salePrice"];
const DISCOUNT_KEYS: &[&str] = &["discount", "discountPercentage", "discount_percent"];
const ORIGINAL_PRICE_KEYS: &[&str] = &["originalPrice", "original_price", "mrp", "listPrice"];
const CURRENT_STOCK_KEYS: &[&str] = &["currentStock", "current_stock", "stock", "quantity"];
const RESERVED_STOCK_KEYS: &[&str] = &["reservedStock", "reserved_stock", "reserved"];
const RATING_KEYS: &[&str] = &["rating", "averageRating", "avgRating"];
const REVIEW_COUNT_KEYS: &[&str] = &["reviewCount", "reviews", "numReviews", "review_count"];

/// Probability of each display flag being set on a product.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlagOdds {
    pub new: f64,
    pub best_seller: f64,
    pub trending: f64,
    pub featured: f64,
    pub back_in_stock: f64,
}

impl Default for FlagOdds {
    fn default() -> Self {
        Self {
            new: 0.3,
            best_seller: 0.2,
            trending: 0.25,
            featured: 0.15,
            back_in_stock: 0.1,
        }
    }
}

impl FlagOdds {
    /// Draw one set of flags.
    ///
    /// Always consumes exactly five draws, in field order, so that scripted
    /// sources line up with products. `is_back_in_stock` additionally
    /// requires the product to be in stock.
    pub fn draw(&self, in_stock: bool, rng: &mut dyn RandomSource) -> DisplayFlags {
        let is_new = rng.chance(self.new);
        let is_best_seller = rng.chance(self.best_seller);
        let is_trending = rng.chance(self.trending);
        let is_featured = rng.chance(self.featured);
        let back_in_stock = rng.chance(self.back_in_stock);

        DisplayFlags {
            is_new,
            is_best_seller,
            is_trending,
            is_featured,
            is_back_in_stock: back_in_stock && in_stock,
        }
    }
}

/// Normalize a single raw record.
///
/// Returns `None` when the record is not a JSON object or carries no usable
/// id; such records are dropped from the catalog.
pub fn normalize_record(
    raw: &Value,
    odds: &FlagOdds,
    rng: &mut dyn RandomSource,
) -> Option<Product> {
    let Some(record) = raw.as_object() else {
        debug!("Skipping non-object record");
        return None;
    };

    let Some(id) = lookup(record, ID_KEYS)
        .and_then(value_as_string)
        .and_then(|s| ProductId::parse(&s).ok())
    else {
        debug!("Skipping record without id");
        return None;
    };

    let current_stock = lookup(record, CURRENT_STOCK_KEYS).map_or(0, value_as_count);
    let reserved_stock = lookup(record, RESERVED_STOCK_KEYS).map_or(0, value_as_count);
    let in_stock = current_stock.saturating_sub(reserved_stock) > 0;

    Some(Product {
        id,
        name: text_or(record, NAME_KEYS, DEFAULT_NAME),
        description: text_or(record, DESCRIPTION_KEYS, DEFAULT_DESCRIPTION),
        brand_name: text_or(record, BRAND_KEYS, DEFAULT_BRAND),
        category: text_or(record, CATEGORY_KEYS, ""),
        sub_category: text_or(record, SUB_CATEGORY_KEYS, ""),
        item_code: text_or(record, ITEM_CODE_KEYS, ""),
        image: lookup(record, IMAGE_KEYS)
            .and_then(value_as_image)
            .unwrap_or_else(|| DEFAULT_IMAGE.to_string()),
        price: lookup(record, PRICE_KEYS)
            .and_then(value_as_decimal)
            .unwrap_or(Decimal::ZERO)
            .max(Decimal::ZERO),
        discount: lookup(record, DISCOUNT_KEYS).and_then(value_as_decimal),
        original_price: lookup(record, ORIGINAL_PRICE_KEYS)
            .and_then(value_as_decimal)
            .map(|p| p.max(Decimal::ZERO)),
        current_stock,
        reserved_stock,
        rating: lookup(record, RATING_KEYS)
            .and_then(value_as_f64)
            .filter(|r| r.is_finite() && *r >= 0.0)
            .unwrap_or(0.0),
        review_count: lookup(record, REVIEW_COUNT_KEYS).map_or(0, value_as_count),
        flags: odds.draw(in_stock, rng),
    })
}

/// Normalize a batch and collapse it to unique-by-id products.
pub fn normalize_batch(
    records: &[Value],
    odds: &FlagOdds,
    rng: &mut dyn RandomSource,
) -> Vec<Product> {
    let normalized: Vec<Product> = records
        .iter()
        .filter_map(|raw| normalize_record(raw, odds, rng))
        .collect();

    let dropped = records.len() - normalized.len();
    if dropped > 0 {
        warn!(dropped, "Dropped records without a usable id");
    }

    deduplicate(normalized)
}

/// Keep the first product for every id, preserving order.
#[must_use]
pub fn deduplicate(products: Vec<Product>) -> Vec<Product> {
    let before = products.len();
    let mut seen = HashSet::with_capacity(before);
    let unique: Vec<Product> = products
        .into_iter()
        .filter(|p| seen.insert(p.id.clone()))
        .collect();

    if unique.len() < before {
        debug!(duplicates = before - unique.len(), "Collapsed duplicate ids");
    }
    unique
}

// =============================================================================
// Field Coercion
// =============================================================================

/// First non-null value among the alias keys.
fn lookup<'a>(record: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find(|v| !v.is_null())
}

fn text_or(record: &Map<String, Value>, keys: &[&str], default: &str) -> String {
    lookup(record, keys)
        .and_then(value_as_text)
        .unwrap_or_else(|| default.to_string())
}

fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Text field: a non-empty string or number, or an object carrying a
/// `code`/`name` member (e.g. `{"code": "ELEC", "name": "Electronics"}`).
fn value_as_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Object(obj) => ["code", "name"]
            .iter()
            .find_map(|k| obj.get(*k).and_then(value_as_string)),
        other => value_as_string(other),
    };
    text.filter(|s| !s.is_empty())
}

/// Image field: a URL string, an object with `url`, or a list of either.
fn value_as_image(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Object(obj) => obj.get("url").and_then(value_as_image),
        Value::Array(items) => items.iter().find_map(value_as_image),
        _ => None,
    }
}

fn value_as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .ok()
            .or_else(|| n.as_f64().and_then(|f| Decimal::try_from(f).ok())),
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Non-negative integer count; fractional values are truncated, negative and
/// non-numeric values become 0.
fn value_as_count(value: &Value) -> u32 {
    let Some(f) = value_as_f64(value).filter(|f| f.is_finite() && *f > 0.0) else {
        return 0;
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped above
    let count = f.min(f64::from(u32::MAX)) as u32;
    count
}
