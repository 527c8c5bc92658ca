//! Cart line, wishlist entry and their durable record form.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{IdError, ProductId};
use super::price::PricePolicy;
use super::product::Product;

/// One line of the cart.
///
/// Holds a display snapshot taken when the product was added; the unit price
/// is the resolved price at that moment and does not follow later catalog
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub image: String,
    pub unit_price: Decimal,
    /// Always at least 1.
    pub quantity: u32,
    pub rating: f64,
    pub reviews: u32,
    pub in_stock: bool,
    pub brand_name: String,
    pub category: String,
    pub item_code: String,
}

impl CartLine {
    /// Snapshot a product into a new cart line.
    ///
    /// A quantity of 0 is raised to 1.
    #[must_use]
    pub fn from_product(product: &Product, quantity: u32, policy: PricePolicy) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            image: product.image.clone(),
            unit_price: product.resolved_price(policy),
            quantity: quantity.max(1),
            rating: product.rating,
            reviews: product.review_count,
            in_stock: product.in_stock(),
            brand_name: product.brand_name.clone(),
            category: product.category.clone(),
            item_code: product.item_code.clone(),
        }
    }

    /// `unit_price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// A wishlisted product snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    pub product_id: ProductId,
    pub name: String,
    pub image: String,
    pub price: Decimal,
    pub rating: f64,
    pub reviews: u32,
    pub in_stock: bool,
    pub brand_name: String,
    pub category: String,
    pub item_code: String,
}

impl WishlistEntry {
    /// Snapshot a product into a wishlist entry.
    #[must_use]
    pub fn from_product(product: &Product, policy: PricePolicy) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            image: product.image.clone(),
            price: product.resolved_price(policy),
            rating: product.rating,
            reviews: product.review_count,
            in_stock: product.in_stock(),
            brand_name: product.brand_name.clone(),
            category: product.category.clone(),
            item_code: product.item_code.clone(),
        }
    }
}

/// Flat record layout shared by the durable `cart` and `wishlist` collections.
///
/// `quantity` is only written for cart lines. Every field except `id` has a
/// default so that records written by older clients still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub reviews: u32,
    #[serde(default)]
    pub in_stock: bool,
    #[serde(default)]
    pub brand_name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub item_code: String,
}

impl From<&CartLine> for StoredRecord {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.product_id.to_string(),
            name: line.name.clone(),
            price: line.unit_price,
            image: line.image.clone(),
            quantity: Some(line.quantity),
            rating: line.rating,
            reviews: line.reviews,
            in_stock: line.in_stock,
            brand_name: line.brand_name.clone(),
            category: line.category.clone(),
            item_code: line.item_code.clone(),
        }
    }
}

impl From<&WishlistEntry> for StoredRecord {
    fn from(entry: &WishlistEntry) -> Self {
        Self {
            id: entry.product_id.to_string(),
            name: entry.name.clone(),
            price: entry.price,
            image: entry.image.clone(),
            quantity: None,
            rating: entry.rating,
            reviews: entry.reviews,
            in_stock: entry.in_stock,
            brand_name: entry.brand_name.clone(),
            category: entry.category.clone(),
            item_code: entry.item_code.clone(),
        }
    }
}

impl TryFrom<StoredRecord> for CartLine {
    type Error = IdError;

    /// A missing or zero quantity loads as 1.
    fn try_from(record: StoredRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            product_id: ProductId::parse(&record.id)?,
            name: record.name,
            image: record.image,
            unit_price: record.price,
            quantity: record.quantity.unwrap_or(1).max(1),
            rating: record.rating,
            reviews: record.reviews,
            in_stock: record.in_stock,
            brand_name: record.brand_name,
            category: record.category,
            item_code: record.item_code,
        })
    }
}

impl TryFrom<StoredRecord> for WishlistEntry {
    type Error = IdError;

    fn try_from(record: StoredRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            product_id: ProductId::parse(&record.id)?,
            name: record.name,
            image: record.image,
            price: record.price,
            rating: record.rating,
            reviews: record.reviews,
            in_stock: record.in_stock,
            brand_name: record.brand_name,
            category: record.category,
            item_code: record.item_code,
        })
    }
}
