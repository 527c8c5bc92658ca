//! Canonical product type.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::{PricePolicy, resolve_price};

/// Badges shown on product cards.
///
/// Assigned once when a product is normalized and held stable for the
/// lifetime of the catalog it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayFlags {
    pub is_new: bool,
    pub is_best_seller: bool,
    pub is_trending: bool,
    pub is_featured: bool,
    pub is_back_in_stock: bool,
}

/// A normalized catalog product.
///
/// Every field has a defined value; missing upstream data has already been
/// replaced by a default during normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub brand_name: String,
    /// Category code.
    pub category: String,
    pub sub_category: String,
    /// Merchant item code (SKU), empty when unknown.
    pub item_code: String,
    /// Image URL or path.
    pub image: String,
    /// Listed price, never negative.
    pub price: Decimal,
    /// Percentage discount, if the upstream record carried one.
    pub discount: Option<Decimal>,
    pub original_price: Option<Decimal>,
    pub current_stock: u32,
    pub reserved_stock: u32,
    pub rating: f64,
    pub review_count: u32,
    pub flags: DisplayFlags,
}

impl Product {
    /// Units that can still be sold: `max(0, current − reserved)`.
    #[must_use]
    pub const fn available_stock(&self) -> u32 {
        self.current_stock.saturating_sub(self.reserved_stock)
    }

    /// Whether at least one unit is available.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.available_stock() > 0
    }

    /// The unit price a cart line created from this product would carry.
    #[must_use]
    pub fn resolved_price(&self, policy: PricePolicy) -> Decimal {
        resolve_price(self.price, self.discount, self.original_price, policy)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: &str, price: i64) -> Product {
        Product {
            id: ProductId::parse(id).unwrap(),
            name: format!("Product {id}"),
            description: "Test product".to_string(),
            brand_name: "Acme".to_string(),
            category: "HOME".to_string(),
            sub_category: "KITCHEN".to_string(),
            item_code: format!("IC-{id}"),
            image: "/img.png".to_string(),
            price: Decimal::from(price),
            discount: None,
            original_price: None,
            current_stock: 10,
            reserved_stock: 0,
            rating: 4.0,
            review_count: 3,
            flags: DisplayFlags::default(),
        }
    }

    #[test]
    fn test_available_stock_saturates() {
        let mut p = product("a", 10);
        p.current_stock = 3;
        p.reserved_stock = 5;
        assert_eq!(p.available_stock(), 0);
        assert!(!p.in_stock());

        p.reserved_stock = 1;
        assert_eq!(p.available_stock(), 2);
        assert!(p.in_stock());
    }

    #[test]
    fn test_resolved_price_uses_discount() {
        let mut p = product("a", 1000);
        p.discount = Some(Decimal::from(10));
        p.original_price = Some(Decimal::from(1000));
        assert_eq!(p.resolved_price(PricePolicy::default()), Decimal::from(900));
    }
}
