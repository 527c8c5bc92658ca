//! Category and price filtering followed by sorting.

use std::cmp::Ordering;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopfront_core::{Product, SortOrder};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Filter and sort parameters for the product list.
///
/// Filters apply in field order: category, sub-category, price range. The
/// sort runs last.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListQuery {
    /// Category code; matched case-insensitively.
    pub category: Option<String>,
    pub sub_category: Option<String>,
    /// Inclusive lower bound on `price`.
    pub min_price: Option<Decimal>,
    /// Inclusive upper bound on `price`.
    pub max_price: Option<Decimal>,
    pub sort: SortOrder,
}

impl ListQuery {
    /// Apply the filters and sort to a product list.
    #[must_use]
    pub fn apply(&self, mut products: Vec<Arc<Product>>) -> Vec<Arc<Product>> {
        if let Some(category) = non_blank(self.category.as_deref()) {
            products.retain(|p| p.category.eq_ignore_ascii_case(category));
        }
        if let Some(sub_category) = non_blank(self.sub_category.as_deref()) {
            products.retain(|p| p.sub_category.eq_ignore_ascii_case(sub_category));
        }
        if let Some(min) = self.min_price {
            products.retain(|p| p.price >= min);
        }
        if let Some(max) = self.max_price {
            products.retain(|p| p.price <= max);
        }

        sort_products(&mut products, self.sort);
        products
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Stable sort; equal products keep their relative order.
pub fn sort_products(products: &mut [Arc<Product>], order: SortOrder) {
    match order {
        SortOrder::None => {}
        SortOrder::PriceAsc => products.sort_by(|a, b| a.price.cmp(&b.price)),
        SortOrder::PriceDesc => products.sort_by(|a, b| b.price.cmp(&a.price)),
        SortOrder::RatingDesc => products.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        SortOrder::NameAsc => products.sort_by(|a, b| compare_names(&a.name, &b.name)),
    }
}

/// Collation order for product names.
///
/// Primary key ignores case and accents (`Éclair` sorts with `eclair`), then
/// accented forms follow plain ones, then case breaks the remaining ties.
fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| lowercase(a).cmp(lowercase(b)))
        .then_with(|| a.cmp(b))
}

fn lowercase(name: &str) -> impl Iterator<Item = char> + '_ {
    name.nfc().flat_map(char::to_lowercase)
}

/// Canonical decomposition with combining marks dropped, lowercased.
fn collation_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopfront_core::{DisplayFlags, ProductId};

    use super::*;

    fn product(id: &str, name: &str, price: i64, rating: f64, category: &str) -> Arc<Product> {
        Arc::new(Product {
            id: ProductId::parse(id).unwrap(),
            name: name.to_string(),
            description: String::new(),
            brand_name: String::new(),
            category: category.to_string(),
            sub_category: if id == "b" { "MUGS" } else { "PLATES" }.to_string(),
            item_code: String::new(),
            image: String::new(),
            price: Decimal::from(price),
            discount: None,
            original_price: None,
            current_stock: 1,
            reserved_stock: 0,
            rating,
            review_count: 0,
            flags: DisplayFlags::default(),
        })
    }

    fn sample() -> Vec<Arc<Product>> {
        vec![
            product("a", "banana", 300, 4.0, "FOOD"),
            product("b", "Apple", 100, 4.5, "KITCHEN"),
            product("c", "cherry", 200, 4.0, "FOOD"),
        ]
    }

    fn ids(products: &[Arc<Product>]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_price_asc() {
        let query = ListQuery {
            sort: SortOrder::PriceAsc,
            ..ListQuery::default()
        };
        let prices: Vec<Decimal> = query.apply(sample()).iter().map(|p| p.price).collect();
        assert_eq!(
            prices,
            vec![Decimal::from(100), Decimal::from(200), Decimal::from(300)]
        );
    }

    #[test]
    fn test_price_desc() {
        let query = ListQuery {
            sort: SortOrder::PriceDesc,
            ..ListQuery::default()
        };
        assert_eq!(ids(&query.apply(sample())), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_rating_desc_is_stable() {
        let query = ListQuery {
            sort: SortOrder::RatingDesc,
            ..ListQuery::default()
        };
        // a and c tie at 4.0 and keep their original order.
        assert_eq!(ids(&query.apply(sample())), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_name_asc_ignores_case() {
        let query = ListQuery {
            sort: SortOrder::NameAsc,
            ..ListQuery::default()
        };
        assert_eq!(ids(&query.apply(sample())), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_name_asc_folds_accents() {
        let mut products = vec![
            product("f", "fig", 1, 0.0, ""),
            product("e", "Éclair", 1, 0.0, ""),
            product("a", "apple", 1, 0.0, ""),
            product("z", "zucchini", 1, 0.0, ""),
            product("u", "Ürün", 1, 0.0, ""),
        ];
        sort_products(&mut products, SortOrder::NameAsc);
        let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["apple", "Éclair", "fig", "Ürün", "zucchini"]);
    }

    #[test]
    fn test_name_asc_accent_and_case_break_ties() {
        let mut products = vec![
            product("1", "résumé", 1, 0.0, ""),
            product("2", "Resume", 1, 0.0, ""),
            product("3", "resume", 1, 0.0, ""),
        ];
        sort_products(&mut products, SortOrder::NameAsc);
        assert_eq!(ids(&products), vec!["2", "3", "1"]);
    }

    #[test]
    fn test_default_preserves_order() {
        assert_eq!(ids(&ListQuery::default().apply(sample())), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_category_and_inclusive_price_range() {
        let query = ListQuery {
            category: Some("food".to_string()),
            min_price: Some(Decimal::from(200)),
            max_price: Some(Decimal::from(300)),
            ..ListQuery::default()
        };
        assert_eq!(ids(&query.apply(sample())), vec!["a", "c"]);

        let query = ListQuery {
            max_price: Some(Decimal::from(200)),
            min_price: Some(Decimal::from(200)),
            ..ListQuery::default()
        };
        assert_eq!(ids(&query.apply(sample())), vec!["c"]);
    }

    #[test]
    fn test_sub_category() {
        let query = ListQuery {
            sub_category: Some("mugs".to_string()),
            ..ListQuery::default()
        };
        assert_eq!(ids(&query.apply(sample())), vec!["b"]);
    }

    #[test]
    fn test_blank_category_ignored() {
        let query = ListQuery {
            category: Some("  ".to_string()),
            ..ListQuery::default()
        };
        assert_eq!(query.apply(sample()).len(), 3);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let query = ListQuery {
            min_price: Some(Decimal::from(300)),
            max_price: Some(Decimal::from(100)),
            ..ListQuery::default()
        };
        assert!(query.apply(sample()).is_empty());
    }
}
