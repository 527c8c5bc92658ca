//! Case-insensitive substring search over product text fields.
//!
//! The index is rebuilt whenever a new catalog is swapped in. It keeps a
//! lowercased copy of the searchable fields so a query only lowercases the
//! needle.

use std::sync::Arc;

use shopfront_core::Product;

use super::Catalog;

/// Lowercased searchable fields of one product.
#[derive(Debug, Clone)]
struct Entry {
    product: Arc<Product>,
    /// name, description, category, brand
    fields: [String; 4],
}

/// Substring index over name, description, category and brand name.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    entries: Vec<Entry>,
}

impl SearchIndex {
    /// Index every product of a catalog.
    #[must_use]
    pub fn build(catalog: &Catalog) -> Self {
        let entries = catalog
            .products()
            .iter()
            .map(|p| Entry {
                fields: [
                    p.name.to_lowercase(),
                    p.description.to_lowercase(),
                    p.category.to_lowercase(),
                    p.brand_name.to_lowercase(),
                ],
                product: Arc::clone(p),
            })
            .collect();
        Self { entries }
    }

    /// Products where any indexed field contains the query, in catalog order.
    ///
    /// A blank query means search is inactive and matches nothing.
    #[must_use]
    pub fn query(&self, query: &str) -> Vec<Arc<Product>> {
        let Some(needle) = normalize_query(query) else {
            return Vec::new();
        };

        self.entries
            .iter()
            .filter(|e| e.fields.iter().any(|f| f.contains(&needle)))
            .map(|e| Arc::clone(&e.product))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Trimmed, lowercased needle; `None` when the query is blank.
#[must_use]
pub fn normalize_query(query: &str) -> Option<String> {
    let trimmed = query.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use shopfront_core::PriceVisibility;

    use super::*;
    use crate::catalog::{FlagOdds, ScriptedRandom};

    fn index() -> SearchIndex {
        let records = vec![
            json!({"id": 1, "name": "Trail Runner", "description": "Lightweight shoe", "category": "FOOTWEAR", "brandName": "Stride"}),
            json!({"id": 2, "name": "Rain Jacket", "description": "Seam-sealed shell with hood", "category": "OUTERWEAR", "brandName": "Nimbus"}),
            json!({"id": 3, "name": "Wool Socks", "description": "Merino blend", "category": "FOOTWEAR", "brandName": "Stride"}),
        ];
        let catalog = Catalog::from_batch(
            &records,
            PriceVisibility::Shown,
            &FlagOdds::default(),
            &mut ScriptedRandom::default(),
        );
        SearchIndex::build(&catalog)
    }

    fn names(results: &[Arc<Product>]) -> Vec<&str> {
        results.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_matches_description_only() {
        let results = index().query("seam-sealed");
        assert_eq!(names(&results), vec!["Rain Jacket"]);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(names(&index().query("WOOL")), vec!["Wool Socks"]);
        assert_eq!(names(&index().query("footwear")).len(), 2);
    }

    #[test]
    fn test_brand_match_keeps_catalog_order() {
        assert_eq!(
            names(&index().query("stride")),
            vec!["Trail Runner", "Wool Socks"]
        );
    }

    #[test]
    fn test_blank_query_is_inactive() {
        assert!(index().query("").is_empty());
        assert!(index().query("   \t").is_empty());
    }

    #[test]
    fn test_query_trimmed() {
        assert_eq!(names(&index().query("  jacket ")), vec!["Rain Jacket"]);
    }

    #[test]
    fn test_no_match() {
        assert!(index().query("umbrella").is_empty());
    }
}
