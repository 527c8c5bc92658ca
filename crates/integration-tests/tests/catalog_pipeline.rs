//! Integration tests for the catalog pipeline.
//!
//! Raw upstream payloads go through envelope decoding, normalization,
//! deduplication, sectioning, search, filtering and paging the same way the
//! storefront session runs them.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::collections::HashSet;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::{Value, json};
use shopfront_core::{PricePolicy, PriceVisibility, Product, SortOrder, resolve_price};
use shopfront_storefront::catalog::{
    ALL_SECTION, Catalog, FlagOdds, ListQuery, Paginator, ScriptedRandom, SearchIndex,
    SectionPlan, StdRandom, sections,
};
use shopfront_storefront::upstream::envelope::decode_envelope;

fn catalog_from(payload: &Value) -> Catalog {
    let records = decode_envelope(payload);
    Catalog::from_batch(
        &records,
        PriceVisibility::Shown,
        &FlagOdds::default(),
        &mut StdRandom::seeded(11),
    )
}

fn numbered(n: usize) -> Value {
    Value::Array(
        (0..n)
            .map(|i| json!({"id": format!("n{i}"), "name": format!("Item {i}"), "price": i}))
            .collect(),
    )
}

fn ids(products: &[Arc<Product>]) -> Vec<&str> {
    products.iter().map(|p| p.id.as_str()).collect()
}

// ============================================================================
// Normalization and deduplication
// ============================================================================

#[test]
fn test_duplicate_ids_keep_first_occurrence() {
    let catalog = catalog_from(&json!({
        "content": [
            {"id": "dup", "name": "First", "price": 10},
            {"id": "other", "name": "Other"},
            {"id": "dup", "name": "Second", "price": 99},
        ]
    }));

    assert_eq!(catalog.len(), 2);
    let dup = catalog.get(&"dup".parse().unwrap()).unwrap();
    assert_eq!(dup.name, "First");
    assert_eq!(dup.price, Decimal::from(10));
}

#[test]
fn test_every_envelope_shape_yields_products() {
    let records = json!([{"id": 1, "name": "One"}, {"id": 2, "name": "Two"}]);
    for payload in [
        json!({"content": records.clone()}),
        records.clone(),
        json!({"products": records.clone()}),
        json!({"data": records.clone()}),
    ] {
        let catalog = catalog_from(&payload);
        assert_eq!(ids(catalog.products()), vec!["1", "2"], "payload: {payload}");
    }
}

#[test]
fn test_unknown_envelope_is_empty_catalog() {
    for payload in [json!({"items": []}), json!("nope"), json!(null), json!({"data": {}})] {
        assert!(catalog_from(&payload).is_empty());
    }
}

#[test]
fn test_defaults_for_missing_fields() {
    let catalog = catalog_from(&json!([{"id": "bare", "price": "abc", "currentStock": -4}]));
    let product = &catalog.products()[0];
    assert!(!product.name.is_empty());
    assert!(!product.description.is_empty());
    assert!(!product.image.is_empty());
    assert_eq!(product.price, Decimal::ZERO);
    assert_eq!(product.current_stock, 0);
    assert!(!product.in_stock());
}

#[test]
fn test_scripted_flags() {
    let records = vec![
        json!({"id": "in", "currentStock": 5}),
        json!({"id": "out", "currentStock": 1, "reservedStock": 3}),
    ];
    // Five draws per product, in order: new, best seller, trending,
    // featured, back in stock.
    let mut rng = ScriptedRandom::new(
        [true, false, true, false, true, false, true, false, true, true],
        std::iter::empty(),
    );
    let catalog = Catalog::from_batch(&records, PriceVisibility::Shown, &FlagOdds::default(), &mut rng);

    let first = catalog.products()[0].flags;
    assert!(first.is_new && !first.is_best_seller && first.is_trending);
    assert!(!first.is_featured && first.is_back_in_stock);

    let second = catalog.products()[1].flags;
    assert!(!second.is_new && second.is_best_seller && !second.is_trending);
    assert!(second.is_featured);
    assert!(!second.is_back_in_stock, "out of stock products are never back in stock");
}

// ============================================================================
// Price resolution
// ============================================================================

#[test]
fn test_price_resolution_table() {
    let d = |v: i64| Decimal::from(v);
    let policy = PricePolicy::default();
    assert_eq!(resolve_price(d(1000), Some(d(10)), Some(d(1000)), policy), d(900));
    assert_eq!(resolve_price(d(1000), Some(d(0)), Some(d(1200)), policy), d(1200));
    assert_eq!(resolve_price(d(1000), Some(d(0)), None, policy), d(1000));
    assert_eq!(
        resolve_price(d(1000), None, Some(d(1200)), PricePolicy::ExplicitPriceWins),
        d(1000)
    );
}

// ============================================================================
// Sections
// ============================================================================

#[test]
fn test_sections_are_disjoint_when_catalog_is_large_enough() {
    let catalog = catalog_from(&numbered(100));
    let plan = SectionPlan::default();

    for seed in 0..20 {
        let sections = sections::sectionize(&catalog, &plan, &mut StdRandom::seeded(seed));
        let mut seen = HashSet::new();
        for section in sections.iter().filter(|s| s.name != ALL_SECTION) {
            assert_eq!(section.len(), plan.limit());
            for product in &section.products {
                assert!(seen.insert(product.id.clone()), "seed {seed}: {}", product.id);
            }
        }
        assert_eq!(sections.get(ALL_SECTION).unwrap().len(), 100);
    }
}

#[test]
fn test_catch_all_keeps_catalog_order() {
    let catalog = catalog_from(&numbered(30));
    let sections = sections::sectionize(&catalog, &SectionPlan::default(), &mut StdRandom::seeded(2));
    assert_eq!(
        ids(&sections.get(ALL_SECTION).unwrap().products),
        ids(catalog.products())
    );
}

#[test]
fn test_small_catalog_underflows() {
    let catalog = catalog_from(&numbered(15));
    let sections = sections::sectionize(&catalog, &SectionPlan::default(), &mut StdRandom::seeded(4));
    let sizes: Vec<usize> = sections.iter().map(|s| s.len()).collect();
    assert_eq!(sizes, vec![12, 3, 0, 0, 15]);
}

// ============================================================================
// Search, filter and sort
// ============================================================================

#[test]
fn test_search_matches_description_only() {
    let catalog = catalog_from(&json!([
        {"id": "a", "name": "Mug", "description": "Glazed by hand"},
        {"id": "b", "name": "Plate", "description": "Dishwasher safe"},
    ]));
    let index = SearchIndex::build(&catalog);
    assert_eq!(ids(&index.query("GLAZED")), vec!["a"]);
    assert!(index.query("   ").is_empty());
}

#[test]
fn test_search_then_filter_then_sort() {
    let catalog = catalog_from(&json!([
        {"id": "a", "name": "Oak Table", "category": "FURNITURE", "price": 300, "rating": 4.1},
        {"id": "b", "name": "Oak Chair", "category": "FURNITURE", "price": 100, "rating": 4.8},
        {"id": "c", "name": "Oak Stool", "category": "FURNITURE", "price": 200, "rating": 4.8},
        {"id": "d", "name": "Oak Spoon", "category": "KITCHEN", "price": 5},
        {"id": "e", "name": "Pine Table", "category": "FURNITURE", "price": 150},
    ]));
    let hits = SearchIndex::build(&catalog).query("oak");

    let query = ListQuery {
        category: Some("furniture".to_string()),
        sort: SortOrder::PriceAsc,
        ..ListQuery::default()
    };
    assert_eq!(ids(&query.apply(hits.clone())), vec!["b", "c", "a"]);

    let query = ListQuery {
        min_price: Some(Decimal::from(100)),
        max_price: Some(Decimal::from(200)),
        sort: SortOrder::RatingDesc,
        ..ListQuery::default()
    };
    // Ties keep search order.
    assert_eq!(ids(&query.apply(hits)), vec!["b", "c"]);
}

#[test]
fn test_price_ascending() {
    let catalog = catalog_from(&json!([
        {"id": "x", "price": 300},
        {"id": "y", "price": 100},
        {"id": "z", "price": 200},
    ]));
    let query = ListQuery {
        sort: SortOrder::PriceAsc,
        ..ListQuery::default()
    };
    let sorted = query.apply(catalog.products().to_vec());
    let prices: Vec<Decimal> = sorted.iter().map(|p| p.price).collect();
    assert_eq!(prices, vec![Decimal::from(100), Decimal::from(200), Decimal::from(300)]);
}

// ============================================================================
// Paging
// ============================================================================

#[test]
fn test_paging_twenty_items() {
    let catalog = catalog_from(&numbered(20));
    let items = catalog.products();
    let mut paginator = Paginator::default();

    assert!(paginator.advance("all", items.len()));
    assert_eq!(paginator.cursor("all"), 1);
    assert_eq!(
        ids(paginator.window("all", items)),
        vec!["n6", "n7", "n8", "n9", "n10", "n11"]
    );

    while paginator.advance("all", items.len()) {}
    assert_eq!(paginator.cursor("all"), 3);
    assert!(!paginator.advance("all", items.len()));
    assert_eq!(paginator.cursor("all"), 3);
    assert_eq!(ids(paginator.window("all", items)), vec!["n18", "n19"]);
}
