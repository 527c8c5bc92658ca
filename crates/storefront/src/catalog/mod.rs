//! Product catalog aggregation pipeline.
//!
//! # Data Flow
//!
//! ```text
//! raw batch ─► normalize ─► deduplicate ─► Catalog ─► sections ─► Sections
//!                                            │
//!                         query/filter/sort ─┴► search + filter ─► paginate
//! ```
//!
//! A [`Catalog`] is immutable. Refreshing builds a new one and swaps it in
//! whole; nothing ever patches a catalog in place.

pub mod filter;
pub mod normalize;
pub mod paginate;
pub mod random;
pub mod search;
pub mod sections;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use shopfront_core::{PriceVisibility, Product, ProductId};
use tracing::info;

pub use filter::ListQuery;
pub use normalize::FlagOdds;
pub use paginate::{Paginator, WINDOW_SIZE};
pub use random::{RandomSource, ScriptedRandom, StdRandom};
pub use search::SearchIndex;
pub use sections::{ALL_SECTION, Section, SectionPlan, Sections};

/// The deduplicated, normalized set of products for the session.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Arc<Product>>,
    by_id: HashMap<ProductId, usize>,
    pricing: PriceVisibility,
    fetched_at: Option<DateTime<Utc>>,
}

impl Catalog {
    /// An empty catalog, used before the first successful fetch.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a catalog from already unique products.
    #[must_use]
    pub fn new(products: Vec<Product>, pricing: PriceVisibility) -> Self {
        let products: Vec<Arc<Product>> = products.into_iter().map(Arc::new).collect();
        let by_id: HashMap<ProductId, usize> = products
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.clone(), i))
            .collect();
        debug_assert_eq!(by_id.len(), products.len(), "duplicate id in catalog");

        Self {
            products,
            by_id,
            pricing,
            fetched_at: Some(Utc::now()),
        }
    }

    /// Run a raw upstream batch through normalization and deduplication.
    pub fn from_batch(
        records: &[Value],
        pricing: PriceVisibility,
        odds: &FlagOdds,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let products = normalize::normalize_batch(records, odds, rng);
        info!(
            raw = records.len(),
            products = products.len(),
            "Built catalog from upstream batch"
        );
        Self::new(products, pricing)
    }

    /// Products in upstream order.
    #[must_use]
    pub fn products(&self) -> &[Arc<Product>] {
        &self.products
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Arc<Product>> {
        self.by_id.get(id).and_then(|&i| self.products.get(i))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Whether prices may be displayed for this catalog.
    #[must_use]
    pub const fn pricing(&self) -> PriceVisibility {
        self.pricing
    }

    /// When this catalog was built; `None` for the initial empty catalog.
    #[must_use]
    pub const fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }
}
