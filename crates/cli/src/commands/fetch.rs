//! One-off catalog fetch.
//!
//! # Usage
//!
//! ```bash
//! sf-cli fetch
//! sf-cli fetch --anonymous
//! ```
//!
//! # Environment Variables
//!
//! Reads the same variables as the storefront binary; `CATALOG_API_URL` is
//! required.

use shopfront_core::PriceVisibility;
use shopfront_storefront::catalog::{Catalog, FlagOdds, Sections, StdRandom, sections};
use shopfront_storefront::config::{ConfigError, StorefrontConfig};
use shopfront_storefront::upstream::{CatalogClient, UpstreamError};
use thiserror::Error;

/// Errors that can occur during a fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The upstream fetch failed.
    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),
}

/// What a fetch produced.
#[derive(Debug, PartialEq, Eq)]
pub struct Summary {
    pub raw: usize,
    pub products: usize,
    pub in_stock: usize,
    pub pricing: PriceVisibility,
    pub sections: Vec<(String, usize)>,
}

impl Summary {
    fn new(raw: usize, catalog: &Catalog, sections: &Sections) -> Self {
        Self {
            raw,
            products: catalog.len(),
            in_stock: catalog.products().iter().filter(|p| p.in_stock()).count(),
            pricing: catalog.pricing(),
            sections: sections
                .iter()
                .map(|s| (s.name.clone(), s.len()))
                .collect(),
        }
    }

    /// Records dropped for a missing id or a duplicate id.
    #[must_use]
    pub const fn dropped(&self) -> usize {
        self.raw.saturating_sub(self.products)
    }
}

/// Fetch the catalog once and log a summary.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the fetch fails.
pub async fn run(anonymous: bool) -> Result<Summary, FetchError> {
    let config = StorefrontConfig::from_env()?;
    let client = CatalogClient::new(config.upstream.clone())?;
    let credential = config
        .upstream
        .bearer_token
        .as_ref()
        .filter(|_| !anonymous);

    tracing::info!("Fetching catalog from {}...", config.upstream.api_url);
    let batch = client.fetch(credential).await?;

    let mut rng = StdRandom::from_os();
    let catalog = Catalog::from_batch(&batch.records, batch.pricing, &FlagOdds::default(), &mut rng);
    let sections = sections::sectionize(&catalog, &config.sections, &mut rng);
    let summary = Summary::new(batch.records.len(), &catalog, &sections);

    tracing::info!(
        raw = summary.raw,
        products = summary.products,
        dropped = summary.dropped(),
        in_stock = summary.in_stock,
        pricing = ?summary.pricing,
        "Catalog fetched"
    );
    for (name, size) in &summary.sections {
        tracing::info!("  {name}: {size} products");
    }

    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use shopfront_storefront::catalog::{ALL_SECTION, SectionPlan};

    use super::*;

    #[test]
    fn test_summary() {
        let records = vec![
            json!({"id": "a", "currentStock": 3}),
            json!({"id": "a", "currentStock": 9}),
            json!({"name": "no id"}),
            json!({"id": "b", "currentStock": 1, "reservedStock": 1}),
        ];
        let mut rng = StdRandom::seeded(5);
        let catalog =
            Catalog::from_batch(&records, PriceVisibility::Shown, &FlagOdds::default(), &mut rng);
        let plan = SectionPlan {
            names: vec!["featured".to_string()],
            capacity: 1,
            pages: 1,
        };
        let sections = sections::sectionize(&catalog, &plan, &mut rng);

        let summary = Summary::new(records.len(), &catalog, &sections);
        assert_eq!(summary.products, 2);
        assert_eq!(summary.dropped(), 2);
        assert_eq!(summary.in_stock, 1);
        assert_eq!(
            summary.sections,
            vec![("featured".to_string(), 1), (ALL_SECTION.to_string(), 2)]
        );
    }
}
