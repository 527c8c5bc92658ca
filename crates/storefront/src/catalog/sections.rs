//! Partitioning of the catalog into named display sections.
//!
//! One pass shuffles the catalog and hands each named section up to
//! `capacity × pages` products nobody else has claimed yet. A trailing
//! catch-all section always holds the whole catalog in upstream order.
//! When the catalog runs out, later sections simply receive fewer products.

use std::collections::HashSet;
use std::sync::Arc;

use shopfront_core::{Product, ProductId};
use tracing::{debug, warn};

use super::Catalog;
use super::random::{RandomSource, shuffle};

/// Name of the catch-all section.
pub const ALL_SECTION: &str = "all";

/// Which sections to build and how large each may be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionPlan {
    /// Section names in claim order.
    pub names: Vec<String>,
    /// Products per page of a section.
    pub capacity: usize,
    /// Pages worth of products each section may claim.
    pub pages: usize,
}

impl Default for SectionPlan {
    fn default() -> Self {
        Self {
            names: ["trending", "best-sellers", "new-arrivals", "featured"]
                .map(String::from)
                .to_vec(),
            capacity: 6,
            pages: 2,
        }
    }
}

impl SectionPlan {
    /// Maximum number of products a single section may claim.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.capacity.saturating_mul(self.pages)
    }
}

/// A named, ordered subset of the catalog.
#[derive(Debug, Clone)]
pub struct Section {
    pub name: String,
    pub products: Vec<Arc<Product>>,
}

impl Section {
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// The result of one sectionizer pass. The catch-all section is last.
#[derive(Debug, Clone, Default)]
pub struct Sections {
    sections: Vec<Section>,
}

impl Sections {
    /// Look up a section by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// All sections, catch-all last.
    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, Section> {
        self.sections.iter()
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.name.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a Sections {
    type Item = &'a Section;
    type IntoIter = std::slice::Iter<'a, Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.iter()
    }
}

/// Build sections from a catalog.
///
/// Each call produces a new, independent partition.
pub fn sectionize(catalog: &Catalog, plan: &SectionPlan, rng: &mut dyn RandomSource) -> Sections {
    let mut pool: Vec<Arc<Product>> = catalog.products().to_vec();
    shuffle(&mut pool, rng);

    let limit = plan.limit();
    let mut claimed: HashSet<ProductId> = HashSet::with_capacity(pool.len());
    let mut seen_names: HashSet<&str> = HashSet::new();
    let mut sections = Vec::with_capacity(plan.names.len() + 1);

    for name in &plan.names {
        if name == ALL_SECTION || !seen_names.insert(name.as_str()) {
            warn!(section = %name, "Skipping reserved or repeated section name");
            continue;
        }

        let products: Vec<Arc<Product>> = pool
            .iter()
            .filter(|p| !claimed.contains(&p.id))
            .take(limit)
            .cloned()
            .collect();
        claimed.extend(products.iter().map(|p| p.id.clone()));

        if products.len() < limit {
            debug!(
                section = %name,
                got = products.len(),
                limit,
                "Section underfilled"
            );
        }

        sections.push(Section {
            name: name.clone(),
            products,
        });
    }

    sections.push(Section {
        name: ALL_SECTION.to_string(),
        products: catalog.products().to_vec(),
    });

    Sections { sections }
}
