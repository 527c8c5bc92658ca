//! Per-session coordinator for the catalog, its derived views and the store.
//!
//! A [`Session`] owns everything the presentation boundary reads: the current
//! [`Catalog`], the search index and sections built from it, pagination
//! cursors, the committed search, the filtered list and the cart/wishlist
//! [`Store`]. All mutation goes through `&mut self`, so callers serialize
//! commands by holding the session behind a single lock.
//!
//! # Refresh ordering
//!
//! Every refresh request takes a [`RefreshToken`] from [`Session::begin_refresh`].
//! A completed fetch is applied only if its token is still the latest issued;
//! results of superseded requests are discarded. The catalog is swapped in
//! one step and every derived view is rebuilt from the new catalog after the
//! swap.

use std::sync::Arc;

use shopfront_core::{LoadState, Product, ProductId};
use tracing::{debug, info, instrument, warn};

use crate::catalog::{
    Catalog, FlagOdds, ListQuery, Paginator, RandomSource, SearchIndex, Section, SectionPlan,
    Sections, search, sections,
};
use crate::store::Store;
use crate::upstream::{FetchedBatch, UpstreamError};

/// Paginator key of the filtered product list; reserved as a section name.
pub const RESULTS_KEY: &str = "results";

/// Identifies one refresh request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RefreshToken(u64);

impl RefreshToken {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// What happened to a completed fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The new catalog was swapped in.
    Applied { products: usize },
    /// A newer refresh was requested meanwhile; the result was dropped.
    Stale,
    /// The fetch failed; the previous catalog stays in place.
    Failed { message: String },
}

/// Catalog, derived views and store for one storefront session.
pub struct Session {
    catalog: Arc<Catalog>,
    index: SearchIndex,
    sections: Sections,
    paginator: Paginator,
    state: LoadState,
    latest_token: u64,
    list_query: ListQuery,
    search_query: Option<String>,
    search_results: Vec<Arc<Product>>,
    results: Vec<Arc<Product>>,
    store: Store,
    plan: SectionPlan,
    odds: FlagOdds,
    rng: Box<dyn RandomSource>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("products", &self.catalog.len())
            .field("state", &self.state)
            .field("latest_token", &self.latest_token)
            .field("list_query", &self.list_query)
            .field("search_query", &self.search_query)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Start a session with an empty catalog.
    #[must_use]
    pub fn new(store: Store, plan: SectionPlan, rng: Box<dyn RandomSource>) -> Self {
        let mut session = Self {
            catalog: Arc::new(Catalog::empty()),
            index: SearchIndex::default(),
            sections: Sections::default(),
            paginator: Paginator::default(),
            state: LoadState::Idle,
            latest_token: 0,
            list_query: ListQuery::default(),
            search_query: None,
            search_results: Vec::new(),
            results: Vec::new(),
            store,
            plan,
            odds: FlagOdds::default(),
            rng,
        };
        session.rebuild_views();
        session
    }

    /// Override the display flag probabilities used for later fetches.
    #[must_use]
    pub const fn with_flag_odds(mut self, odds: FlagOdds) -> Self {
        self.odds = odds;
        self
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    #[must_use]
    pub const fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    #[must_use]
    pub const fn load_state(&self) -> &LoadState {
        &self.state
    }

    /// Issue a token for a new refresh and enter the loading state.
    ///
    /// Any refresh still in flight becomes stale.
    #[instrument(skip(self))]
    pub fn begin_refresh(&mut self) -> RefreshToken {
        self.latest_token += 1;
        self.state = LoadState::Loading;
        debug!(token = self.latest_token, "Refresh requested");
        RefreshToken(self.latest_token)
    }

    /// Whether `token` belongs to the most recent refresh request.
    #[must_use]
    pub const fn is_current(&self, token: RefreshToken) -> bool {
        token.0 == self.latest_token
    }

    /// Apply the outcome of a fetch started with `token`.
    #[instrument(skip(self, result), fields(token = token.0))]
    pub fn complete_refresh(
        &mut self,
        token: RefreshToken,
        result: Result<FetchedBatch, UpstreamError>,
    ) -> RefreshOutcome {
        if !self.is_current(token) {
            info!(latest = self.latest_token, "Discarding stale catalog fetch");
            return RefreshOutcome::Stale;
        }

        match result {
            Ok(batch) => {
                let catalog = Catalog::from_batch(
                    &batch.records,
                    batch.pricing,
                    &self.odds,
                    self.rng.as_mut(),
                );
                let products = catalog.len();
                self.install_catalog(catalog);
                RefreshOutcome::Applied { products }
            }
            Err(e) => {
                warn!(error = %e, "Catalog fetch failed, keeping previous catalog");
                let message = e.to_string();
                self.state = LoadState::Failed {
                    message: message.clone(),
                };
                RefreshOutcome::Failed { message }
            }
        }
    }

    /// Swap in a new catalog and rebuild every derived view from it.
    pub fn install_catalog(&mut self, catalog: Catalog) {
        self.catalog = Arc::new(catalog);
        self.state = LoadState::Ready;
        self.rebuild_views();
        info!(
            products = self.catalog.len(),
            sections = self.sections.iter().count(),
            "Catalog installed"
        );
    }

    fn rebuild_views(&mut self) {
        self.index = SearchIndex::build(&self.catalog);
        self.sections = sections::sectionize(&self.catalog, &self.plan, self.rng.as_mut());
        self.paginator.reset_all();
        self.rerun_search();
        self.recompute_results();
    }

    // =========================================================================
    // Sections
    // =========================================================================

    #[must_use]
    pub const fn sections(&self) -> &Sections {
        &self.sections
    }

    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// Current window of a section, or `None` for an unknown section.
    #[must_use]
    pub fn section_window(&self, name: &str) -> Option<&[Arc<Product>]> {
        self.sections
            .get(name)
            .map(|s| self.paginator.window(name, &s.products))
    }

    #[must_use]
    pub fn cursor(&self, name: &str) -> usize {
        self.paginator.cursor(name)
    }

    /// Move a section one window forward; `None` for an unknown section.
    pub fn advance_section(&mut self, name: &str) -> Option<bool> {
        let len = self.sections.get(name)?.len();
        Some(self.paginator.advance(name, len))
    }

    /// Move a section one window back; `None` for an unknown section.
    pub fn retreat_section(&mut self, name: &str) -> Option<bool> {
        self.sections.get(name)?;
        Some(self.paginator.retreat(name))
    }

    // =========================================================================
    // Search and filtered list
    // =========================================================================

    /// The committed search query, if search is active.
    #[must_use]
    pub fn search_query(&self) -> Option<&str> {
        self.search_query.as_deref()
    }

    #[must_use]
    pub fn search_results(&self) -> &[Arc<Product>] {
        &self.search_results
    }

    /// Run a search and commit its result.
    ///
    /// A blank query deactivates search.
    #[instrument(skip(self))]
    pub fn commit_search(&mut self, query: &str) {
        self.search_query = search::normalize_query(query);
        self.rerun_search();
        self.recompute_results();
        debug!(hits = self.search_results.len(), "Search committed");
    }

    fn rerun_search(&mut self) {
        self.search_results = self
            .search_query
            .as_deref()
            .map(|q| self.index.query(q))
            .unwrap_or_default();
    }

    #[must_use]
    pub const fn list_query(&self) -> &ListQuery {
        &self.list_query
    }

    pub fn set_list_query(&mut self, query: ListQuery) {
        self.list_query = query;
        self.recompute_results();
    }

    /// The whole filtered and sorted list.
    ///
    /// Built from the search results while search is active, otherwise from
    /// the full catalog.
    #[must_use]
    pub fn results(&self) -> &[Arc<Product>] {
        &self.results
    }

    #[must_use]
    pub fn results_window(&self) -> &[Arc<Product>] {
        self.paginator.window(RESULTS_KEY, &self.results)
    }

    pub fn advance_results(&mut self) -> bool {
        self.paginator.advance(RESULTS_KEY, self.results.len())
    }

    pub fn retreat_results(&mut self) -> bool {
        self.paginator.retreat(RESULTS_KEY)
    }

    fn recompute_results(&mut self) {
        let base = if self.search_query.is_some() {
            self.search_results.clone()
        } else {
            self.catalog.products().to_vec()
        };
        self.results = self.list_query.apply(base);
        self.paginator.reset(RESULTS_KEY);
    }

    // =========================================================================
    // Cart and wishlist
    // =========================================================================

    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }

    /// Add a catalog product to the cart.
    ///
    /// Returns `false` if the id is not in the current catalog.
    pub fn add_to_cart(&mut self, id: &ProductId, quantity: u32) -> bool {
        match self.catalog.get(id) {
            Some(product) => {
                self.store.add_to_cart(product, quantity);
                true
            }
            None => false,
        }
    }

    pub fn update_cart_quantity(&mut self, id: &ProductId, quantity: u32) -> bool {
        self.store.update_cart_quantity(id, quantity)
    }

    pub fn remove_from_cart(&mut self, id: &ProductId) -> bool {
        self.store.remove_from_cart(id)
    }

    pub fn clear_cart(&mut self) {
        self.store.clear_cart();
    }

    /// Toggle a product on the wishlist.
    ///
    /// An id missing from the catalog can still be removed. Returns whether
    /// the product is wishlisted afterwards, or `None` if nothing changed.
    pub fn toggle_wishlist(&mut self, id: &ProductId) -> Option<bool> {
        if let Some(product) = self.catalog.get(id) {
            Some(self.store.toggle_wishlist(product))
        } else if self.store.remove_from_wishlist(id) {
            Some(false)
        } else {
            None
        }
    }

    pub fn clear_wishlist(&mut self) {
        self.store.clear_wishlist();
    }
}
