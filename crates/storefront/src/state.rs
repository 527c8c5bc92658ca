//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{instrument, warn};

use crate::catalog::StdRandom;
use crate::config::StorefrontConfig;
use crate::search_task::SearchScheduler;
use crate::session::{RefreshOutcome, Session};
use crate::store::{DurableStorage, FileStorage, MemoryStorage, Store};
use crate::upstream::{CatalogClient, UpstreamError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// session, the upstream client and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogClient,
    session: Arc<Mutex<Session>>,
    search: SearchScheduler,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Opens the durable store in the configured directory, falling back to
    /// in-memory storage if the directory cannot be used.
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, UpstreamError> {
        let storage: Arc<dyn DurableStorage> = match FileStorage::open(&config.storage_dir) {
            Ok(storage) => Arc::new(storage),
            Err(e) => {
                warn!(
                    dir = %config.storage_dir.display(),
                    error = %e,
                    "Durable storage unavailable, cart and wishlist will not persist"
                );
                Arc::new(MemoryStorage::new())
            }
        };

        let store = Store::open(storage, config.price_policy);
        let session = Session::new(store, config.sections.clone(), Box::new(StdRandom::from_os()));
        let catalog = CatalogClient::new(config.upstream.clone())?;

        Ok(Self::from_parts(config, catalog, session))
    }

    /// Assemble state from already built parts.
    #[must_use]
    pub fn from_parts(config: StorefrontConfig, catalog: CatalogClient, session: Session) -> Self {
        let search = SearchScheduler::new(config.search_debounce);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                session: Arc::new(Mutex::new(session)),
                search,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the upstream catalog client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get the shared session.
    #[must_use]
    pub fn session(&self) -> &Arc<Mutex<Session>> {
        &self.inner.session
    }

    /// Get the debounced search scheduler.
    #[must_use]
    pub fn search(&self) -> &SearchScheduler {
        &self.inner.search
    }

    /// Fetch the catalog and apply it if no newer refresh was requested
    /// meanwhile.
    ///
    /// The session lock is not held across the fetch, so readers keep seeing
    /// the previous catalog while it is outstanding.
    #[instrument(skip(self))]
    pub async fn refresh_catalog(&self) -> RefreshOutcome {
        let token = self.session().lock().await.begin_refresh();
        let result = self
            .catalog()
            .fetch(self.config().upstream.bearer_token.as_ref())
            .await;
        self.session().lock().await.complete_refresh(token, result)
    }
}
