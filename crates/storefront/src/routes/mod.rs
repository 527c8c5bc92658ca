//! HTTP route handlers for storefront.
//!
//! Every route speaks JSON. Rendering is left to the client; these handlers
//! only expose session accessors and commands.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                     - Health check
//!
//! # Catalog
//! GET    /api/catalog                - Load state, pricing, product count
//! POST   /api/catalog/refresh        - Fetch and apply (last request wins)
//! GET    /api/sections               - Section names, sizes and cursors
//! GET    /api/sections/{name}        - Current window of a section
//! POST   /api/sections/{name}/next   - Advance a section window
//! POST   /api/sections/{name}/prev   - Retreat a section window
//!
//! # Products
//! GET    /api/products               - Current window of the filtered list
//! PUT    /api/products/query         - Set filter and sort
//! POST   /api/products/next          - Advance the list window
//! POST   /api/products/prev          - Retreat the list window
//! GET    /api/products/{id}          - Product detail
//! POST   /api/search                 - Schedule a debounced search
//! GET    /api/search                 - Committed search result
//!
//! # Cart
//! GET    /api/cart                   - Lines and totals
//! POST   /api/cart                   - Add or merge a product
//! DELETE /api/cart                   - Clear
//! PUT    /api/cart/{id}              - Set quantity
//! DELETE /api/cart/{id}              - Remove line
//!
//! # Wishlist
//! GET    /api/wishlist               - Entries
//! POST   /api/wishlist/{id}/toggle   - Toggle a product
//! DELETE /api/wishlist               - Clear
//! ```

pub mod cart;
pub mod catalog;
pub mod products;
pub mod wishlist;

use axum::{
    Router,
    routing::{get, post, put},
};
use shopfront_core::ProductId;

use crate::error::AppError;
use crate::state::AppState;

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::status))
        .route("/refresh", post(catalog::refresh))
}

/// Create the section routes router.
pub fn section_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::sections))
        .route("/{name}", get(catalog::section))
        .route("/{name}/next", post(catalog::next_section))
        .route("/{name}/prev", post(catalog::prev_section))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/query", put(products::set_query))
        .route("/next", post(products::next_page))
        .route("/prev", post(products::prev_page))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).post(cart::add).delete(cart::clear))
        .route("/{id}", put(cart::update).delete(cart::remove))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show).delete(wishlist::clear))
        .route("/{id}/toggle", post(wishlist::toggle))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/api/catalog", catalog_routes())
        .nest("/api/sections", section_routes())
        .nest("/api/products", product_routes())
        .route("/api/search", get(products::search).post(products::schedule_search))
        .nest("/api/cart", cart_routes())
        .nest("/api/wishlist", wishlist_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the upstream.
async fn health() -> &'static str {
    "ok"
}

/// Parse a product id taken from a path or body.
fn parse_id(raw: &str) -> Result<ProductId, AppError> {
    ProductId::parse(raw).map_err(|e| AppError::BadRequest(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
pub(crate) mod test_support {
    use std::net::{IpAddr, Ipv4Addr};
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use serde_json::Value;
    use shopfront_core::{PricePolicy, PriceVisibility};
    use tower::ServiceExt;
    use url::Url;

    use super::routes;
    use crate::catalog::{Catalog, FlagOdds, SectionPlan, StdRandom};
    use crate::config::{StorefrontConfig, UpstreamConfig};
    use crate::session::Session;
    use crate::state::AppState;
    use crate::store::{MemoryStorage, Store};
    use crate::upstream::CatalogClient;

    pub fn config() -> StorefrontConfig {
        StorefrontConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            storage_dir: PathBuf::from(".unused"),
            upstream: UpstreamConfig::new(Url::parse("http://127.0.0.1:9/products").unwrap()),
            sections: SectionPlan::default(),
            search_debounce: Duration::from_millis(10),
            price_policy: PricePolicy::default(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// State whose catalog holds `records`.
    pub fn state(records: &[Value], pricing: PriceVisibility) -> AppState {
        let config = config();
        let store = Store::open(Arc::new(MemoryStorage::new()), config.price_policy);
        let mut rng = StdRandom::seeded(3);
        let catalog = Catalog::from_batch(records, pricing, &FlagOdds::default(), &mut rng);
        let mut session = Session::new(store, config.sections.clone(), Box::new(rng));
        session.install_catalog(catalog);
        let client = CatalogClient::new(config.upstream.clone()).unwrap();
        AppState::from_parts(config, client, session)
    }

    /// Send one request and decode the JSON response body.
    pub async fn send(
        state: &AppState,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = routes()
            .with_state(state.clone())
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::{Method, StatusCode};
    use shopfront_core::PriceVisibility;

    use super::test_support::{send, state};

    #[tokio::test]
    async fn test_health() {
        let (status, _) = send(&state(&[], PriceVisibility::Shown), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (status, _) =
            send(&state(&[], PriceVisibility::Shown), Method::GET, "/api/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
