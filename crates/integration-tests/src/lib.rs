//! Integration tests for Shopfront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! No external services are needed: the upstream catalog is served by an
//! in-process axum server on an ephemeral port, and durable storage lives in
//! temporary directories.
//!
//! # Test Categories
//!
//! - `catalog_pipeline` - Normalization, sections, search, filter and paging
//! - `cart_persistence` - Cart and wishlist write-through and reload
//! - `upstream_client` - HTTP client against a fake upstream, refresh ordering

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use rust_decimal::Decimal;
use shopfront_core::{DisplayFlags, Product, ProductId};
use shopfront_storefront::config::UpstreamConfig;
use url::Url;

/// Serve `app` on an ephemeral local port until the test runtime stops.
///
/// # Errors
///
/// Returns an error if no local port can be bound.
pub async fn spawn_upstream(app: Router) -> io::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(addr)
}

/// Upstream configuration pointing at `path` on a fake upstream.
///
/// # Errors
///
/// Returns an error if the resulting URL is invalid.
pub fn upstream_config(addr: SocketAddr, path: &str) -> Result<UpstreamConfig, url::ParseError> {
    let mut config = UpstreamConfig::new(Url::parse(&format!("http://{addr}{path}"))?);
    config.timeout = Duration::from_secs(5);
    Ok(config)
}

/// A plain product for store tests.
///
/// # Panics
///
/// Panics if `id` is blank.
#[must_use]
pub fn product(id: &str, price: i64) -> Product {
    Product {
        id: ProductId::parse(id).unwrap_or_else(|_| panic!("blank product id")),
        name: format!("Product {id}"),
        description: format!("Description of {id}"),
        brand_name: "Acme".to_string(),
        category: "GENERAL".to_string(),
        sub_category: String::new(),
        item_code: format!("SKU-{id}"),
        image: format!("/images/{id}.png"),
        price: Decimal::from(price),
        discount: None,
        original_price: None,
        current_stock: 10,
        reserved_stock: 2,
        rating: 4.0,
        review_count: 3,
        flags: DisplayFlags::default(),
    }
}
