//! Wishlist route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::Serialize;
use shopfront_core::{PriceVisibility, WishlistEntry};
use tracing::instrument;

use crate::error::Result;
use crate::session::Session;
use crate::state::AppState;

use super::parse_id;

/// Wishlist entry display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntryView {
    pub product_id: String,
    pub name: String,
    pub image: String,
    pub price: Option<Decimal>,
    pub rating: f64,
    pub reviews: u32,
    pub in_stock: bool,
    pub brand_name: String,
    pub category: String,
}

impl WishlistEntryView {
    fn new(entry: &WishlistEntry, shown: bool) -> Self {
        Self {
            product_id: entry.product_id.to_string(),
            name: entry.name.clone(),
            image: entry.image.clone(),
            price: shown.then_some(entry.price),
            rating: entry.rating,
            reviews: entry.reviews,
            in_stock: entry.in_stock,
            brand_name: entry.brand_name.clone(),
            category: entry.category.clone(),
        }
    }
}

/// Wishlist display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistView {
    pub entries: Vec<WishlistEntryView>,
    pub count: usize,
}

impl WishlistView {
    fn new(session: &Session) -> Self {
        let shown = session.catalog().pricing() == PriceVisibility::Shown;
        let wishlist = session.store().wishlist();
        Self {
            entries: wishlist
                .entries()
                .iter()
                .map(|e| WishlistEntryView::new(e, shown))
                .collect(),
            count: wishlist.len(),
        }
    }
}

/// Result of a toggle.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResult {
    pub wishlisted: bool,
    pub wishlist: WishlistView,
}

#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<WishlistView> {
    let session = state.session().lock().await;
    Json(WishlistView::new(&session))
}

/// Toggle a product.
///
/// An id that is neither in the catalog nor on the wishlist leaves the
/// wishlist unchanged.
#[instrument(skip(state))]
pub async fn toggle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ToggleResult>> {
    let id = parse_id(&id)?;
    let mut session = state.session().lock().await;
    let wishlisted = session.toggle_wishlist(&id).unwrap_or(false);

    Ok(Json(ToggleResult {
        wishlisted,
        wishlist: WishlistView::new(&session),
    }))
}

#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Json<WishlistView> {
    let mut session = state.session().lock().await;
    session.clear_wishlist();
    Json(WishlistView::new(&session))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use super::*;
    use crate::routes::test_support::{send, state};

    #[tokio::test]
    async fn test_toggle_twice() {
        let state = state(
            &[json!({"id": "w1", "name": "Vase", "price": 40})],
            PriceVisibility::Shown,
        );

        let (status, body) = send(&state, Method::POST, "/api/wishlist/w1/toggle", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["wishlisted"], true);
        assert_eq!(body["wishlist"]["count"], 1);

        let (_, product) = send(&state, Method::GET, "/api/products/w1", None).await;
        assert_eq!(product["wishlisted"], true);

        let (_, body) = send(&state, Method::POST, "/api/wishlist/w1/toggle", None).await;
        assert_eq!(body["wishlisted"], false);
        assert_eq!(body["wishlist"]["count"], 0);
    }

    #[tokio::test]
    async fn test_toggle_unknown_is_noop() {
        let state = state(&[], PriceVisibility::Shown);
        let (status, body) = send(&state, Method::POST, "/api/wishlist/nope/toggle", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["wishlisted"], false);
        assert_eq!(body["wishlist"]["count"], 0);

        let (status, _) = send(&state, Method::POST, "/api/wishlist/%20/toggle", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_clear() {
        let state = state(
            &[json!({"id": "a"}), json!({"id": "b"})],
            PriceVisibility::Shown,
        );
        send(&state, Method::POST, "/api/wishlist/a/toggle", None).await;
        send(&state, Method::POST, "/api/wishlist/b/toggle", None).await;

        let (_, body) = send(&state, Method::DELETE, "/api/wishlist", None).await;
        assert_eq!(body["count"], 0);
        let (_, body) = send(&state, Method::GET, "/api/wishlist", None).await;
        assert!(body["entries"].as_array().unwrap().is_empty());
    }
}
