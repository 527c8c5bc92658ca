//! Cart route handlers.
//!
//! Update and remove on an id that is not in the cart, or a quantity below 1,
//! leave the cart unchanged and still answer with the current cart.
//! Quantities arrive as signed integers so that negative values reach the
//! handler and are ignored like 0; values above `u32::MAX` are clamped.

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopfront_core::{CartLine, PriceVisibility};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::session::Session;
use crate::state::AppState;

use super::parse_id;

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    pub product_id: String,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub unit_price: Option<Decimal>,
    pub line_total: Option<Decimal>,
    pub in_stock: bool,
    pub brand_name: String,
    pub item_code: String,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub item_count: u64,
    pub subtotal: Option<Decimal>,
}

impl CartView {
    fn new(session: &Session) -> Self {
        let shown = session.catalog().pricing() == PriceVisibility::Shown;
        let cart = session.store().cart();
        Self {
            lines: cart
                .lines()
                .iter()
                .map(|line| CartLineView::new(line, shown))
                .collect(),
            item_count: cart.item_count(),
            subtotal: shown.then(|| cart.subtotal()),
        }
    }
}

impl CartLineView {
    fn new(line: &CartLine, shown: bool) -> Self {
        Self {
            product_id: line.product_id.to_string(),
            name: line.name.clone(),
            image: line.image.clone(),
            quantity: line.quantity,
            unit_price: shown.then_some(line.unit_price),
            line_total: shown.then(|| line.line_total()),
            in_stock: line.in_stock,
            brand_name: line.brand_name.clone(),
            item_code: line.item_code.clone(),
        }
    }
}

/// Add to cart input.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCart {
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

const fn default_quantity() -> i64 {
    1
}

/// Quantity update input.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantity {
    pub quantity: i64,
}

/// A usable quantity, or `None` below 1.
fn quantity(raw: i64) -> Option<u32> {
    (raw >= 1).then(|| u32::try_from(raw).unwrap_or(u32::MAX))
}

#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartView> {
    let session = state.session().lock().await;
    Json(CartView::new(&session))
}

/// Add a catalog product, merging into an existing line.
///
/// An unknown product is a 404; a quantity below 1 leaves the cart unchanged.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(input): Json<AddToCart>,
) -> Result<Json<CartView>> {
    let id = parse_id(&input.product_id)?;
    let mut session = state.session().lock().await;
    if session.catalog().get(&id).is_none() {
        return Err(AppError::NotFound(format!("product {id}")));
    }
    if let Some(quantity) = quantity(input.quantity) {
        session.add_to_cart(&id, quantity);
    }
    Ok(Json(CartView::new(&session)))
}

#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateQuantity>,
) -> Result<Json<CartView>> {
    let id = parse_id(&id)?;
    let mut session = state.session().lock().await;
    if let Some(quantity) = quantity(input.quantity) {
        session.update_cart_quantity(&id, quantity);
    }
    Ok(Json(CartView::new(&session)))
}

#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CartView>> {
    let id = parse_id(&id)?;
    let mut session = state.session().lock().await;
    session.remove_from_cart(&id);
    Ok(Json(CartView::new(&session)))
}

#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Json<CartView> {
    let mut session = state.session().lock().await;
    session.clear_cart();
    Json(CartView::new(&session))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::{Value, json};

    use super::*;
    use crate::routes::test_support::{send, state};

    fn records() -> Vec<Value> {
        vec![
            json!({"id": "a", "name": "Alpha", "price": 10, "currentStock": 2}),
            json!({"id": "b", "name": "Beta", "price": "2.50"}),
        ]
    }

    fn subtotal(body: &Value) -> Decimal {
        body["subtotal"].as_str().unwrap().parse().unwrap()
    }

    #[tokio::test]
    async fn test_add_merges() {
        let state = state(&records(), PriceVisibility::Shown);
        send(&state, Method::POST, "/api/cart", Some(json!({"productId": "a"}))).await;
        let (status, body) = send(
            &state,
            Method::POST,
            "/api/cart",
            Some(json!({"productId": "a", "quantity": 2})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["lines"].as_array().unwrap().len(), 1);
        assert_eq!(body["lines"][0]["quantity"], 3);
        assert_eq!(body["itemCount"], 3);
        assert_eq!(subtotal(&body), Decimal::from(30));
    }

    #[tokio::test]
    async fn test_add_unknown_product() {
        let state = state(&records(), PriceVisibility::Shown);
        let (status, _) =
            send(&state, Method::POST, "/api/cart", Some(json!({"productId": "zzz"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) =
            send(&state, Method::POST, "/api/cart", Some(json!({"productId": "  "}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_and_remove() {
        let state = state(&records(), PriceVisibility::Shown);
        send(&state, Method::POST, "/api/cart", Some(json!({"productId": "b"}))).await;

        let (_, body) =
            send(&state, Method::PUT, "/api/cart/b", Some(json!({"quantity": 0}))).await;
        assert_eq!(body["lines"][0]["quantity"], 1);

        let (_, body) =
            send(&state, Method::PUT, "/api/cart/b", Some(json!({"quantity": 4}))).await;
        assert_eq!(body["lines"][0]["quantity"], 4);
        assert_eq!(subtotal(&body), Decimal::from(10));

        let (status, body) = send(&state, Method::DELETE, "/api/cart/missing", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["itemCount"], 4);

        let (_, body) = send(&state, Method::DELETE, "/api/cart/b", None).await;
        assert_eq!(body["itemCount"], 0);
    }

    #[tokio::test]
    async fn test_quantity_below_one_is_ignored() {
        let state = state(&records(), PriceVisibility::Shown);
        send(&state, Method::POST, "/api/cart", Some(json!({"productId": "a", "quantity": 2}))).await;

        for bad in [0, -1, -40] {
            let (status, body) =
                send(&state, Method::PUT, "/api/cart/a", Some(json!({"quantity": bad}))).await;
            assert_eq!(status, StatusCode::OK, "quantity {bad}");
            assert_eq!(body["lines"][0]["quantity"], 2);

            let (status, body) = send(
                &state,
                Method::POST,
                "/api/cart",
                Some(json!({"productId": "b", "quantity": bad})),
            )
            .await;
            assert_eq!(status, StatusCode::OK, "quantity {bad}");
            assert_eq!(body["lines"].as_array().unwrap().len(), 1);
        }
    }

    #[tokio::test]
    async fn test_huge_quantity_is_clamped() {
        let state = state(&records(), PriceVisibility::Shown);
        send(&state, Method::POST, "/api/cart", Some(json!({"productId": "a"}))).await;
        let (status, body) = send(
            &state,
            Method::PUT,
            "/api/cart/a",
            Some(json!({"quantity": i64::from(u32::MAX) + 10})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["lines"][0]["quantity"], u32::MAX);
    }

    #[test]
    fn test_quantity_conversion() {
        assert_eq!(quantity(-1), None);
        assert_eq!(quantity(0), None);
        assert_eq!(quantity(1), Some(1));
        assert_eq!(quantity(i64::MAX), Some(u32::MAX));
    }

    #[tokio::test]
    async fn test_clear() {
        let state = state(&records(), PriceVisibility::Shown);
        send(&state, Method::POST, "/api/cart", Some(json!({"productId": "a"}))).await;
        send(&state, Method::POST, "/api/cart", Some(json!({"productId": "b"}))).await;
        let (_, body) = send(&state, Method::DELETE, "/api/cart", None).await;
        assert!(body["lines"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_hidden_prices() {
        let state = state(&records(), PriceVisibility::Hidden);
        let (_, body) =
            send(&state, Method::POST, "/api/cart", Some(json!({"productId": "a"}))).await;
        assert_eq!(body["subtotal"], Value::Null);
        assert_eq!(body["lines"][0]["unitPrice"], Value::Null);
        assert_eq!(body["itemCount"], 1);
    }
}
