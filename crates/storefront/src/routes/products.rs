//! Product list, detail and search handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopfront_core::{DisplayFlags, PricePolicy, PriceVisibility, Product};
use tracing::instrument;

use crate::catalog::{ListQuery, WINDOW_SIZE};
use crate::error::{AppError, Result};
use crate::session::{RESULTS_KEY, Session};
use crate::state::AppState;

use super::parse_id;

/// Product display data.
///
/// Price fields are `None` when the session's prices are hidden.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub brand_name: String,
    pub category: String,
    pub sub_category: String,
    pub item_code: String,
    pub image: String,
    pub price: Option<Decimal>,
    pub original_price: Option<Decimal>,
    pub discount: Option<Decimal>,
    pub resolved_price: Option<Decimal>,
    pub available_stock: u32,
    pub in_stock: bool,
    pub rating: f64,
    pub review_count: u32,
    #[serde(flatten)]
    pub flags: DisplayFlags,
    pub wishlisted: bool,
}

impl ProductView {
    #[must_use]
    pub fn new(
        product: &Product,
        pricing: PriceVisibility,
        policy: PricePolicy,
        wishlisted: bool,
    ) -> Self {
        let shown = pricing == PriceVisibility::Shown;
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            brand_name: product.brand_name.clone(),
            category: product.category.clone(),
            sub_category: product.sub_category.clone(),
            item_code: product.item_code.clone(),
            image: product.image.clone(),
            price: shown.then_some(product.price),
            original_price: product.original_price.filter(|_| shown),
            discount: product.discount.filter(|_| shown),
            resolved_price: shown.then(|| product.resolved_price(policy)),
            available_stock: product.available_stock(),
            in_stock: product.in_stock(),
            rating: product.rating,
            review_count: product.review_count,
            flags: product.flags,
            wishlisted,
        }
    }
}

/// Build views for a product slice using the session's pricing and wishlist.
pub(crate) fn views(session: &Session, products: &[Arc<Product>]) -> Vec<ProductView> {
    let pricing = session.catalog().pricing();
    let policy = session.store().policy();
    let wishlist = session.store().wishlist();
    products
        .iter()
        .map(|p| ProductView::new(p, pricing, policy, wishlist.contains(&p.id)))
        .collect()
}

/// One window of a paginated list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub name: String,
    pub items: Vec<ProductView>,
    pub cursor: usize,
    pub window_size: usize,
    pub total: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PageView {
    pub(crate) fn new(
        session: &Session,
        name: &str,
        window: &[Arc<Product>],
        total: usize,
    ) -> Self {
        let cursor = session.cursor(name);
        Self {
            name: name.to_string(),
            items: views(session, window),
            cursor,
            window_size: WINDOW_SIZE,
            total,
            has_next: (cursor + 1) * WINDOW_SIZE < total,
            has_prev: cursor > 0,
        }
    }
}

fn results_page(session: &Session) -> PageView {
    PageView::new(
        session,
        RESULTS_KEY,
        session.results_window(),
        session.results().len(),
    )
}

/// Current window of the filtered list.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Json<PageView> {
    let session = state.session().lock().await;
    Json(results_page(&session))
}

/// Replace the filter and sort parameters.
#[instrument(skip(state))]
pub async fn set_query(
    State(state): State<AppState>,
    Json(query): Json<ListQuery>,
) -> Result<Json<PageView>> {
    if let (Some(min), Some(max)) = (query.min_price, query.max_price)
        && min > max
    {
        return Err(AppError::BadRequest(format!(
            "minPrice {min} is greater than maxPrice {max}"
        )));
    }

    let mut session = state.session().lock().await;
    session.set_list_query(query);
    Ok(Json(results_page(&session)))
}

#[instrument(skip(state))]
pub async fn next_page(State(state): State<AppState>) -> Json<PageView> {
    let mut session = state.session().lock().await;
    session.advance_results();
    Json(results_page(&session))
}

#[instrument(skip(state))]
pub async fn prev_page(State(state): State<AppState>) -> Json<PageView> {
    let mut session = state.session().lock().await;
    session.retreat_results();
    Json(results_page(&session))
}

/// Product detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductView>> {
    let id = parse_id(&id)?;
    let session = state.session().lock().await;
    let product = session
        .catalog()
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(Json(ProductView::new(
        product,
        session.catalog().pricing(),
        session.store().policy(),
        session.store().wishlist().contains(&id),
    )))
}

// =============================================================================
// Search
// =============================================================================

/// Search input.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
}

/// Acknowledgement of a scheduled search.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchScheduled {
    pub query: String,
    pub debounce_ms: u64,
}

/// Committed search result.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchView {
    /// `None` while search is inactive.
    pub query: Option<String>,
    pub items: Vec<ProductView>,
    pub total: usize,
}

/// Schedule a debounced search; any pending one is cancelled.
#[instrument(skip(state))]
pub async fn schedule_search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> (StatusCode, Json<SearchScheduled>) {
    state
        .search()
        .schedule(Arc::clone(state.session()), request.query.clone());

    (
        StatusCode::ACCEPTED,
        Json(SearchScheduled {
            query: request.query,
            debounce_ms: u64::try_from(state.search().delay().as_millis()).unwrap_or(u64::MAX),
        }),
    )
}

/// The last committed search.
#[instrument(skip(state))]
pub async fn search(State(state): State<AppState>) -> Json<SearchView> {
    let session = state.session().lock().await;
    Json(SearchView {
        query: session.search_query().map(str::to_string),
        items: views(&session, session.search_results()),
        total: session.search_results().len(),
    })
}
