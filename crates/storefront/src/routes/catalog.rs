//! Catalog status, refresh and section handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use shopfront_core::{LoadState, PriceVisibility};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::session::{RefreshOutcome, Session};
use crate::state::AppState;

use super::products::PageView;

/// Catalog status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStatus {
    pub status: LoadState,
    pub pricing: PriceVisibility,
    pub products: usize,
    pub fetched_at: Option<DateTime<Utc>>,
    /// Whether the last refresh request was superseded by a newer one.
    pub stale: bool,
}

impl CatalogStatus {
    fn new(session: &Session, stale: bool) -> Self {
        let catalog = session.catalog();
        Self {
            status: session.load_state().clone(),
            pricing: catalog.pricing(),
            products: catalog.len(),
            fetched_at: catalog.fetched_at(),
            stale,
        }
    }
}

/// Section summary.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSummary {
    pub name: String,
    pub total: usize,
    pub cursor: usize,
}

#[instrument(skip(state))]
pub async fn status(State(state): State<AppState>) -> Json<CatalogStatus> {
    let session = state.session().lock().await;
    Json(CatalogStatus::new(&session, false))
}

/// Fetch the catalog now.
///
/// Also serves as the retry command after a failed fetch. If another refresh
/// is requested while this one is outstanding, this result is discarded.
#[instrument(skip(state))]
pub async fn refresh(State(state): State<AppState>) -> Result<Json<CatalogStatus>> {
    let outcome = state.refresh_catalog().await;
    let session = state.session().lock().await;

    match outcome {
        RefreshOutcome::Applied { .. } => Ok(Json(CatalogStatus::new(&session, false))),
        RefreshOutcome::Stale => Ok(Json(CatalogStatus::new(&session, true))),
        RefreshOutcome::Failed { message } => Err(AppError::Upstream(message)),
    }
}

#[instrument(skip(state))]
pub async fn sections(State(state): State<AppState>) -> Json<Vec<SectionSummary>> {
    let session = state.session().lock().await;
    Json(
        session
            .sections()
            .iter()
            .map(|s| SectionSummary {
                name: s.name.clone(),
                total: s.len(),
                cursor: session.cursor(&s.name),
            })
            .collect(),
    )
}

fn section_page(session: &Session, name: &str) -> Result<PageView> {
    let section = session
        .section(name)
        .ok_or_else(|| AppError::NotFound(format!("section {name}")))?;
    let window = session.section_window(name).unwrap_or_default();
    Ok(PageView::new(session, name, window, section.len()))
}

#[instrument(skip(state))]
pub async fn section(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<PageView>> {
    let session = state.session().lock().await;
    section_page(&session, &name).map(Json)
}

#[instrument(skip(state))]
pub async fn next_section(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<PageView>> {
    let mut session = state.session().lock().await;
    session.advance_section(&name);
    section_page(&session, &name).map(Json)
}

#[instrument(skip(state))]
pub async fn prev_section(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<PageView>> {
    let mut session = state.session().lock().await;
    session.retreat_section(&name);
    section_page(&session, &name).map(Json)
}
