//! Errors returned by the storefront API.
//!
//! Handlers answer with [`Result`]. A bad product id is a 400, an id or
//! section the catalog does not hold is a 404, and a failed catalog refresh
//! is a 502 reported to Sentry. Every error body is `{"error": "<message>"}`.
//!
//! Cart and wishlist operations never fail at this layer: persistence errors
//! are logged by the store and the in-memory change stands.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::upstream::UpstreamError;

/// Error surfaced to API clients.
#[derive(Debug, Error)]
pub enum AppError {
    /// The catalog endpoint failed or answered with something unusable.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// No product or section under the requested name.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed path or query input, such as a blank product id.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<UpstreamError> for AppError {
    fn from(err: UpstreamError) -> Self {
        Self::Upstream(err.to_string())
    }
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::Upstream(_) => {
                let event_id = sentry::capture_error(&self);
                tracing::error!(error = %self, sentry_event_id = %event_id, "Catalog refresh failed");
                // Upstream bodies may carry credentials or internal hosts.
                "Catalog service unavailable".to_string()
            }
            _ => self.to_string(),
        };

        (self.status(), Json(json!({ "error": message }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Record a cart or wishlist action as a Sentry breadcrumb.
///
/// ```rust,ignore
/// add_breadcrumb("wishlist", "Toggled wishlist", Some(&[("product_id", "sku-9")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    for (key, value) in data.unwrap_or_default() {
        breadcrumb
            .data
            .insert((*key).to_string(), serde_json::Value::String((*value).to_string()));
    }

    sentry::add_breadcrumb(breadcrumb);
}
