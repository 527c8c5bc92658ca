//! Upstream catalog collaborator.
//!
//! # Architecture
//!
//! - One HTTP GET per refresh, with page size and sort parameters
//! - Bearer credential header when a credential is available
//! - Without a credential, an optional read-only endpoint is used instead and
//!   the resulting catalog has its prices suppressed
//! - Response bodies are decoded by an ordered chain of envelope decoders
//!   ([`envelope`]); unknown shapes become an empty batch, not an error

mod client;
pub mod envelope;

pub use client::CatalogClient;

use serde_json::Value;
use shopfront_core::PriceVisibility;
use thiserror::Error;

/// Errors that can occur when fetching the catalog.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-success status.
    #[error("Upstream returned status {status}: {body}")]
    Status {
        status: u16,
        /// First part of the response body.
        body: String,
    },

    /// Response body was not JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The endpoint requires a credential and none is available.
    #[error("No credential available for the catalog endpoint")]
    MissingCredential,
}

/// Raw records of one fetch, before normalization.
#[derive(Debug, Clone, Default)]
pub struct FetchedBatch {
    pub records: Vec<Value>,
    pub pricing: PriceVisibility,
}
