//! HTTP client for the upstream catalog.

use std::sync::Arc;

use reqwest::header::{ACCEPT, AUTHORIZATION};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use shopfront_core::PriceVisibility;
use tracing::{debug, error, instrument};
use url::Url;

use crate::config::UpstreamConfig;

use super::envelope::decode_envelope;
use super::{FetchedBatch, UpstreamError};

/// Client for the upstream catalog endpoint.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    config: UpstreamConfig,
}

/// Where a fetch goes and how its prices are treated.
#[derive(Debug, PartialEq, Eq)]
struct Route {
    url: Url,
    pricing: PriceVisibility,
    authorized: bool,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: UpstreamConfig) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            inner: Arc::new(CatalogClientInner { client, config }),
        })
    }

    /// Fetch one raw batch of catalog records.
    ///
    /// With a credential the priced endpoint is called with a bearer header.
    /// Without one, the read-only endpoint is preferred when configured and
    /// the batch is marked [`PriceVisibility::Hidden`].
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, a body
    /// that is not JSON, or a missing credential when one is required.
    /// A JSON body of an unknown shape is not an error; it yields an empty
    /// batch.
    #[instrument(skip_all, fields(authorized = credential.is_some()))]
    pub async fn fetch(
        &self,
        credential: Option<&SecretString>,
    ) -> Result<FetchedBatch, UpstreamError> {
        let route = self.route(credential.is_some())?;
        debug!(url = %route.url, "Fetching catalog");

        let mut request = self
            .inner
            .client
            .get(route.url.clone())
            .header(ACCEPT, "application/json");
        if let Some(token) = credential.filter(|_| route.authorized) {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token.expose_secret()));
        }

        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Catalog endpoint returned non-success status"
            );
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let payload: Value = serde_json::from_str(&body).map_err(|e| {
            error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse catalog response"
            );
            UpstreamError::Parse(e)
        })?;

        Ok(FetchedBatch {
            records: decode_envelope(&payload),
            pricing: route.pricing,
        })
    }

    /// Pick the endpoint for a fetch.
    fn route(&self, has_credential: bool) -> Result<Route, UpstreamError> {
        let config = &self.inner.config;

        let (base, pricing, authorized) = if has_credential {
            (&config.api_url, PriceVisibility::Shown, true)
        } else if let Some(public) = &config.public_url {
            (public, PriceVisibility::Hidden, false)
        } else if config.require_credential {
            return Err(UpstreamError::MissingCredential);
        } else {
            (&config.api_url, PriceVisibility::Shown, false)
        };

        let mut url = base.clone();
        url.query_pairs_mut()
            .append_pair("size", &config.page_size.to_string())
            .append_pair(
                "sort",
                &format!("{},{}", config.sort_field, config.sort_direction.as_str()),
            );

        Ok(Route {
            url,
            pricing,
            authorized,
        })
    }
}
