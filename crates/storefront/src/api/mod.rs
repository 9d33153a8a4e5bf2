//! Refabry catalog and order API client.
//!
//! Every call goes straight to the network: no retries, no caching, no
//! client-side timeout. Responses are handed back as raw envelopes
//! ([`ApiResponse`]); picking the payload out of the envelope is the caller's
//! job (see [`envelope`]).
//!
//! # Example
//!
//! ```rust,ignore
//! use refabry_storefront::api::{ApiClient, CatalogApi};
//!
//! let client = ApiClient::new(&config.api)?;
//! let response = client.fetch_all_products().await?;
//! let products = envelope::products(&response.body)?;
//! ```

pub mod envelope;

use std::future::Future;
use std::sync::Arc;

use refabry_core::{OrderPayload, ProductId};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;
use thiserror::Error;
use tracing::instrument;

use crate::config::RefabryApiConfig;

/// Path of the product collection endpoint.
const PRODUCTS_PATH: &str = "/all/product/get";

/// Path of the order creation endpoint.
const ORDER_PATH: &str = "/public/order/create";

/// Errors that can occur when talking to the Refabry API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure: no usable response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error: {status} - {body}")]
    Status { status: u16, body: String },

    /// The response body was not the JSON we expected.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A response envelope as the API sent it.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiResponse {
    /// Create a response from a status and decoded body.
    #[must_use]
    pub const fn new(status: StatusCode, body: Value) -> Self {
        Self { status, body }
    }
}

/// Read access to the product catalog.
pub trait CatalogApi: Send + Sync {
    /// Fetch the full product collection.
    fn fetch_all_products(&self) -> impl Future<Output = Result<ApiResponse, ApiError>> + Send;

    /// Fetch a single product.
    fn fetch_product_by_id(
        &self,
        id: &ProductId,
    ) -> impl Future<Output = Result<ApiResponse, ApiError>> + Send;
}

/// Order creation.
pub trait OrderApi: Send + Sync {
    /// Submit an order.
    ///
    /// Non-success responses that carry a body come back as `Ok` so the caller
    /// can read structured validation errors out of them. Only failures with no
    /// response at all are errors.
    fn place_order(
        &self,
        order: &OrderPayload,
    ) -> impl Future<Output = Result<ApiResponse, ApiError>> + Send;
}

// =============================================================================
// ApiClient
// =============================================================================

/// HTTP client for the Refabry API.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &RefabryApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.trim_end_matches('/').to_string(),
            }),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Issue a GET and decode the body, failing on non-success statuses.
    async fn get(&self, path: &str) -> Result<ApiResponse, ApiError> {
        let response = self.inner.client.get(self.url(path)).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                path,
                body = %text.chars().take(500).collect::<String>(),
                "Refabry API returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: text.chars().take(200).collect(),
            });
        }

        let body = serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                path,
                body = %text.chars().take(500).collect::<String>(),
                "Failed to parse Refabry API response"
            );
            ApiError::Parse(e)
        })?;

        Ok(ApiResponse::new(status, body))
    }
}

impl CatalogApi for ApiClient {
    #[instrument(skip(self))]
    async fn fetch_all_products(&self) -> Result<ApiResponse, ApiError> {
        self.get(PRODUCTS_PATH).await
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn fetch_product_by_id(&self, id: &ProductId) -> Result<ApiResponse, ApiError> {
        let path = format!("{PRODUCTS_PATH}/{}", urlencoding::encode(id.as_str()));
        self.get(&path).await
    }
}

impl OrderApi for ApiClient {
    #[instrument(skip(self, order), fields(product_ids = %order.product_ids))]
    async fn place_order(&self, order: &OrderPayload) -> Result<ApiResponse, ApiError> {
        let response = self
            .inner
            .client
            .post(self.url(ORDER_PATH))
            .json(order)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        // Validation failures come back as 4xx with a JSON body; keep whatever
        // arrived so the form can show it.
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        if !status.is_success() {
            tracing::warn!(status = %status, "Order API returned non-success status");
        }

        Ok(ApiResponse::new(status, body))
    }
}
